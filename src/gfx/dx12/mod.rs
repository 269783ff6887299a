//! DirectX 12 图形 API 实现模块
//!
//! 本模块包含了所有 DirectX 12 相关的代码，包括：
//! - Context: 设备、命令队列、交换链、RTV 堆、命令列表和 Fence
//! - Pipeline: 根签名、着色器编译、PSO 和顶点缓冲区
//! - Renderer: 把上述对象接入帧提交协议

pub mod context;
pub mod pipeline;
pub mod renderer;

// 重新导出常用类型
pub use context::Dx12Context;
pub use pipeline::TrianglePipeline;
pub use renderer::Renderer;

use crate::core::error::{GraphicsError, TriangleError};

/// 把 windows-rs 的错误映射为带上下文的图形错误
///
/// ```ignore
/// factory.CreateSwapChainForHwnd(..)
///     .map_err(graphics_error(GraphicsError::SwapchainError, "Failed to create swap chain"))?;
/// ```
pub(crate) fn graphics_error<K>(kind: K, context: &'static str) -> impl FnOnce(windows::core::Error) -> TriangleError
where
    K: FnOnce(String) -> GraphicsError,
{
    move |e| TriangleError::Graphics(kind(format!("{}: {}", context, e)))
}
