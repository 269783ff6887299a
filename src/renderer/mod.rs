//! 渲染器模块
//!
//! 本模块提供统一的渲染接口，应用程序通过 [`Renderer`] 与底层图形 API 交互。
//!
//! # 架构设计
//!
//! - `Renderer`：对外的渲染器接口
//! - `RenderBackend`：后端 trait，底层实现在 `gfx` 模块中
//! - `frame` / `sync`：与 API 无关的帧提交协议和 Fence 同步逻辑

use std::sync::Arc;
use tracing::info;
use winit::window::Window;

use crate::core::error::Result;
use crate::core::Config;

pub mod backend_trait;
pub mod descriptor;
pub mod frame;
pub mod metrics;
pub mod shaders;
pub mod sync;
pub mod vertex;

pub use backend_trait::RenderBackend;

pub struct Renderer {
    backend: Box<dyn RenderBackend>,
}

impl Renderer {
    /// 为窗口创建渲染器
    ///
    /// 只有 Windows 平台提供 DirectX 12 后端，其他平台返回初始化错误。
    pub fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let backend = create_backend(window, config)?;
        info!(backend = backend.backend_name(), "Renderer backend ready");
        Ok(Self { backend })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.backend.resize(width, height)
    }

    pub fn update(&mut self, delta_time: f32) {
        self.backend.update(delta_time)
    }

    pub fn draw(&mut self) -> Result<()> {
        self.backend.draw()
    }
}

#[cfg(target_os = "windows")]
fn create_backend(window: Arc<Window>, config: &Config) -> Result<Box<dyn RenderBackend>> {
    info!("Initializing DX12 Backend");
    let renderer = crate::gfx::dx12::Renderer::new(window, config)?;
    Ok(Box::new(renderer))
}

#[cfg(not(target_os = "windows"))]
fn create_backend(_window: Arc<Window>, _config: &Config) -> Result<Box<dyn RenderBackend>> {
    Err(crate::core::error::TriangleError::Initialization(
        "DirectX 12 backend is only available on Windows".to_string(),
    ))
}
