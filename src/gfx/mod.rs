//! 图形 API 实现
//!
//! 目前只有 DirectX 12 后端，仅在 Windows 上编译。

#[cfg(target_os = "windows")]
pub mod dx12;
