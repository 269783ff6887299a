//! hello_triangle - 最小的 DirectX 12 示例
//!
//! 打开一个窗口，初始化 DirectX 12 设备、交换链和管线，每帧绘制一个顶点着色的三角形。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、错误处理）
//! - `renderer`: 与图形 API 无关的渲染逻辑（顶点、着色器、帧提交协议、Fence 同步）
//! - `gfx`: 图形后端实现（DirectX 12，仅 Windows）
//!
//! # 使用示例
//!
//! ```no_run
//! use hello_triangle::core::Config;
//!
//! let mut config = Config::from_file_or_default("config.toml");
//! config.apply_args(["--no-vsync"]);
//! assert_eq!(config.graphics.sync_interval(), 0);
//! ```

pub mod core;
pub mod gfx;
pub mod renderer;
