//! 核心功能模块
//!
//! 提供与具体图形 API 无关的基础设施：日志、配置和错误处理。
//!
//! # 模块组织
//!
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：配置管理，支持从配置文件和命令行加载设置
//! - `error`：错误处理，定义统一的错误类型

pub mod log;
pub mod config;
pub mod error;

pub use error::{Result, TriangleError};
pub use config::Config;
