//! 错误处理模块
//!
//! 定义了示例程序中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 每个可能失败的图形 API 调用都映射为带有固定说明的错误
//! - 初始化阶段遇到第一个错误立即中止，不做重试
//! - 支持错误链（error source）

use std::fmt;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, TriangleError>;

/// 示例程序的错误类型
#[derive(Debug)]
pub enum TriangleError {
    /// 配置错误
    Config(ConfigError),

    /// 图形 API 错误
    Graphics(GraphicsError),

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),

    /// 初始化错误
    Initialization(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug)]
pub enum GraphicsError {
    /// 设备创建失败
    DeviceCreation(String),

    /// 交换链错误
    SwapchainError(String),

    /// 着色器编译失败
    ShaderCompilation(String),

    /// 资源创建失败
    ResourceCreation(String),

    /// 渲染命令执行失败
    CommandExecution(String),

    /// CPU/GPU 同步失败
    Synchronization(String),
}

impl fmt::Display for TriangleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriangleError::Config(e) => write!(f, "Configuration error: {}", e),
            TriangleError::Graphics(e) => write!(f, "Graphics error: {}", e),
            TriangleError::Io(e) => write!(f, "IO error: {}", e),
            TriangleError::Log(msg) => write!(f, "Log error: {}", msg),
            TriangleError::Initialization(msg) => write!(f, "Initialization error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::DeviceCreation(msg) => write!(f, "Device creation failed: {}", msg),
            GraphicsError::SwapchainError(msg) => write!(f, "Swapchain error: {}", msg),
            GraphicsError::ShaderCompilation(msg) => write!(f, "Shader compilation failed: {}", msg),
            GraphicsError::ResourceCreation(msg) => write!(f, "Resource creation failed: {}", msg),
            GraphicsError::CommandExecution(msg) => write!(f, "Command execution failed: {}", msg),
            GraphicsError::Synchronization(msg) => write!(f, "Synchronization failed: {}", msg),
        }
    }
}

impl std::error::Error for TriangleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TriangleError::Io(e) => Some(e),
            TriangleError::Config(e) => Some(e),
            TriangleError::Graphics(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for GraphicsError {}

impl From<std::io::Error> for TriangleError {
    fn from(err: std::io::Error) -> Self {
        TriangleError::Io(err)
    }
}

impl From<ConfigError> for TriangleError {
    fn from(err: ConfigError) -> Self {
        TriangleError::Config(err)
    }
}

impl From<GraphicsError> for TriangleError {
    fn from(err: GraphicsError) -> Self {
        TriangleError::Graphics(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_graphics_error_display() {
        let err: TriangleError =
            GraphicsError::DeviceCreation("Failed to create D3D12 device".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Graphics error: Device creation failed: Failed to create D3D12 device"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_display() {
        let err: TriangleError = ConfigError::InvalidValue {
            field: "window.width".to_string(),
            reason: "must be greater than 0".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value for 'window.width': must be greater than 0"
        );
    }

    #[test]
    fn test_io_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = TriangleError::from(io);
        assert!(matches!(err, TriangleError::Io(_)));
        assert!(err.source().is_some());
        assert!(TriangleError::Log("x".into()).source().is_none());
    }
}
