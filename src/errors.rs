use std::fmt;
use thiserror::Error;

/// 自动化操作中可能出现的错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 外部工具（adb / maestro）不存在或无法调用
    #[error("Tool unavailable: {tool}")]
    ToolUnavailable { tool: String },

    /// 设备未找到错误
    #[error("Device not found: {query}")]
    DeviceNotFound { query: String },

    /// 没有任何已连接的设备
    #[error("No connected devices")]
    NoDevices,

    /// 流文件未找到
    #[error("Flow file not found: {path}")]
    FlowNotFound { path: String },

    /// 命令执行失败
    #[error("Command execution failed: {command}, reason: {reason}")]
    CommandFailed { command: String, reason: String },

    /// 解析错误
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// 非法输入（会破坏生成的流文件语法）
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// IO错误的包装
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 正则表达式错误
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// UTF-8编码错误
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// 数字解析错误
    #[error("Parse number error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// 图像解码错误
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Anyhow错误的包装
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// 其他未分类错误
    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

/// 专门用于结果类型的别名
pub type ControlResult<T> = Result<T, ControlError>;

impl ControlError {
    /// 从任何实现了Display的错误创建
    pub fn from_display<E: fmt::Display>(err: E) -> Self {
        ControlError::Unknown {
            message: err.to_string(),
        }
    }

    /// 创建工具不可用错误
    pub fn tool_unavailable<S: Into<String>>(tool: S) -> Self {
        ControlError::ToolUnavailable { tool: tool.into() }
    }

    /// 创建设备未找到错误
    pub fn device_not_found<S: Into<String>>(query: S) -> Self {
        ControlError::DeviceNotFound {
            query: query.into(),
        }
    }

    /// 创建流文件未找到错误
    pub fn flow_not_found<S: Into<String>>(path: S) -> Self {
        ControlError::FlowNotFound { path: path.into() }
    }

    /// 创建命令执行失败错误
    pub fn command_failed<S1: Into<String>, S2: Into<String>>(command: S1, reason: S2) -> Self {
        ControlError::CommandFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// 创建解析错误
    pub fn parse_error<S: Into<String>>(message: S) -> Self {
        ControlError::ParseError {
            message: message.into(),
        }
    }

    /// 创建非法输入错误
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        ControlError::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建未知错误
    pub fn unknown<S: Into<String>>(message: S) -> Self {
        ControlError::Unknown {
            message: message.into(),
        }
    }

    /// 检查是否为致命错误（调用方不应重试同一操作）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ControlError::ToolUnavailable { .. }
                | ControlError::InvalidInput { .. }
                | ControlError::ParseError { .. }
        )
    }

    /// 获取错误的简短描述
    pub fn error_code(&self) -> &'static str {
        match self {
            ControlError::ToolUnavailable { .. } => "TOOL_UNAVAILABLE",
            ControlError::DeviceNotFound { .. } => "DEVICE_NOT_FOUND",
            ControlError::NoDevices => "NO_DEVICES",
            ControlError::FlowNotFound { .. } => "FLOW_NOT_FOUND",
            ControlError::CommandFailed { .. } => "COMMAND_FAILED",
            ControlError::ParseError { .. } => "PARSE_ERROR",
            ControlError::InvalidInput { .. } => "INVALID_INPUT",
            ControlError::Io(_) => "IO_ERROR",
            ControlError::Regex(_) => "REGEX_ERROR",
            ControlError::Utf8(_) => "UTF8_ERROR",
            ControlError::ParseInt(_) => "PARSE_INT_ERROR",
            ControlError::Image(_) => "IMAGE_ERROR",
            ControlError::Anyhow(_) => "ANYHOW_ERROR",
            ControlError::Unknown { .. } => "UNKNOWN_ERROR",
        }
    }
}

/// 扩展Result类型，添加便利方法
pub trait ControlResultExt<T> {
    /// 将原始错误转换为ControlError
    fn to_control_error(self) -> ControlResult<T>;

    /// 添加上下文信息（重命名以避免与anyhow::Context冲突）
    fn with_control_context<F>(self, f: F) -> ControlResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ControlResultExt<T> for anyhow::Result<T> {
    fn to_control_error(self) -> ControlResult<T> {
        self.map_err(ControlError::Anyhow)
    }

    fn with_control_context<F>(self, f: F) -> ControlResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ControlError::Anyhow(e.context(f())))
    }
}

impl<T> ControlResultExt<T> for Result<T, std::io::Error> {
    fn to_control_error(self) -> ControlResult<T> {
        self.map_err(ControlError::Io)
    }

    fn with_control_context<F>(self, f: F) -> ControlResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ControlError::Io(std::io::Error::new(e.kind(), format!("{}: {}", f(), e))))
    }
}

/// 用于链式错误处理的宏
#[macro_export]
macro_rules! ctl_bail {
    ($err:expr) => {
        return Err($err.into())
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::ControlError::unknown(format!($fmt, $($arg)*)))
    };
}

/// 用于确保条件的宏
#[macro_export]
macro_rules! ctl_ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err.into());
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::errors::ControlError::unknown(format!($fmt, $($arg)*)));
        }
    };
}
