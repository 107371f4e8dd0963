use std::fmt;

use crate::{fs::error::FsError, protocol::parse::ProtocolError};

pub const SUCCESS_PREFIX: &str = "SUCCESS:";
pub const ERROR_PREFIX: &str = "ERROR:";

/// 一行应答，客户端只看前缀就能区分成功和失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Success(String),
    Error(String),
}

impl Reply {
    pub fn success(msg: impl Into<String>) -> Self {
        Self::Success(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Error(msg) => msg,
        }
    }

    /// 解析服务器返回的一行；没有已知前缀时按错误处理
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(msg) = line.strip_prefix(SUCCESS_PREFIX) {
            Self::Success(msg.trim_start().to_string())
        } else if let Some(msg) = line.strip_prefix(ERROR_PREFIX) {
            Self::Error(msg.trim_start().to_string())
        } else {
            Self::Error(line.to_string())
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.is_success() {
            SUCCESS_PREFIX
        } else {
            ERROR_PREFIX
        };
        // 应答必须是一行，内容中的换行替换成空格
        let msg: String = self
            .message()
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        write!(f, "{prefix} {msg}")
    }
}

impl From<FsError> for Reply {
    fn from(e: FsError) -> Self {
        Self::Error(e.to_string())
    }
}

impl From<ProtocolError> for Reply {
    fn from(e: ProtocolError) -> Self {
        Self::Error(e.to_string())
    }
}
