use thiserror::Error;

/// 文件系统错误类型
#[derive(Debug, Error)]
pub enum FsError {
    #[error("filename too large (max 11 characters): {0}")]
    NameTooLong(String),
    #[error("filename must not be empty")]
    EmptyName,
    #[error("file {0} already exists")]
    AlreadyExists(String),
    #[error("maximum number of files reached, no free file entries")]
    TableFull,
    #[error("file {0} does not exist")]
    NotFound(String),
    #[error("file too large: needs {needed} blocks, {available} available")]
    InsufficientSpace { needed: usize, available: usize },
    #[error("disk I/O error: {0}")]
    Persistence(#[from] std::io::Error),
    #[error("image encoding error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("file system corrupted: {0}")]
    Corrupted(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// 对外暴露的错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NameTooLong,
    AlreadyExists,
    TableFull,
    NotFound,
    InsufficientSpace,
    MalformedCommand,
    UnknownCommand,
    PersistenceFailure,
}

impl FsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NameTooLong(_) => ErrorKind::NameTooLong,
            // 空文件名和错误的配置都属于请求本身不合法
            Self::EmptyName | Self::InvalidConfig(_) => ErrorKind::MalformedCommand,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::TableFull => ErrorKind::TableFull,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InsufficientSpace { .. } => ErrorKind::InsufficientSpace,
            Self::Persistence(_) | Self::Codec(_) | Self::Corrupted(_) => {
                ErrorKind::PersistenceFailure
            }
        }
    }
}

/// 文件系统统一结果类型
pub type Result<T> = std::result::Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            FsError::NameTooLong("abcdefghijkl".into()).kind(),
            ErrorKind::NameTooLong
        );
        assert_eq!(FsError::TableFull.kind(), ErrorKind::TableFull);
        assert_eq!(
            FsError::InsufficientSpace {
                needed: 3,
                available: 1
            }
            .kind(),
            ErrorKind::InsufficientSpace
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(FsError::from(io).kind(), ErrorKind::PersistenceFailure);
        assert_eq!(
            FsError::Corrupted("cycle".into()).kind(),
            ErrorKind::PersistenceFailure
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FsError::NotFound("a.txt".into()).to_string(),
            "file a.txt does not exist"
        );
        assert_eq!(
            FsError::AlreadyExists("a.txt".into()).to_string(),
            "file a.txt already exists"
        );
    }
}
