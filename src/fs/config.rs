use std::path::PathBuf;

use crate::{
    disk::{DEFAULT_BLOCK_SIZE, DEFAULT_MAX_BLOCKS, DEFAULT_MAX_FILES, NIL},
    fs::error::{FsError, Result},
};

/// 文件系统的容量参数，启动后不再变化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsConfig {
    /// 镜像文件路径 (default: filesystem.dat)
    pub image_path: PathBuf,

    /// 每块字节数 (default: 128)
    pub block_size: usize,

    /// 文件表槽位数 (default: 5)
    pub max_files: usize,

    /// 链节点 / 原始块数量 (default: 10)
    pub max_blocks: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("filesystem.dat"),
            block_size: DEFAULT_BLOCK_SIZE,
            max_files: DEFAULT_MAX_FILES,
            max_blocks: DEFAULT_MAX_BLOCKS,
        }
    }
}

impl FsConfig {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            ..Default::default()
        }
    }

    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    pub fn max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }

    pub fn max_blocks(mut self, count: usize) -> Self {
        self.max_blocks = count;
        self
    }

    /// 总存储容量（字节）
    pub fn total_size(&self) -> usize {
        self.block_size * self.max_blocks
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(FsError::InvalidConfig("block size must be positive".into()));
        }
        if self.max_files == 0 || self.max_files >= NIL as usize {
            return Err(FsError::InvalidConfig(format!(
                "max files out of range: {}",
                self.max_files
            )));
        }
        if self.max_blocks == 0 || self.max_blocks >= NIL as usize {
            return Err(FsError::InvalidConfig(format!(
                "max blocks out of range: {}",
                self.max_blocks
            )));
        }
        // 文件大小以 u32 存储
        match self.block_size.checked_mul(self.max_blocks) {
            Some(total) if total <= u32::MAX as usize => Ok(()),
            _ => Err(FsError::InvalidConfig(format!(
                "total storage too large: {} blocks of {} bytes",
                self.max_blocks, self.block_size
            ))),
        }
    }
}
