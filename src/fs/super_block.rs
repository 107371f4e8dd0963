use serde::{Deserialize, Serialize};

use crate::fs::{
    config::FsConfig,
    error::{FsError, Result},
};

/// 魔数，用于识别镜像（"MINIFS" + 版本号）
pub const MAGIC: u64 = 0x4D49_4E49_4653_0001;
pub const VERSION: u32 = 1;

/// 镜像头：记录创建镜像时的几何参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperBlock {
    pub magic: u64,
    pub version: u32,
    /** 数据块信息 */
    pub block_size: u32, // 每块大小（字节）
    pub max_blocks: u32, // 块总数
    /** 文件表信息 */
    pub max_files: u32, // 文件槽位数
}

impl SuperBlock {
    pub fn new(config: &FsConfig) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            block_size: config.block_size as u32,
            max_blocks: config.max_blocks as u32,
            max_files: config.max_files as u32,
        }
    }

    /// 镜像必须与当前配置完全一致，否则视为无法读取
    pub fn verify(&self, config: &FsConfig) -> Result<()> {
        if self.magic != MAGIC {
            return Err(FsError::Corrupted(format!("bad magic {:#x}", self.magic)));
        }
        if self.version != VERSION {
            return Err(FsError::Corrupted(format!(
                "unsupported image version {}",
                self.version
            )));
        }
        let expected = Self::new(config);
        if self.block_size != expected.block_size
            || self.max_blocks != expected.max_blocks
            || self.max_files != expected.max_files
        {
            return Err(FsError::Corrupted(format!(
                "image geometry {}x{}B/{} files does not match configuration {}x{}B/{} files",
                self.max_blocks,
                self.block_size,
                self.max_files,
                expected.max_blocks,
                expected.block_size,
                expected.max_files
            )));
        }
        Ok(())
    }
}
