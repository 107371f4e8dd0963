use crate::fs::error::{FsError, Result};

/// 原始块表：所有数据块扁平存放在一个字节数组中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataArea {
    blocks: Vec<u8>,
    block_size: usize,
    total_blocks: usize,
}

impl DataArea {
    pub fn new(block_size: usize, total_blocks: usize) -> Self {
        Self {
            blocks: vec![0u8; total_blocks * block_size], // 扁平化存储
            block_size,
            total_blocks,
        }
    }

    pub fn from_bytes(blocks: Vec<u8>, block_size: usize, total_blocks: usize) -> Result<Self> {
        if blocks.len() != block_size * total_blocks {
            return Err(FsError::Corrupted(format!(
                "data area holds {} bytes, expected {}",
                blocks.len(),
                block_size * total_blocks
            )));
        }
        Ok(Self {
            blocks,
            block_size,
            total_blocks,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.blocks
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    /// 写入一个块，不足一块的部分补零
    pub fn write_block(&mut self, index: usize, buf: &[u8]) -> Result<()> {
        if index >= self.total_blocks {
            return Err(FsError::Corrupted(format!(
                "block index {index} out of range"
            )));
        }
        if buf.len() > self.block_size {
            return Err(FsError::Corrupted(format!(
                "{} bytes do not fit a {}-byte block",
                buf.len(),
                self.block_size
            )));
        }
        let start = index * self.block_size;
        self.blocks[start..start + buf.len()].copy_from_slice(buf);
        self.blocks[start + buf.len()..start + self.block_size].fill(0);
        Ok(())
    }

    pub fn read_block(&self, index: usize) -> Option<&[u8]> {
        if index >= self.total_blocks {
            return None;
        }
        let start = index * self.block_size;
        Some(&self.blocks[start..start + self.block_size])
    }

    /// 回收时物理清零，旧数据不残留
    pub fn zero_block(&mut self, index: usize) {
        if let Some(block) = self
            .blocks
            .chunks_mut(self.block_size)
            .nth(index)
        {
            block.fill(0);
        }
    }
}
