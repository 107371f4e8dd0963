use serde::{Deserialize, Serialize};

/// 默认逻辑块大小：128 字节
/// 文件内容以“块”为最小分配单位。
pub const DEFAULT_BLOCK_SIZE: usize = 128;

/// 默认文件表容量（最多可同时存在的文件数）
pub const DEFAULT_MAX_FILES: usize = 5;

/// 默认块数量：链节点表与原始块表容量相同
pub const DEFAULT_MAX_BLOCKS: usize = 10;

/// 文件名最大长度（字符数）
pub const MAX_NAME_LEN: usize = 11;

/// 文件名缓冲区宽度：每个字符按 UTF-8 最多 4 字节预留
pub const MAX_NAME_BYTES: usize = MAX_NAME_LEN * 4;

/// 越界标记，表示“没有引用”
pub const NIL: u32 = u32::MAX;

/// 指向节点表或原始块表的定长索引。
///
/// 磁盘上固定占 4 字节，`NIL` 表示空引用，因此镜像中每条记录的宽度都不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockRef(u32);

impl BlockRef {
    pub const NONE: BlockRef = BlockRef(NIL);

    pub fn new(index: usize) -> Self {
        debug_assert!(index < NIL as usize);
        Self(index as u32)
    }

    pub fn get(self) -> Option<usize> {
        if self.0 == NIL {
            None
        } else {
            Some(self.0 as usize)
        }
    }

    pub fn is_none(self) -> bool {
        self.0 == NIL
    }
}

impl Default for BlockRef {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_ref_sentinel() {
        assert!(BlockRef::NONE.is_none());
        assert_eq!(BlockRef::NONE.get(), None);
        assert_eq!(BlockRef::default(), BlockRef::NONE);
        assert_eq!(BlockRef::new(3).get(), Some(3));
        assert!(!BlockRef::new(0).is_none());
    }

    #[test]
    fn test_block_ref_is_fixed_width() {
        let a = bincode::serialize(&BlockRef::new(1)).unwrap();
        let b = bincode::serialize(&BlockRef::NONE).unwrap();
        assert_eq!(a.len(), 4);
        assert_eq!(b.len(), 4);
    }
}
