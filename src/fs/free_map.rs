use crate::fs::node_table::NodeTable;

/// 位图，每个 bit 表示一个槽位是否被占用
#[derive(Debug, Clone)]
struct Bitmap {
    bits: Vec<u8>,
    total: usize,
    free: usize,
}

impl Bitmap {
    fn new(total: usize) -> Self {
        Self {
            bits: vec![0; total.div_ceil(8)],
            total,
            free: total,
        }
    }

    fn set(&mut self, index: usize) {
        if index >= self.total {
            return; // 防止越界
        }
        let byte_index = index / 8;
        let bit_index = index % 8;
        if self.bits[byte_index] & (1 << bit_index) == 0 {
            self.bits[byte_index] |= 1 << bit_index;
            self.free -= 1;
        }
    }

    fn is_used(&self, index: usize) -> bool {
        index < self.total && self.bits[index / 8] & (1 << (index % 8)) != 0
    }

    // 分配编号最小的空闲位
    fn alloc(&mut self) -> Option<usize> {
        for (byte_index, byte) in self.bits.iter_mut().enumerate() {
            if *byte != 0xFF {
                for bit in 0..8 {
                    let index = byte_index * 8 + bit;
                    if index >= self.total {
                        return None;
                    }
                    if *byte & (1 << bit) == 0 {
                        *byte |= 1 << bit;
                        self.free -= 1;
                        return Some(index);
                    }
                }
            }
        }
        None
    }
}

/// 空闲空间视图。
///
/// 每次按需从节点表推导，本身不持久化：节点的使用状态是唯一权威来源，
/// 原始块是否被占用取决于是否有在用节点引用它。
#[derive(Debug, Clone)]
pub struct FreeMap {
    nodes: Bitmap,
    blocks: Bitmap,
}

impl FreeMap {
    pub fn scan(table: &NodeTable, total_blocks: usize) -> Self {
        let mut nodes = Bitmap::new(table.capacity());
        let mut blocks = Bitmap::new(total_blocks);
        for (index, node) in table.nodes().iter().enumerate() {
            if let Some(block) = node.data_block.get() {
                nodes.set(index);
                blocks.set(block);
            }
        }
        Self { nodes, blocks }
    }

    /// 同时空闲的节点 + 原始块对数
    pub fn free_count(&self) -> usize {
        self.nodes.free.min(self.blocks.free)
    }

    pub fn is_block_used(&self, block: usize) -> bool {
        self.blocks.is_used(block)
    }

    /// 取编号最小的空闲节点和编号最小的空闲原始块
    pub fn alloc_pair(&mut self) -> Option<(usize, usize)> {
        if self.free_count() == 0 {
            return None;
        }
        let node = self.nodes.alloc()?;
        let block = self.blocks.alloc()?;
        Some((node, block))
    }
}
