use serde::{Deserialize, Serialize};

use crate::disk::BlockRef;

/// 块链中的一个节点：指向一个原始块和下一个节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FNode {
    pub data_block: BlockRef, // NONE 表示节点空闲
    pub next: BlockRef,       // NONE 表示链尾
}

impl FNode {
    pub fn unused() -> Self {
        Self {
            data_block: BlockRef::NONE,
            next: BlockRef::NONE,
        }
    }

    pub fn new(data_block: usize) -> Self {
        Self {
            data_block: BlockRef::new(data_block),
            next: BlockRef::NONE,
        }
    }

    pub fn is_used(&self) -> bool {
        !self.data_block.is_none()
    }
}

impl Default for FNode {
    fn default() -> Self {
        Self::unused()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTable {
    nodes: Vec<FNode>,
}

impl NodeTable {
    pub fn new(max_blocks: usize) -> Self {
        Self {
            nodes: vec![FNode::unused(); max_blocks],
        }
    }

    pub fn from_nodes(nodes: Vec<FNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[FNode] {
        &self.nodes
    }

    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, index: usize) -> Option<&FNode> {
        self.nodes.get(index)
    }

    pub fn set(&mut self, index: usize, node: FNode) {
        self.nodes[index] = node;
    }

    /// 把 `index` 节点接到 `prev` 之后
    pub fn link(&mut self, prev: usize, index: usize) {
        self.nodes[prev].next = BlockRef::new(index);
    }

    pub fn reset(&mut self, index: usize) {
        self.nodes[index] = FNode::unused();
    }

    /// 空闲节点数；节点是否被使用就是唯一的空闲信号
    pub fn free_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_used()).count()
    }

    /// 从 `first` 开始按链顺序遍历节点下标
    pub fn chain(&self, first: BlockRef) -> Chain<'_> {
        Chain {
            table: self,
            cursor: first.get(),
            remaining: self.nodes.len(),
        }
    }

    pub fn chain_len(&self, first: BlockRef) -> usize {
        self.chain(first).count()
    }
}

/// 链遍历器。最多走 `capacity` 步，损坏的环不会导致死循环。
pub struct Chain<'a> {
    table: &'a NodeTable,
    cursor: Option<usize>,
    remaining: usize,
}

impl Iterator for Chain<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.cursor?;
        if self.remaining == 0 {
            return None;
        }
        let node = self.table.get(index)?;
        self.remaining -= 1;
        self.cursor = node.next.get();
        Some(index)
    }
}
