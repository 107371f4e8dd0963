use crate::{
    disk::BlockRef,
    fs::{
        config::FsConfig,
        data_area::DataArea,
        error::{FsError, Result},
        file_table::{FileEntry, FileTable},
        free_map::FreeMap,
        node_table::{FNode, NodeTable},
    },
};

pub mod config;
pub mod data_area;
pub mod engine;
pub mod error;
pub mod file_table;
pub mod free_map;
pub mod image;
pub mod node_table;
pub mod super_block;

/// 单个文件的元信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub name: String,
    pub size: usize,
    pub blocks: usize,
}

/// 整体使用情况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub max_files: usize,
    pub used_files: usize,
    pub max_blocks: usize,
    pub free_blocks: usize,
    pub block_size: usize,
}

/// 存放 `len` 字节需要的块数，空内容不占块
pub fn blocks_needed(len: usize, block_size: usize) -> usize {
    len.div_ceil(block_size)
}

/// 三张表的内存状态，本身不加锁，由 `StorageEngine` 统一保护
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystem {
    pub(crate) files: FileTable, // 文件表
    pub(crate) nodes: NodeTable, // 块链节点表
    pub(crate) data: DataArea,   // 原始块内容
}

impl FileSystem {
    /// 全新的空文件系统
    pub fn format(config: &FsConfig) -> Self {
        Self {
            files: FileTable::new(config.max_files),
            nodes: NodeTable::new(config.max_blocks),
            data: DataArea::new(config.block_size, config.max_blocks),
        }
    }

    pub(crate) fn from_parts(files: FileTable, nodes: NodeTable, data: DataArea) -> Self {
        Self { files, nodes, data }
    }

    pub fn block_size(&self) -> usize {
        self.data.block_size()
    }

    pub fn entries(&self) -> &[FileEntry] {
        self.files.entries()
    }

    pub fn nodes(&self) -> &[FNode] {
        self.nodes.nodes()
    }

    pub fn data(&self) -> &DataArea {
        &self.data
    }

    pub fn find(&self, name: &str) -> Option<&FileEntry> {
        self.files.find(name).and_then(|slot| self.files.get(slot))
    }

    pub fn free_count(&self) -> usize {
        FreeMap::scan(&self.nodes, self.data.total_blocks()).free_count()
    }

    /// 链上依次引用的原始块编号
    pub fn chain_blocks(&self, first: BlockRef) -> Vec<usize> {
        self.nodes
            .chain(first)
            .filter_map(|i| self.nodes.get(i).and_then(|n| n.data_block.get()))
            .collect()
    }

    pub fn create(&mut self, name: &str) -> Result<()> {
        self.files.create(name)?;
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        let slot = self
            .files
            .find(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        if let Some(entry) = self.files.get(slot) {
            let first = entry.first_node;
            self.release_chain(first);
        }
        self.files.release(slot);
        Ok(())
    }

    /// 整体覆盖写：先做容量检查，通过后才释放旧链
    pub fn write(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let slot = self
            .files
            .find(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        let old_first = self.files.get(slot).map(|e| e.first_node).unwrap_or_default();

        let needed = blocks_needed(bytes.len(), self.block_size());
        // 文件自己的旧块也可以复用
        let available = self.free_count() + self.nodes.chain_len(old_first);
        if needed > available {
            return Err(FsError::InsufficientSpace { needed, available });
        }

        self.release_chain(old_first);
        let first = self.allocate_chain(bytes)?;
        if let Some(entry) = self.files.get_mut(slot) {
            entry.size = bytes.len() as u32;
            entry.first_node = first;
        }
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .find(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        let size = entry.size as usize;
        let mut contents = Vec::with_capacity(size);
        if size == 0 {
            return Ok(contents);
        }

        for block in self.chain_blocks(entry.first_node) {
            if contents.len() >= size {
                break;
            }
            let data = self.data.read_block(block).ok_or_else(|| {
                FsError::Corrupted(format!("{name}: block {block} out of range"))
            })?;
            let take = (size - contents.len()).min(data.len());
            contents.extend_from_slice(&data[..take]);
        }

        if contents.len() != size {
            return Err(FsError::Corrupted(format!(
                "{name}: chain holds {} of {size} bytes",
                contents.len()
            )));
        }
        Ok(contents)
    }

    pub fn list(&self) -> Vec<String> {
        self.files.list()
    }

    pub fn stat(&self, name: &str) -> Result<FileStat> {
        let entry = self
            .find(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        Ok(FileStat {
            name: entry.name().to_string(),
            size: entry.size as usize,
            blocks: self.nodes.chain_len(entry.first_node),
        })
    }

    pub fn usage(&self) -> Usage {
        Usage {
            max_files: self.files.capacity(),
            used_files: self.files.used_count(),
            max_blocks: self.data.total_blocks(),
            free_blocks: self.free_count(),
            block_size: self.block_size(),
        }
    }

    /// 按链顺序清零每个原始块并把节点标为空闲；空链什么都不做
    pub fn release_chain(&mut self, first: BlockRef) {
        let chain: Vec<usize> = self.nodes.chain(first).collect();
        for index in chain {
            if let Some(block) = self.nodes.get(index).and_then(|n| n.data_block.get()) {
                self.data.zero_block(block);
            }
            self.nodes.reset(index);
        }
    }

    /// 把 payload 切块写入新链，返回第一个节点。
    ///
    /// 每一块都取编号最小的空闲节点和编号最小的空闲原始块，分配顺序是确定的。
    pub fn allocate_chain(&mut self, payload: &[u8]) -> Result<BlockRef> {
        let block_size = self.block_size();
        let needed = blocks_needed(payload.len(), block_size);
        let mut free = FreeMap::scan(&self.nodes, self.data.total_blocks());
        let available = free.free_count();
        if needed > available {
            return Err(FsError::InsufficientSpace { needed, available });
        }

        let mut head = BlockRef::NONE;
        let mut tail: Option<usize> = None;
        for chunk in payload.chunks(block_size) {
            let (node, block) = free
                .alloc_pair()
                .ok_or(FsError::InsufficientSpace { needed, available })?;
            self.data.write_block(block, chunk)?;
            self.nodes.set(node, FNode::new(block));
            match tail {
                Some(prev) => self.nodes.link(prev, node),
                None => head = BlockRef::new(node),
            }
            tail = Some(node);
        }
        Ok(head)
    }

    /// 校验三张表之间的一致性：
    /// 每条链无环、不越界、不与其他链共享节点或原始块，长度与 size 相符，
    /// 并且不存在没有文件引用的在用节点。
    pub fn check(&self) -> Result<()> {
        let total_nodes = self.nodes.capacity();
        let total_blocks = self.data.total_blocks();
        let mut node_seen = vec![false; total_nodes];
        let mut block_seen = vec![false; total_blocks];
        let mut names: Vec<&str> = Vec::new();

        for (slot, entry) in self.files.entries().iter().enumerate() {
            if !entry.is_used() {
                continue;
            }
            if !entry.has_valid_name() {
                return Err(FsError::Corrupted(format!("slot {slot}: invalid name")));
            }
            if names.contains(&entry.name()) {
                return Err(FsError::Corrupted(format!(
                    "slot {slot}: duplicate name {}",
                    entry.name()
                )));
            }
            names.push(entry.name());

            let mut cursor = entry.first_node.get();
            let mut length = 0usize;
            while let Some(index) = cursor {
                let node = self.nodes.get(index).ok_or_else(|| {
                    FsError::Corrupted(format!("slot {slot}: node {index} out of range"))
                })?;
                if node_seen[index] {
                    return Err(FsError::Corrupted(format!(
                        "slot {slot}: node {index} reached twice"
                    )));
                }
                node_seen[index] = true;
                let block = node.data_block.get().ok_or_else(|| {
                    FsError::Corrupted(format!("slot {slot}: node {index} is unused"))
                })?;
                if block >= total_blocks || block_seen[block] {
                    return Err(FsError::Corrupted(format!(
                        "slot {slot}: block {block} invalid or shared"
                    )));
                }
                block_seen[block] = true;
                length += 1;
                cursor = node.next.get();
            }

            let expected = blocks_needed(entry.size as usize, self.block_size());
            if length != expected {
                return Err(FsError::Corrupted(format!(
                    "slot {slot}: chain has {length} blocks, size needs {expected}"
                )));
            }
        }

        if let Some(orphan) = self
            .nodes
            .nodes()
            .iter()
            .enumerate()
            .position(|(i, n)| n.is_used() && !node_seen[i])
        {
            return Err(FsError::Corrupted(format!(
                "node {orphan} is in use but unreachable"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_fs() -> FileSystem {
        FileSystem::format(&FsConfig::default().block_size(4).max_files(3).max_blocks(5))
    }

    #[test]
    fn test_blocks_needed() {
        assert_eq!(blocks_needed(0, 128), 0);
        assert_eq!(blocks_needed(1, 128), 1);
        assert_eq!(blocks_needed(128, 128), 1);
        assert_eq!(blocks_needed(129, 128), 2);
    }

    #[test]
    fn test_write_read_lengths() {
        let mut fs = small_fs();
        fs.create("f").unwrap();
        for payload in [&b""[..], &b"abcd"[..], &b"abcdefghij"[..]] {
            fs.write("f", payload).unwrap();
            assert_eq!(fs.read("f").unwrap(), payload);
            fs.check().unwrap();
        }
    }

    #[test]
    fn test_allocation_is_lowest_index_first() {
        let mut fs = small_fs();
        fs.create("a").unwrap();
        fs.create("b").unwrap();
        fs.write("a", b"12345678").unwrap(); // 节点 0,1
        fs.write("b", b"xyz").unwrap(); // 节点 2
        fs.delete("a").unwrap();
        fs.write("b", b"0123456789ab").unwrap();

        // b 的旧块 2 先被释放，新链从 0 开始
        let first = fs.find("b").unwrap().first_node;
        assert_eq!(first, BlockRef::new(0));
        assert_eq!(fs.chain_blocks(first), vec![0, 1, 2]);
    }

    #[test]
    fn test_release_zeroes_blocks() {
        let mut fs = small_fs();
        fs.create("a").unwrap();
        fs.write("a", b"secretdata").unwrap();
        let blocks = fs.chain_blocks(fs.find("a").unwrap().first_node);
        assert_eq!(blocks.len(), 3);

        fs.delete("a").unwrap();
        for block in blocks {
            assert!(fs.data().read_block(block).unwrap().iter().all(|&b| b == 0));
        }
        assert_eq!(fs.free_count(), 5);
        assert!(matches!(fs.read("a"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_release_chain_on_sentinel_is_noop() {
        let mut fs = small_fs();
        let before = fs.clone();
        fs.release_chain(BlockRef::NONE);
        assert_eq!(fs, before);
    }

    #[test]
    fn test_insufficient_space_keeps_old_content() {
        let mut fs = small_fs();
        fs.create("a").unwrap();
        fs.create("b").unwrap();
        fs.write("a", b"aaaaaaaa").unwrap(); // 2 块
        fs.write("b", b"bbbbbbbb").unwrap(); // 2 块

        // 空闲 1 + 自身 2 = 3，需要 4
        let err = fs.write("a", b"cccccccccccccccc").unwrap_err();
        assert!(matches!(
            err,
            FsError::InsufficientSpace {
                needed: 4,
                available: 3
            }
        ));
        assert_eq!(fs.read("a").unwrap(), b"aaaaaaaa");
        fs.check().unwrap();

        // 正好 3 块可以复用自己的旧块
        fs.write("a", b"cccccccccccc").unwrap();
        assert_eq!(fs.read("a").unwrap(), b"cccccccccccc");
        assert_eq!(fs.free_count(), 0);
    }

    #[test]
    fn test_stat_and_usage() {
        let mut fs = small_fs();
        fs.create("a").unwrap();
        fs.write("a", b"hello").unwrap();
        let stat = fs.stat("a").unwrap();
        assert_eq!(stat.size, 5);
        assert_eq!(stat.blocks, 2);

        let usage = fs.usage();
        assert_eq!(usage.used_files, 1);
        assert_eq!(usage.max_files, 3);
        assert_eq!(usage.free_blocks, 3);
        assert_eq!(usage.block_size, 4);
    }

    #[test]
    fn test_check_detects_shared_node() {
        let mut fs = small_fs();
        fs.create("a").unwrap();
        fs.create("b").unwrap();
        fs.write("a", b"abc").unwrap();
        let first = fs.find("a").unwrap().first_node;
        let slot = fs.files.find("b").unwrap();
        let entry = fs.files.get_mut(slot).unwrap();
        entry.first_node = first;
        entry.size = 3;
        assert!(matches!(fs.check(), Err(FsError::Corrupted(_))));
    }

    #[test]
    fn test_check_detects_orphan_node() {
        let mut fs = small_fs();
        fs.nodes.set(4, FNode::new(4));
        assert!(matches!(fs.check(), Err(FsError::Corrupted(_))));
    }
}
