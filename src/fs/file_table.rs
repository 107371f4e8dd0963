use serde::{Deserialize, Serialize};

use crate::{
    disk::{BlockRef, MAX_NAME_BYTES, MAX_NAME_LEN},
    fs::error::{FsError, Result},
};

/// 文件表中的一个槽位（相当于 inode）
///
/// 所有字段定长，序列化后每个槽位宽度相同。名字按 UTF-8 存放，
/// 每个字符预留 4 字节，`name_len` 是实际字节数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    used: bool,
    name: [[u8; 4]; MAX_NAME_LEN],
    name_len: u8,
    pub size: u32,             // 实际写入的字节数
    pub first_node: BlockRef, // 块链的第一个节点
}

impl FileEntry {
    pub fn empty() -> Self {
        Self {
            used: false,
            name: [[0; 4]; MAX_NAME_LEN],
            name_len: 0,
            size: 0,
            first_node: BlockRef::NONE,
        }
    }

    // 调用方保证 name 已经通过长度检查
    fn new(name: &str) -> Self {
        let mut buf = [[0u8; 4]; MAX_NAME_LEN];
        buf.as_flattened_mut()[..name.len()].copy_from_slice(name.as_bytes());
        Self {
            used: true,
            name: buf,
            name_len: name.len() as u8,
            size: 0,
            first_node: BlockRef::NONE,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    fn name_bytes(&self) -> &[u8] {
        let len = (self.name_len as usize).min(MAX_NAME_BYTES);
        &self.name.as_flattened()[..len]
    }

    pub fn name(&self) -> &str {
        std::str::from_utf8(self.name_bytes()).unwrap_or_default()
    }

    /// 名字字节是否合法（加载镜像时校验）
    pub fn has_valid_name(&self) -> bool {
        let len = self.name_len as usize;
        len > 0
            && len <= MAX_NAME_BYTES
            && std::str::from_utf8(self.name_bytes())
                .is_ok_and(|name| name.chars().count() <= MAX_NAME_LEN)
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }
}

impl Default for FileEntry {
    fn default() -> Self {
        Self::empty()
    }
}

/// 固定容量的文件表，按槽位顺序线性扫描
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTable {
    entries: Vec<FileEntry>,
}

impl FileTable {
    pub fn new(max_files: usize) -> Self {
        Self {
            entries: vec![FileEntry::empty(); max_files],
        }
    }

    pub fn from_entries(entries: Vec<FileEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn used_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_used()).count()
    }

    // 查找文件，返回槽位号；大小写敏感
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.is_used() && e.name() == name)
    }

    pub fn get(&self, slot: usize) -> Option<&FileEntry> {
        self.entries.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut FileEntry> {
        self.entries.get_mut(slot)
    }

    /// 在第一个空闲槽位上建立一个空文件，返回槽位号
    pub fn create(&mut self, name: &str) -> Result<usize> {
        // 按字符计数，不按字节
        if name.chars().count() > MAX_NAME_LEN {
            return Err(FsError::NameTooLong(name.to_string()));
        }
        if name.is_empty() {
            return Err(FsError::EmptyName);
        }
        if self.find(name).is_some() {
            return Err(FsError::AlreadyExists(name.to_string()));
        }
        let slot = self
            .entries
            .iter()
            .position(|e| !e.is_used())
            .ok_or(FsError::TableFull)?;
        self.entries[slot] = FileEntry::new(name);
        Ok(slot)
    }

    /// 清空槽位，返回被删除的条目
    pub fn release(&mut self, slot: usize) -> Option<FileEntry> {
        let entry = self.entries.get_mut(slot)?;
        let old = *entry;
        entry.clear();
        Some(old)
    }

    /// 按槽位顺序列出所有文件名（不排序）
    pub fn list(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.is_used())
            .map(|e| e.name().to_string())
            .collect()
    }
}
