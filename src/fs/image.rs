//! 整张镜像的编解码。
//!
//! 布局固定：镜像头、文件表、节点表、原始块，依次用 bincode 定长整数编码。
//! 容量由配置决定，所以同一配置下镜像长度永远不变。

use std::io::Cursor;

use bincode::Options;

use crate::fs::{
    config::FsConfig,
    data_area::DataArea,
    error::{FsError, Result},
    file_table::{FileEntry, FileTable},
    node_table::{FNode, NodeTable},
    super_block::SuperBlock,
    FileSystem,
};

pub fn encode(fs: &FileSystem, config: &FsConfig) -> Result<Vec<u8>> {
    let codec = bincode::DefaultOptions::new().with_fixint_encoding();
    let mut buf = Vec::new();
    codec.serialize_into(&mut buf, &SuperBlock::new(config))?;
    codec.serialize_into(&mut buf, fs.files.entries())?;
    codec.serialize_into(&mut buf, fs.nodes.nodes())?;
    codec.serialize_into(&mut buf, fs.data.as_bytes())?;
    Ok(buf)
}

pub fn decode(bytes: &[u8], config: &FsConfig) -> Result<FileSystem> {
    // 限制总读取量，损坏的长度前缀不会导致超大分配
    let codec = bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(bytes.len() as u64);
    let mut cursor = Cursor::new(bytes);

    let super_block: SuperBlock = codec.deserialize_from(&mut cursor)?;
    super_block.verify(config)?;

    let entries: Vec<FileEntry> = codec.deserialize_from(&mut cursor)?;
    if entries.len() != config.max_files {
        return Err(FsError::Corrupted(format!(
            "file table has {} slots, expected {}",
            entries.len(),
            config.max_files
        )));
    }

    let nodes: Vec<FNode> = codec.deserialize_from(&mut cursor)?;
    if nodes.len() != config.max_blocks {
        return Err(FsError::Corrupted(format!(
            "node table has {} slots, expected {}",
            nodes.len(),
            config.max_blocks
        )));
    }

    let blocks: Vec<u8> = codec.deserialize_from(&mut cursor)?;
    if cursor.position() as usize != bytes.len() {
        return Err(FsError::Corrupted(format!(
            "{} trailing bytes after data area",
            bytes.len() - cursor.position() as usize
        )));
    }

    let data = DataArea::from_bytes(blocks, config.block_size, config.max_blocks)?;
    let fs = FileSystem::from_parts(
        FileTable::from_entries(entries),
        NodeTable::from_nodes(nodes),
        data,
    );
    fs.check()?;
    Ok(fs)
}
