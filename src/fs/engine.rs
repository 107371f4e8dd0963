use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::{
    disk::BackingStore,
    fs::{
        config::FsConfig,
        error::{FsError, Result},
        image, FileStat, FileSystem, Usage,
    },
};

/// 对外的存储引擎。
///
/// 三张表放在同一把读写锁后面：create / write / delete 独占，read / list 共享。
/// 每次修改成功后都把整张镜像重写到后备存储，保存期间仍持有写锁。
/// `parking_lot` 的读写锁是公平的，等待中的写者会挡住后来的读者。
pub struct StorageEngine<D: BackingStore> {
    config: FsConfig,
    disk: D,
    fs: RwLock<FileSystem>,
}

impl<D: BackingStore> StorageEngine<D> {
    /// 加载镜像；读取或校验失败时当作首次启动，初始化空表并立即写一份新镜像。
    /// 新镜像写不出去时只记录警告，继续用内存中的空表服务，
    /// 之后的修改会以 `PersistenceFailure` 报告保存失败。
    pub fn open(config: FsConfig, disk: D) -> Result<Self> {
        config.validate()?;

        let loaded = disk
            .load()
            .map_err(FsError::from)
            .and_then(|bytes| image::decode(&bytes, &config));

        let engine = match loaded {
            Ok(fs) => {
                info!(
                    files = fs.list().len(),
                    free_blocks = fs.free_count(),
                    "mounted existing image"
                );
                Self {
                    config,
                    disk,
                    fs: RwLock::new(fs),
                }
            }
            Err(e) => {
                warn!(error = %e, "could not load image, formatting a new one");
                let fs = FileSystem::format(&config);
                let engine = Self {
                    config,
                    disk,
                    fs: RwLock::new(fs),
                };
                match engine.persist(&engine.fs.read()) {
                    Ok(()) => info!(
                        max_files = engine.config.max_files,
                        max_blocks = engine.config.max_blocks,
                        block_size = engine.config.block_size,
                        "formatted new image"
                    ),
                    Err(e) => warn!(error = %e, "could not write new image, serving from memory"),
                }
                engine
            }
        };
        Ok(engine)
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    pub fn create_file(&self, name: &str) -> Result<()> {
        self.mutate("create", name, |fs| fs.create(name))
    }

    pub fn delete_file(&self, name: &str) -> Result<()> {
        self.mutate("delete", name, |fs| fs.delete(name))
    }

    pub fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.mutate("write", name, |fs| fs.write(name, bytes))
    }

    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let fs = self.fs.read();
        let contents = fs.read(name)?;
        debug!(file = name, bytes = contents.len(), "read");
        Ok(contents)
    }

    pub fn list_files(&self) -> Vec<String> {
        self.fs.read().list()
    }

    pub fn stat(&self, name: &str) -> Result<FileStat> {
        self.fs.read().stat(name)
    }

    pub fn usage(&self) -> Usage {
        self.fs.read().usage()
    }

    /// 在读锁下查看内部状态
    pub fn inspect<R>(&self, f: impl FnOnce(&FileSystem) -> R) -> R {
        f(&self.fs.read())
    }

    // 写锁内完成修改和整张镜像的保存；任何返回路径上锁都会随 guard 释放。
    // 保存失败时内存中的修改保留，与镜像可能不一致，直接报告给调用方。
    fn mutate<T>(
        &self,
        op: &'static str,
        name: &str,
        f: impl FnOnce(&mut FileSystem) -> Result<T>,
    ) -> Result<T> {
        let mut fs = self.fs.write();
        let out = f(&mut fs)?;
        if let Err(e) = self.persist(&fs) {
            warn!(op, file = name, error = %e, "failed to persist image");
            return Err(e);
        }
        debug!(op, file = name, "ok");
        Ok(out)
    }

    fn persist(&self, fs: &FileSystem) -> Result<()> {
        let bytes = image::encode(fs, &self.config)?;
        self.disk.save(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::MemDisk;
    use std::sync::Arc;

    fn config() -> FsConfig {
        FsConfig::default().block_size(8).max_files(3).max_blocks(4)
    }

    #[test]
    fn test_open_formats_missing_image() {
        let disk = Arc::new(MemDisk::new());
        let engine = StorageEngine::open(config(), disk.clone()).unwrap();
        assert!(engine.list_files().is_empty());
        assert_eq!(disk.save_count(), 1);
        assert!(disk.image().is_some());
    }

    #[test]
    fn test_open_formats_garbage_image() {
        let disk = Arc::new(MemDisk::with_image(vec![1, 2, 3]));
        let engine = StorageEngine::open(config(), disk.clone()).unwrap();
        assert_eq!(engine.usage().free_blocks, 4);
        assert_eq!(disk.save_count(), 1);
    }

    #[test]
    fn test_every_mutation_rewrites_image() {
        let disk = Arc::new(MemDisk::new());
        let engine = StorageEngine::open(config(), disk.clone()).unwrap();
        engine.create_file("a").unwrap();
        engine.write_file("a", b"payload").unwrap();
        engine.delete_file("a").unwrap();
        assert_eq!(disk.save_count(), 4);

        // 读操作和失败的修改都不写镜像
        let _ = engine.read_file("a");
        let _ = engine.create_file("abcdefghijkl");
        engine.list_files();
        assert_eq!(disk.save_count(), 4);
    }

    #[test]
    fn test_reopen_sees_persisted_state() {
        let disk = Arc::new(MemDisk::new());
        {
            let engine = StorageEngine::open(config(), disk.clone()).unwrap();
            engine.create_file("keep").unwrap();
            engine.write_file("keep", b"0123456789").unwrap();
        }
        let engine = StorageEngine::open(config(), disk.clone()).unwrap();
        assert_eq!(engine.read_file("keep").unwrap(), b"0123456789");
        assert_eq!(engine.stat("keep").unwrap().blocks, 2);
    }

    #[test]
    fn test_persist_failure_is_reported_and_lock_released() {
        let disk = Arc::new(MemDisk::new());
        let engine = StorageEngine::open(config(), disk.clone()).unwrap();
        disk.fail_saves(true);

        let err = engine.create_file("a").unwrap_err();
        assert!(matches!(err, FsError::Persistence(_)));

        // 锁已经释放，后续操作可以继续；内存中的修改保留
        assert_eq!(engine.list_files(), vec!["a".to_string()]);
        disk.fail_saves(false);
        engine.write_file("a", b"ok").unwrap();
        assert_eq!(engine.read_file("a").unwrap(), b"ok");
    }

    #[test]
    fn test_open_survives_unwritable_image() {
        let disk = Arc::new(MemDisk::new());
        disk.fail_saves(true);
        let engine = StorageEngine::open(config(), disk.clone()).unwrap();
        assert!(engine.list_files().is_empty());
        assert!(disk.image().is_none());

        // 读操作照常，修改报告保存失败
        assert_eq!(engine.usage().free_blocks, 4);
        let err = engine.create_file("a").unwrap_err();
        assert_eq!(err.kind(), crate::fs::error::ErrorKind::PersistenceFailure);

        disk.fail_saves(false);
        engine.create_file("b").unwrap();
        assert!(disk.image().is_some());
        assert_eq!(engine.list_files(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = StorageEngine::open(FsConfig::default().block_size(0), MemDisk::new());
        assert!(matches!(result, Err(FsError::InvalidConfig(_))));
    }
}
