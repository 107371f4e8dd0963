use std::{
    io::{Error, ErrorKind, Result},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use parking_lot::Mutex;

use crate::disk::block_device::BackingStore;

/// 内存中的虚拟磁盘，可以注入写失败。
#[derive(Debug, Default)]
pub struct MemDisk {
    image: Mutex<Option<Vec<u8>>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemDisk {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有的镜像内容启动
    pub fn with_image(image: Vec<u8>) -> Self {
        Self {
            image: Mutex::new(Some(image)),
            ..Self::default()
        }
    }

    /// 之后的每次 `save` 都返回 I/O 错误
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// 成功保存的次数
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn image(&self) -> Option<Vec<u8>> {
        self.image.lock().clone()
    }
}

impl BackingStore for MemDisk {
    fn load(&self) -> Result<Vec<u8>> {
        self.image
            .lock()
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, "no image"))
    }

    fn save(&self, image: &[u8]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::new(ErrorKind::Other, "injected write failure"));
        }
        *self.image.lock() = Some(image.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
