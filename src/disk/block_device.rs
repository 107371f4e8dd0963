use std::{io::Result, sync::Arc};

/// 镜像的持久化介质。
///
/// 每次保存都是整张镜像的完整覆盖，不存在增量写入。
pub trait BackingStore: Send + Sync {
    /// 读取整张镜像；镜像不存在时返回 `ErrorKind::NotFound`
    fn load(&self) -> Result<Vec<u8>>;
    /// 用 `image` 替换现有镜像
    fn save(&self, image: &[u8]) -> Result<()>;
}

impl<T: BackingStore + ?Sized> BackingStore for Arc<T> {
    fn load(&self) -> Result<Vec<u8>> {
        (**self).load()
    }

    fn save(&self, image: &[u8]) -> Result<()> {
        (**self).save(image)
    }
}
