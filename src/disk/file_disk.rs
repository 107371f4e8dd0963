use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{Read, Result, Write},
    path::{Path, PathBuf},
};

use crate::disk::block_device::BackingStore;

/// 以宿主机上的一个普通文件作为虚拟磁盘。
#[derive(Debug)]
pub struct FileDisk {
    path: PathBuf,
}

impl FileDisk {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // 同目录下的临时文件，保证 rename 不跨文件系统
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("image"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BackingStore for FileDisk {
    fn load(&self) -> Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        let mut buf = Vec::with_capacity(file.metadata()?.len() as usize);
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn save(&self, image: &[u8]) -> Result<()> {
        let tmp = self.temp_path();
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp)?;
            file.write_all(image)?;
            file.sync_all()?;
        }
        // 先写临时文件再整体替换，旧镜像在 rename 之前始终完整
        fs::rename(&tmp, &self.path)
    }
}
