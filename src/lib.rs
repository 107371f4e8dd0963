//! MiniFS: a block-chained file system kept in a single image file and
//! served to remote clients over a line-oriented TCP protocol.

pub mod disk;
pub mod fs;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod shell;
pub mod utils;

pub use disk::{BackingStore, FileDisk, MemDisk};
pub use fs::{
    config::FsConfig,
    engine::StorageEngine,
    error::{ErrorKind, FsError, Result},
    FileStat, FileSystem, Usage,
};
pub use server::FileServer;
