pub mod block_device;
pub mod file_disk;
pub mod mem_disk;
pub mod types;

pub use block_device::BackingStore;
pub use file_disk::FileDisk;
pub use mem_disk::MemDisk;
pub use types::{
    BlockRef, DEFAULT_BLOCK_SIZE, DEFAULT_MAX_BLOCKS, DEFAULT_MAX_FILES, MAX_NAME_BYTES,
    MAX_NAME_LEN, NIL,
};
