use std::path::PathBuf;

use clap::Parser;

use crate::{
    disk::{DEFAULT_BLOCK_SIZE, DEFAULT_MAX_BLOCKS, DEFAULT_MAX_FILES},
    fs::config::FsConfig,
};

/// MiniFS file server
#[derive(Debug, Clone, Parser)]
#[command(name = "minifs-server", version)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 12345)]
    pub port: u16,

    /// Backing image file
    #[arg(short, long, default_value = "filesystem.dat")]
    pub image: PathBuf,

    /// Size of each block in bytes
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Maximum number of files
    #[arg(long, default_value_t = DEFAULT_MAX_FILES)]
    pub max_files: usize,

    /// Maximum number of storage blocks
    #[arg(long, default_value_t = DEFAULT_MAX_BLOCKS)]
    pub max_blocks: usize,
}

impl ServerArgs {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn fs_config(&self) -> FsConfig {
        FsConfig::new(&self.image)
            .block_size(self.block_size)
            .max_files(self.max_files)
            .max_blocks(self.max_blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = ServerArgs::parse_from(["minifs-server"]);
        assert_eq!(args.addr(), "127.0.0.1:12345");
        assert_eq!(args.fs_config(), FsConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = ServerArgs::parse_from([
            "minifs-server",
            "--port",
            "4000",
            "--image",
            "/tmp/x.dat",
            "--block-size",
            "64",
            "--max-files",
            "20",
            "--max-blocks",
            "100",
        ]);
        assert_eq!(args.port, 4000);
        let config = args.fs_config();
        assert_eq!(config.image_path, PathBuf::from("/tmp/x.dat"));
        assert_eq!(config.block_size, 64);
        assert_eq!(config.max_files, 20);
        assert_eq!(config.max_blocks, 100);
    }
}
