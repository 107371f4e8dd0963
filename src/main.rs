use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use minifs::{logging, server::ServerArgs, FileDisk, FileServer, StorageEngine};

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = ServerArgs::parse();
    let config = args.fs_config();

    info!(
        port = args.port,
        block_size = config.block_size,
        max_files = config.max_files,
        max_blocks = config.max_blocks,
        total_storage = config.total_size(),
        image = %config.image_path.display(),
        "starting file server"
    );

    let disk = FileDisk::new(&config.image_path);
    let engine = StorageEngine::open(config, disk).context("failed to open file system")?;
    let server = FileServer::bind(args.addr(), Arc::new(engine))
        .with_context(|| format!("could not start server on {}", args.addr()))?;
    server.run()?;
    Ok(())
}
