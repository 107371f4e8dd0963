pub mod config;
pub mod handler;

use std::{
    io,
    net::{SocketAddr, TcpListener, ToSocketAddrs},
    sync::Arc,
    thread,
};

use tracing::{info, info_span, warn};

use crate::{disk::BackingStore, fs::engine::StorageEngine, utils::session_id};

pub use config::ServerArgs;
pub use handler::{dispatch, handle_client, Outcome};

/// 多线程文件服务器：每个连接一个线程，所有线程共享同一个引擎
pub struct FileServer<D: BackingStore + 'static> {
    listener: TcpListener,
    engine: Arc<StorageEngine<D>>,
}

impl<D: BackingStore + 'static> FileServer<D> {
    pub fn bind(addr: impl ToSocketAddrs, engine: Arc<StorageEngine<D>>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, engine })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// 一直接受连接；单个连接出错不影响其他连接
    pub fn run(self) -> io::Result<()> {
        info!(addr = %self.local_addr()?, "file server listening");

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };
            let peer = stream
                .peer_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "unknown".into());
            let engine = Arc::clone(&self.engine);

            let spawned = thread::Builder::new()
                .name(format!("client-{peer}"))
                .spawn(move || {
                    let span = info_span!("client", peer = %peer, session = %session_id());
                    let _enter = span.enter();
                    info!("client connected");
                    if let Err(e) = handle_client(stream, &engine) {
                        warn!(error = %e, "connection error");
                    }
                    info!("client disconnected");
                });
            if let Err(e) = spawned {
                warn!(error = %e, "failed to spawn client thread");
            }
        }
        Ok(())
    }
}
