use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::watch;
use tracing::info;

use crate::config::Config;
use crate::http::connection::handle_connection;
use crate::server::pool::WorkerPool;

/// Pause after a failed accept, e.g. while out of file descriptors.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Owns the listening socket and the worker pool.
///
/// Built once at startup; [`Server::run`] accepts until a
/// [`ShutdownHandle`] fires, then waits for outstanding connections.
pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
    pool: WorkerPool,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

/// Stops a running [`Server`] from another task.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Server {
    /// Binds the configured address with `SO_REUSEADDR` and the configured backlog.
    pub async fn bind(config: Config) -> anyhow::Result<Self> {
        let addr = tokio::net::lookup_host((config.host.as_str(), config.port))
            .await
            .with_context(|| format!("resolving {}", config.address()))?
            .next()
            .with_context(|| format!("no address for {}", config.address()))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .with_context(|| format!("binding {addr}"))?;
        let listener = socket.listen(config.backlog)?;

        let (tx, rx) = watch::channel(false);
        let pool = WorkerPool::new(config.workers);

        info!(
            addr = %listener.local_addr()?,
            workers = pool.size(),
            root = %config.root,
            "Listening"
        );

        Ok(Self {
            listener,
            config: Arc::new(config),
            pool,
            shutdown_tx: Arc::new(tx),
            shutdown_rx: rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: Arc::clone(&self.shutdown_tx),
        }
    }

    /// Accepts connections and hands each to the worker pool.
    pub async fn run(self) -> anyhow::Result<()> {
        let Server {
            listener,
            config,
            pool,
            shutdown_tx: _keep_open,
            mut shutdown_rx,
        } = self;

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((socket, peer)) => {
                            tracing::debug!("Accepted connection from {}", peer);
                            if let Err(e) = dispatch(&pool, socket, peer, Arc::clone(&config)) {
                                tracing::error!("Failed to hand off connection from {}: {}", peer, e);
                            }
                        }
                        Err(e) => accept_failed(&e).await,
                    }
                }

                _ = shutdown_rx.changed() => {
                    info!("Shutdown requested, no longer accepting");
                    break;
                }
            }
        }

        drop(listener);
        pool.drain().await;
        info!("Server stopped");
        Ok(())
    }
}

/// Logs a failed accept and backs off so a persistent error cannot spin the loop.
async fn accept_failed(err: &std::io::Error) {
    tracing::warn!(error = %err, "Accept failed, backing off");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

/// Switches the socket to blocking mode and queues its handler.
fn dispatch(
    pool: &WorkerPool,
    socket: tokio::net::TcpStream,
    peer: SocketAddr,
    config: Arc<Config>,
) -> anyhow::Result<()> {
    let stream = socket.into_std()?;
    stream.set_nonblocking(false)?;

    let span = tracing::info_span!("connection", %peer);
    pool.submit(move || {
        let _entered = span.enter();
        if let Err(e) = handle_connection(stream, config) {
            tracing::error!("Connection error from {}: {:#}", peer, e);
        }
    });
    Ok(())
}
