//! HTTP server lifecycle.
//!
//! `Idle` after [`Server::bind`], `Running` inside [`Server::run`] until the
//! shutdown future resolves, then `Stopping` while open connections finish
//! their in-flight request, and `Stopped` once they are drained or the grace
//! period ran out.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::DEFAULT_SHUTDOWN_TIMEOUT_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind listener: {0}")]
    Bind(#[source] io::Error),

    #[error("listener failed: {0}")]
    Accept(#[source] io::Error),

    #[error("connections still open after {0:?} grace period")]
    ShutdownTimeout(Duration),
}

pub struct Server {
    listener: TcpListener,
    router: Router,
    grace_period: Duration,
    state: watch::Sender<ServerState>,
}

impl Server {
    pub async fn bind(addr: impl ToSocketAddrs, router: Router) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;
        let (state, _) = watch::channel(ServerState::Idle);

        Ok(Self {
            listener,
            router,
            grace_period: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECONDS),
            state,
        })
    }

    /// How long in-flight requests may take once shutdown starts.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Bind)
    }

    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Serve until `shutdown` resolves or the listener fails, then drain.
    ///
    /// A listener failure is returned after draining. Connections still
    /// open when the grace period ends are aborted and the call returns
    /// [`ServerError::ShutdownTimeout`].
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send) -> Result<(), ServerError> {
        let Server {
            listener,
            router,
            grace_period,
            state,
        } = self;

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "server listening");
        }
        state.send_replace(ServerState::Running);

        let (drain_tx, drain_rx) = watch::channel(false);
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        let accept_result = loop {
            tokio::select! {
                _ = &mut shutdown => break Ok(()),
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(serve_connection(
                            stream,
                            peer,
                            router.clone(),
                            drain_rx.clone(),
                        ));
                    }
                    Err(err) if is_transient(&err) => {
                        tracing::warn!(error = %err, "accept failed, continuing");
                    }
                    Err(err) => break Err(ServerError::Accept(err)),
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        };

        state.send_replace(ServerState::Stopping);
        drop(listener);
        tracing::info!(
            open_connections = connections.len(),
            grace_period = ?grace_period,
            "shutting down"
        );
        drain_tx.send_replace(true);

        let drained = tokio::time::timeout(grace_period, async {
            while connections.join_next().await.is_some() {}
        })
        .await;

        let drain_result = match drained {
            Ok(()) => {
                tracing::info!("all connections drained");
                Ok(())
            }
            Err(_) => {
                tracing::warn!(
                    open_connections = connections.len(),
                    "grace period elapsed, aborting connections"
                );
                connections.shutdown().await;
                Err(ServerError::ShutdownTimeout(grace_period))
            }
        };

        state.send_replace(ServerState::Stopped);
        accept_result.and(drain_result)
    }
}

/// Serve one connection; on drain, finish the in-flight request and close.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    router: Router,
    mut drain: watch::Receiver<bool>,
) {
    let builder = auto::Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection(TokioIo::new(stream), TowerToHyperService::new(router));
    tokio::pin!(conn);

    let mut draining = false;
    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(err) = result {
                    tracing::debug!(%peer, error = %err, "connection closed with error");
                }
                break;
            }
            _ = drain.changed(), if !draining => {
                draining = true;
                conn.as_mut().graceful_shutdown();
            }
        }
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted | io::ErrorKind::ConnectionReset | io::ErrorKind::Interrupted
    )
}
