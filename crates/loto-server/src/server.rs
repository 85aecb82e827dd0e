//! TCP acceptor, worker registry, and signal-driven graceful shutdown
//! (`spec.md` §4.F, §4.G, §5).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use loto_core::BarrierState;
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::session_handler::handle_connection;
use crate::store::BetStoreHandle;

/// How long the acceptor waits for a join deadline to pass before force-
/// aborting any worker still running (`spec.md` §5: "recommended 2 s").
const WORKER_JOIN_DEADLINE: Duration = Duration::from_secs(2);

/// The lottery intake server: owns the listener exclusively and spawns one
/// worker task per accepted connection (`spec.md` §4.F).
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    store: BetStoreHandle,
    barrier: Arc<BarrierState>,
}

impl Server {
    /// Bind the listener with `SO_REUSEADDR` and the configured backlog,
    /// and construct the shared barrier/store state.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] if the bind fails.
    pub async fn bind(config: ServerConfig, store: BetStoreHandle) -> Result<Self, ServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = bind_with_backlog(addr, config.backlog)?;
        let barrier = Arc::new(BarrierState::new(config.expected_agencies));

        Ok(Self { listener, config, store, barrier })
    }

    /// Local address the listener is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] if the OS cannot report the local
    /// address of a bound socket (should not normally happen).
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Transport)
    }

    /// Run the accept loop until a shutdown signal (SIGINT/SIGTERM) arrives.
    ///
    /// The listener uses a bounded `accept()` timeout so the loop checks for
    /// shutdown periodically even without a signal-delivered wakeup
    /// (`spec.md` §4.F). On shutdown, no further connections are accepted,
    /// and in-flight workers are joined with [`WORKER_JOIN_DEADLINE`] before
    /// being aborted.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] if installing a signal handler
    /// fails (not expected outside of resource-exhausted environments).
    pub async fn run(self) -> Result<(), ServerError> {
        let Self { listener, config, store, barrier } = self;

        let mut sigterm = signal(SignalKind::terminate()).map_err(ServerError::Transport)?;
        let mut workers: JoinSet<()> = JoinSet::new();

        tracing::info!(port = config.port, expected_agencies = config.expected_agencies, "server listening");

        loop {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("received SIGINT, shutting down");
                    break;
                }
                _ = sigterm.recv() => {
                    tracing::info!("received SIGTERM, shutting down");
                    break;
                }
                accepted = timeout(config.accept_timeout, listener.accept()) => {
                    match accepted {
                        Ok(Ok((stream, peer))) => {
                            let store = Arc::clone(&store);
                            let barrier = Arc::clone(&barrier);
                            workers.spawn(async move {
                                handle_connection(stream, peer, store, barrier).await;
                            });
                        }
                        Ok(Err(err)) => {
                            tracing::warn!(error = %err, "accept error");
                        }
                        Err(_elapsed) => {
                            // Accept timeout: no connection produced, loop to recheck shutdown.
                        }
                    }
                }
            }

            reap_finished(&mut workers);
        }

        drop(listener);
        shutdown_workers(workers).await;
        Ok(())
    }
}

/// Bind a TCP listener with `SO_REUSEADDR` and the configured backlog.
fn bind_with_backlog(addr: SocketAddr, backlog: u32) -> Result<TcpListener, ServerError> {
    use socket2::{Domain, Protocol, Socket, Type};

    let domain = if addr.is_ipv6() { Domain::IPV6 } else { Domain::IPV4 };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))
        .map_err(ServerError::Transport)?;
    socket.set_reuse_address(true).map_err(ServerError::Transport)?;
    socket.set_nonblocking(true).map_err(ServerError::Transport)?;
    socket.bind(&addr.into()).map_err(ServerError::Transport)?;
    let backlog = i32::try_from(backlog).unwrap_or(i32::MAX);
    socket.listen(backlog).map_err(ServerError::Transport)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener).map_err(ServerError::Transport)
}

/// Drop join results for workers that have already finished, without
/// blocking on the ones still running.
fn reap_finished(workers: &mut JoinSet<()>) {
    while workers.try_join_next().is_some() {}
}

/// Join every outstanding worker with a bounded deadline, then abort
/// whatever remains (`spec.md` §5).
async fn shutdown_workers(mut workers: JoinSet<()>) {
    let deadline = timeout(WORKER_JOIN_DEADLINE, async {
        while workers.join_next().await.is_some() {}
    });

    if deadline.await.is_err() {
        tracing::warn!("worker join deadline exceeded, aborting remaining sessions");
        workers.shutdown().await;
    }
}
