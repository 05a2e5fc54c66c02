//! TCP Server
//!
//! Accepts clients and runs one connection task per client, all on the
//! calling thread. The store is created with the server and dropped with it.
//!
//! ```text
//!            ┌───────────────────────────────┐
//!            │   LocalSet (one OS thread)    │
//!            │                               │
//! accept() ──┼─> conn task ─┐                │
//! accept() ──┼─> conn task ─┼─> Dispatcher ──┼─> Rc<RefCell<Store>>
//! accept() ──┼─> conn task ─┘                │
//!            └───────────────────────────────┘
//! ```
//!
//! Tasks only yield at socket reads and writes. A command runs start to
//! finish without yielding, so the store needs no lock.

use crate::commands::Dispatcher;
use crate::connection::{handle_connection, ConnectionStats};
use crate::storage::Store;
use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::task::{self, LocalSet};
use tracing::{debug, error, info, warn};

/// A bound server, ready to run.
///
/// The server is `!Send`: it must be run from a single-threaded runtime
/// (`#[tokio::main(flavor = "current_thread")]` or a `#[tokio::test]`).
pub struct Server {
    listener: TcpListener,
    dispatcher: Dispatcher,
    stats: Arc<ConnectionStats>,
}

impl Server {
    /// Binds a listener on `addr` with a fresh, empty store.
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::from_listener(listener))
    }

    pub fn from_listener(listener: TcpListener) -> Self {
        Self {
            listener,
            dispatcher: Dispatcher::new(Rc::new(RefCell::new(Store::new()))),
            stats: Arc::new(ConnectionStats::new()),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle to the store shared by all connections.
    pub fn store(&self) -> Rc<RefCell<Store>> {
        Rc::clone(self.dispatcher.store())
    }

    pub fn stats(&self) -> Arc<ConnectionStats> {
        Arc::clone(&self.stats)
    }

    /// Serves clients until `shutdown` completes.
    ///
    /// Returns an error only if the listener itself fails. Open connections
    /// are dropped when this returns.
    pub async fn run_until<F: Future>(self, shutdown: F) -> io::Result<()> {
        let local = LocalSet::new();
        local
            .run_until(async move {
                tokio::select! {
                    result = self.accept_loop() => result,
                    _ = shutdown => {
                        info!("Shutdown signal received, stopping server...");
                        Ok(())
                    }
                }
            })
            .await
    }

    async fn accept_loop(&self) -> io::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(client = %addr, "Accepted connection");
                    if let Err(e) = stream.set_nodelay(true) {
                        debug!(client = %addr, error = %e, "Failed to set TCP_NODELAY");
                    }
                    task::spawn_local(handle_connection(
                        stream,
                        addr,
                        self.dispatcher.clone(),
                        Arc::clone(&self.stats),
                    ));
                }
                Err(e) if is_per_connection_error(&e) => {
                    warn!(error = %e, "Failed to accept connection");
                }
                Err(e) => {
                    error!(error = %e, "Listener failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Accept errors caused by a single client giving up early.
fn is_per_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
    )
}
