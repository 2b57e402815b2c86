//! The accept loop: one tokio task per connection, sharing `ServerState`
//! behind a single mutex (see DESIGN.md for why registry, allocator, and
//! credential store live under the same lock).

use std::sync::Arc;

use proconq_crypto::KeyPair;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::connection::handle_connection;
use crate::state::ServerState;
use crate::store::SqliteStore;
use crate::ServerError;

/// Run the server until the listener errors. Each accepted connection's
/// failure is logged and does not affect any other connection.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let mut store = SqliteStore::open(&config.db_path).map_err(|e| ServerError::Store(e.to_string()))?;
    if let Some(password) = &config.admin_password {
        store.seed_admin(password).map_err(|e| ServerError::Store(e.to_string()))?;
        log::info!("[server] ADMIN principal is bootstrapped");
    } else {
        log::warn!("[server] PROCONQ_ADMIN_PASSWORD not set — ADMIN will never be able to log in");
    }

    let state = Arc::new(Mutex::new(ServerState::new(store)));
    let keypair = Arc::new(KeyPair::generate()?);

    let addr = format!("{}:{}", config.bind_host, config.bind_port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("[server] listening on {addr}");

    loop {
        let (stream, peer) = listener.accept().await?;
        log::debug!("[server] accepted connection from {peer}");
        let state = state.clone();
        let keypair = keypair.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, state, keypair).await {
                log::warn!("[server::connection] {peer}: {e}");
            }
        });
    }
}
