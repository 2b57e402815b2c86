//! The proconq chat server.
//!
//! | Module       | Responsibility                                          |
//! |--------------|----------------------------------------------------------|
//! | `config`     | Bind port, database path, admin bootstrap               |
//! | `store`      | SQLite-backed credential storage                        |
//! | `allocator`  | Random 4-digit session id allocation                    |
//! | `registry`   | Live sessions and their per-recipient delivery buffers  |
//! | `router`     | `SNDMSG` / `RCVDMSGCONF` / `BUFFER` semantics            |
//! | `connection` | Per-connection handshake and command loop               |
//! | `server`     | The accept loop                                          |

#![deny(unsafe_code)]

mod allocator;
mod config;
mod connection;
mod error;
mod registry;
mod router;
mod server;
mod state;
mod store;

pub use allocator::{AllocationError, IdAllocator};
pub use config::{ConfigError, ServerConfig};
pub use error::ServerError;
pub use server::run;
pub use store::{CredentialStore, SqliteStore};
