//! # proconq
//!
//! `proconq` wires together the syscall-tracing side and the chat-protocol
//! side of this workspace. It consists of four focused sub-crates:
//!
//! | Sub-crate            | Role                                               |
//! |-----------------------|----------------------------------------------------|
//! | `proconq-tracer`      | Line protocol for a ptrace helper's syscall events |
//! | `proconq-tracer-ctl`  | Async controller driving a helper subprocess       |
//! | `proconq-crypto`      | RSA-2048/OAEP + AES-256-CBC primitives             |
//! | `proconq-protocol`    | Frame codec, message codec, session state machine  |
//!
//! The server (`proconq-server`) and client (`proconq-client`) binaries build
//! on `crypto` and `protocol` directly; this crate exists so a single
//! dependency pulls in the whole surface for embedding or tooling.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Re-export of [`proconq_crypto`] — RSA keypair and AES-256-CBC cipher.
pub use proconq_crypto as crypto;

/// Re-export of [`proconq_protocol`] — framing, message codec, session state machine.
pub use proconq_protocol as protocol;

/// Re-export of [`proconq_tracer`] — the syscall line protocol.
pub use proconq_tracer as tracer;

/// Re-export of [`proconq_tracer_ctl`] — the async helper-process controller.
pub use proconq_tracer_ctl as tracer_ctl;

// ─── Convenience re-exports ─────────────────────────────────────────────────

pub use proconq_crypto::{Cipher, CryptoError, KeyPair, PublicKey};
pub use proconq_protocol::{FramingError, InnerMessage, MessageCode, ProtocolError, SessionState};
pub use proconq_tracer::{AutoskipFilter, Syscall, TracerError};
pub use proconq_tracer_ctl::{pids_by_name, CtlError, PauseState, TracerSession, TracerTarget};
