//! Chat wire protocol — length-prefixed framing, the `#CODE#BODY` message
//! codec, and the session state machine that decides which codes a session
//! may legally receive next.

#![deny(unsafe_code)]

pub mod framing;
pub mod message;
pub mod session;

mod error;

pub use error::ProtocolError;
pub use framing::FramingError;
pub use message::{InnerMessage, MessageCode};
pub use session::SessionState;
