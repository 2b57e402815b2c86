//! Line protocol spoken by the ptrace interceptor helper.
//!
//! The helper writes plain-text lines to stdout describing one syscall
//! entry/exit at a time, terminated by a control line, and waits for a
//! single reply line on stdin before it advances the traced process.

#![deny(unsafe_code)]

pub mod control;
pub mod filter;
pub mod syscall;

mod error;

pub use control::ControlLine;
pub use error::TracerError;
pub use filter::AutoskipFilter;
pub use syscall::{Arg, ArgType, Direction, Syscall};
