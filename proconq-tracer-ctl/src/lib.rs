//! Drives the ptrace interceptor helper subprocess and exposes a
//! pause/resume interface for a UI or demo binary.

#![deny(unsafe_code)]

mod controller;
mod error;
mod pidof;

pub use controller::{PauseState, TracerSession, TracerTarget};
pub use error::CtlError;
pub use pidof::pids_by_name;
