//! The live-session registry: one entry per accepted connection, holding its
//! principal, symmetric cipher, and per-recipient delivery buffer.

use std::collections::HashMap;

use proconq_crypto::Cipher;
use proconq_protocol::SessionState;
use tokio::sync::mpsc::UnboundedSender;

/// Reserved principal for a session that has not logged in.
pub const GUEST: &str = "GUEST";
/// The sole administrative principal.
pub const ADMIN: &str = "ADMIN";

/// A live session's server-side state.
pub struct SessionHandle {
    pub id: u16,
    pub principal: String,
    pub cipher: Option<Cipher>,
    pub state: SessionState,
    /// Messages this session has sent, keyed by recipient, awaiting `RCVDMSGCONF`.
    pub buffer: HashMap<u16, Vec<String>>,
    /// Channel to push encrypted frames to this session's connection task.
    pub outbox: UnboundedSender<Vec<u8>>,
}

impl SessionHandle {
    pub fn new(id: u16, outbox: UnboundedSender<Vec<u8>>) -> Self {
        Self {
            id,
            principal: GUEST.to_string(),
            cipher: None,
            state: SessionState::Accepted,
            buffer: HashMap::new(),
            outbox,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.principal == ADMIN
    }
}

/// All live sessions, keyed by id.
#[derive(Default)]
pub struct Registry {
    sessions: HashMap<u16, SessionHandle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: SessionHandle) {
        self.sessions.insert(handle.id, handle);
    }

    pub fn remove(&mut self, id: u16) -> Option<SessionHandle> {
        self.sessions.remove(&id)
    }

    pub fn get(&self, id: u16) -> Option<&SessionHandle> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: u16) -> Option<&mut SessionHandle> {
        self.sessions.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionHandle> {
        self.sessions.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SessionHandle> {
        self.sessions.values_mut()
    }

    /// Every session whose principal equals `name`, downgraded to `GUEST`.
    ///
    /// Used by `DELUSER` to keep credential deletion and live-session
    /// downgrade atomic (both happen under the same server mutex).
    pub fn downgrade_principal(&mut self, name: &str) -> Vec<u16> {
        let mut downgraded = Vec::new();
        for session in self.sessions.values_mut() {
            if session.principal == name {
                session.principal = GUEST.to_string();
                downgraded.push(session.id);
            }
        }
        downgraded
    }
}
