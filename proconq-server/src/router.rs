//! `SNDMSG` / `RCVDMSGCONF` / `BUFFER` semantics: per-sender delivery
//! buffers with no positive delivery acknowledgement (see DESIGN.md).

use proconq_protocol::{framing, InnerMessage, MessageCode};

use crate::state::ServerState;

/// Outcome of a `SNDMSG` request. `Forwarded` never produces a reply to the
/// sender — a positive `SNDMSGCONF` is never emitted.
pub enum SendOutcome {
    Forwarded,
    SelfSend,
    NoSuchRecipient,
}

/// Route `SNDMSG sender_id -> dst` carrying `text`.
///
/// On success, pushes an encrypted `RCVDMSG` frame onto the recipient's
/// outbox and records `text` in the sender's own delivery buffer.
pub fn handle_sndmsg(state: &mut ServerState, sender_id: u16, dst: u16, text: &str) -> SendOutcome {
    if dst == sender_id {
        return SendOutcome::SelfSend;
    }
    if !state.registry.get(dst).is_some_and(|s| s.cipher.is_some()) {
        return SendOutcome::NoSuchRecipient;
    }

    let sender = state.registry.get_mut(sender_id).expect("caller session must exist");
    sender.buffer.entry(dst).or_default().push(text.to_string());

    let recipient = state.registry.get(dst).expect("checked live above");
    let body = format!("{sender_id:04}#{text}");
    let msg = InnerMessage::with_body(MessageCode::Rcvdmsg, body);
    if let Some(cipher) = &recipient.cipher {
        let ciphertext = cipher.encrypt(msg.to_plaintext().as_bytes());
        if let Ok(frame) = framing::encode_frame(&ciphertext) {
            let _ = recipient.outbox.send(frame);
        }
    }
    SendOutcome::Forwarded
}

/// `RCVDMSGCONF src -> T` carrying `text`: remove the first matching entry
/// from `sessions[src].buffer[T]`. Absence is silent.
pub fn handle_rcvdmsgconf(state: &mut ServerState, acker_id: u16, src: u16, text: &str) {
    if let Some(sender) = state.registry.get_mut(src) {
        if let Some(queue) = sender.buffer.get_mut(&acker_id) {
            if let Some(pos) = queue.iter().position(|m| m == text) {
                queue.remove(pos);
            }
        }
    }
}

/// Render the calling session's outstanding `(target, text)` pairs as the
/// `BUFFERCONF` body, or the synthetic empty-buffer entry.
pub fn render_buffer(state: &ServerState, session_id: u16) -> String {
    let Some(session) = state.registry.get(session_id) else {
        return empty_entry();
    };
    let mut out = String::new();
    for (&dst, texts) in &session.buffer {
        for text in texts {
            out.push_str(&entry(dst, text));
        }
    }
    if out.is_empty() {
        empty_entry()
    } else {
        out
    }
}

fn entry(dst: u16, text: &str) -> String {
    format!("{:04}#{:04}#{}\n", text.len() + 1, dst, text)
}

fn empty_entry() -> String {
    let text = "Buffer is empty";
    format!("{:04}#0000#{}\n", text.len() + 1, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SessionHandle;
    use crate::store::SqliteStore;
    use proconq_crypto::Cipher;
    use tokio::sync::mpsc::unbounded_channel;

    fn ready_session(id: u16) -> (SessionHandle, tokio::sync::mpsc::UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = unbounded_channel();
        let mut handle = SessionHandle::new(id, tx);
        handle.cipher = Some(Cipher::generate());
        (handle, rx)
    }

    #[test]
    fn self_send_is_rejected() {
        let mut state = ServerState::new(SqliteStore::open(":memory:").unwrap());
        let (s, _rx) = ready_session(1234);
        state.registry.insert(s);
        assert!(matches!(handle_sndmsg(&mut state, 1234, 1234, "hi"), SendOutcome::SelfSend));
    }

    #[test]
    fn send_to_missing_recipient_is_rejected() {
        let mut state = ServerState::new(SqliteStore::open(":memory:").unwrap());
        let (s, _rx) = ready_session(1234);
        state.registry.insert(s);
        assert!(matches!(
            handle_sndmsg(&mut state, 1234, 9999, "hi"),
            SendOutcome::NoSuchRecipient
        ));
    }

    #[test]
    fn forward_then_ack_empties_buffer() {
        let mut state = ServerState::new(SqliteStore::open(":memory:").unwrap());
        let (s1, _rx1) = ready_session(1234);
        let (s2, mut rx2) = ready_session(5678);
        state.registry.insert(s1);
        state.registry.insert(s2);

        assert!(matches!(handle_sndmsg(&mut state, 1234, 5678, "hello"), SendOutcome::Forwarded));
        assert!(rx2.try_recv().is_ok());
        assert!(render_buffer(&state, 1234).contains("hello"));

        handle_rcvdmsgconf(&mut state, 5678, 1234, "hello");
        assert!(render_buffer(&state, 1234).contains("Buffer is empty"));
    }
}
