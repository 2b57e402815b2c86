//! Per-connection handshake and command loop.
//!
//! All outbound frames — direct replies to this session's own requests and
//! frames pushed in by other sessions (`RCVDMSG`, `LOGGEDOUT`) — flow
//! through the session's single outbox channel into one writer task, so the
//! socket's write half is never touched from more than one place.

use std::sync::Arc;
use std::time::Duration;

use proconq_crypto::{Cipher, KeyPair};
use proconq_protocol::{framing, FramingError, InnerMessage, MessageCode, SessionState};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::Mutex;

use crate::registry::{SessionHandle, GUEST};
use crate::router;
use crate::state::ServerState;
use crate::ServerError;

const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Drive one accepted connection until it closes or errors.
pub async fn handle_connection(
    stream: TcpStream,
    state: Arc<Mutex<ServerState>>,
    keypair: Arc<KeyPair>,
) -> Result<(), ServerError> {
    let (mut rd, mut wr) = stream.into_split();
    let (tx, mut rx) = unbounded_channel::<Vec<u8>>();

    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if wr.write_all(&frame).await.is_err() {
                break;
            }
        }
    });

    let id = {
        let mut guard = state.lock().await;
        let id = guard.allocator.allocate()?;
        guard.registry.insert(SessionHandle::new(id, tx.clone()));
        id
    };
    log::info!("[server::connection] session {id} accepted");

    let result = run_session(&mut rd, id, &state, &keypair, &tx).await;

    {
        let mut guard = state.lock().await;
        guard.registry.remove(id);
        guard.allocator.release(id);
    }
    log::info!("[server::connection] session {id} closed");
    result
}

async fn run_session(
    rd: &mut (impl AsyncReadExt + Unpin),
    id: u16,
    state: &Arc<Mutex<ServerState>>,
    keypair: &Arc<KeyPair>,
    tx: &tokio::sync::mpsc::UnboundedSender<Vec<u8>>,
) -> Result<(), ServerError> {
    send_plain(tx, InnerMessage::with_body(MessageCode::Pubkey, keypair.public_key().to_printable()?))?;

    let cipher = loop {
        match read_frame(rd).await? {
            None => return Ok(()),
            Some(payload) => {
                let plaintext = keypair.decrypt(&payload)?;
                let text = String::from_utf8_lossy(&plaintext);
                let msg = InnerMessage::parse(&text)?;
                if msg.code != MessageCode::Aeskey {
                    continue;
                }
                let body = msg.body.unwrap_or_default();
                let Some((key_hex, iv_hex)) = body.split_once("###") else { continue };
                let (Some(key), Some(iv)) = (decode_hex(key_hex), decode_hex(iv_hex)) else { continue };
                break Cipher::from_parts(&key, &iv)?;
            }
        }
    };

    {
        let mut guard = state.lock().await;
        if let Some(session) = guard.registry.get_mut(id) {
            session.cipher = Some(cipher.clone());
            session.state = SessionState::Ready;
        }
    }
    send_encrypted(tx, &cipher, InnerMessage::bare(MessageCode::Aesconf))?;

    loop {
        let payload = match tokio::time::timeout(READ_TIMEOUT, read_frame(rd)).await {
            Ok(Ok(Some(p))) => p,
            Ok(Ok(None)) => return Ok(()),
            Ok(Err(e)) => return Err(e),
            Err(_elapsed) => continue,
        };
        let plaintext = cipher.decrypt(&payload)?;
        let text = String::from_utf8_lossy(&plaintext).into_owned();
        let msg = match InnerMessage::parse(&text) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("[server::connection] session {id} sent malformed frame: {e}");
                continue;
            }
        };
        if let Err(e) = SessionState::Ready.check_transition(msg.code) {
            log::warn!("[server::connection] session {id}: {e}");
            continue;
        }
        dispatch(id, msg, state, tx, &cipher).await?;
    }
}

async fn dispatch(
    id: u16,
    msg: InnerMessage,
    state: &Arc<Mutex<ServerState>>,
    tx: &tokio::sync::mpsc::UnboundedSender<Vec<u8>>,
    cipher: &Cipher,
) -> Result<(), ServerError> {
    match msg.code {
        MessageCode::Login => {
            let Some((name, password)) = msg.body.as_deref().and_then(|b| b.split_once('#')) else {
                return send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Loginconf, "0"));
            };
            let ok = if is_valid_name(name) {
                let mut guard = state.lock().await;
                let verified = guard.store.verify(name, password).map_err(|e| ServerError::Store(e.to_string()))?;
                if verified {
                    if let Some(session) = guard.registry.get_mut(id) {
                        session.principal = name.to_string();
                    }
                }
                verified
            } else {
                false
            };
            send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Loginconf, if ok { "1" } else { "0" }))
        }
        MessageCode::Regstr => {
            let Some((name, password)) = msg.body.as_deref().and_then(|b| b.split_once('#')) else {
                return send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Regstrconf, "0"));
            };
            let ok = if is_valid_name(name) {
                let mut guard = state.lock().await;
                guard.store.register(name, password).map_err(|e| ServerError::Store(e.to_string()))?
            } else {
                false
            };
            send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Regstrconf, if ok { "1" } else { "0" }))
        }
        MessageCode::Getid => {
            send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Getidconf, id.to_string()))
        }
        MessageCode::Users => {
            let guard = state.lock().await;
            let listing: String = guard
                .registry
                .iter()
                .map(|session| format!("{} #{}\n", session.principal, session.id))
                .collect();
            send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Usersconf, listing))
        }
        MessageCode::Sndmsg => {
            let Some(body) = msg.body else { return Ok(()) };
            let Some((dst_str, text)) = body.split_once(' ') else { return Ok(()) };
            let Ok(dst) = dst_str.parse::<u16>() else { return Ok(()) };
            let outcome = {
                let mut guard = state.lock().await;
                router::handle_sndmsg(&mut guard, id, dst, text)
            };
            match outcome {
                router::SendOutcome::Forwarded => Ok(()),
                router::SendOutcome::SelfSend | router::SendOutcome::NoSuchRecipient => {
                    send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Sndmsgconf, format!("0#{dst:04}")))
                }
            }
        }
        MessageCode::Rcvdmsgconf => {
            let Some(body) = msg.body else { return Ok(()) };
            let Some((src_str, text)) = body.split_once('#') else { return Ok(()) };
            if let Ok(src) = src_str.parse::<u16>() {
                let mut guard = state.lock().await;
                router::handle_rcvdmsgconf(&mut guard, id, src, text);
            }
            Ok(())
        }
        MessageCode::Buffer => {
            let guard = state.lock().await;
            let body = router::render_buffer(&guard, id);
            drop(guard);
            send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Bufferconf, body))
        }
        MessageCode::Database => {
            let mut guard = state.lock().await;
            let is_admin = guard.registry.get(id).is_some_and(|s| s.is_admin());
            if !is_admin {
                return send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Databaseconf, "FAILURE"));
            }
            let creds = guard.store.list().map_err(|e| ServerError::Store(e.to_string()))?;
            let body = if creds.is_empty() {
                "EMPTY".to_string()
            } else {
                creds.iter().map(|c| format!("{:04}#{}#{}\n", c.hash.len() + 1, c.name, c.hash)).collect()
            };
            send_encrypted(tx, cipher, InnerMessage::with_body(MessageCode::Databaseconf, body))
        }
        MessageCode::Deluser => {
            let Some(target) = msg.body else { return Ok(()) };
            let mut guard = state.lock().await;
            let is_admin = guard.registry.get(id).is_some_and(|s| s.is_admin());
            let ok = is_admin
                && target != GUEST
                && guard.store.delete(&target).map_err(|e| ServerError::Store(e.to_string()))?;
            let downgraded = if ok { guard.registry.downgrade_principal(&target) } else { Vec::new() };
            for other_id in downgraded {
                if let Some(other) = guard.registry.get(other_id) {
                    if let Some(other_cipher) = &other.cipher {
                        let _ = send_encrypted(&other.outbox, other_cipher, InnerMessage::bare(MessageCode::Loggedout));
                    }
                }
            }
            drop(guard);
            send_encrypted(
                tx,
                cipher,
                InnerMessage::with_body(MessageCode::Deluserconf, format!("{}#{target}", if ok { "1" } else { "0" })),
            )
        }
        _ => Ok(()),
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())
}

async fn read_frame(rd: &mut (impl AsyncReadExt + Unpin)) -> Result<Option<Vec<u8>>, ServerError> {
    let mut len_buf = [0u8; 4];
    match rd.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let len = framing::decode_len(&len_buf)?;
    let mut payload = vec![0u8; len];
    rd.read_exact(&mut payload).await.map_err(|_| FramingError::ShortRead)?;
    Ok(Some(payload))
}

fn send_plain(tx: &tokio::sync::mpsc::UnboundedSender<Vec<u8>>, msg: InnerMessage) -> Result<(), ServerError> {
    let frame = framing::encode_frame(msg.to_plaintext().as_bytes())?;
    let _ = tx.send(frame);
    Ok(())
}

fn send_encrypted(
    tx: &tokio::sync::mpsc::UnboundedSender<Vec<u8>>,
    cipher: &Cipher,
    msg: InnerMessage,
) -> Result<(), ServerError> {
    let ciphertext = cipher.encrypt(msg.to_plaintext().as_bytes());
    let frame = framing::encode_frame(&ciphertext)?;
    let _ = tx.send(frame);
    Ok(())
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
