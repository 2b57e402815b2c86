//! A minimal chat client: performs the hybrid handshake and exposes
//! `send`/`recv` over the symmetric session it establishes.
//!
//! This is the thin external consumer needed to exercise the server's
//! framing, cipher, and session components end-to-end — it carries no
//! protocol logic of its own beyond the handshake.

#![deny(unsafe_code)]

mod error;

pub use error::ClientError;

use proconq_crypto::{Cipher, PublicKey};
use proconq_protocol::{framing, InnerMessage, MessageCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A connected, handshake-complete chat session.
pub struct ChatConnection {
    stream: TcpStream,
    cipher: Cipher,
}

impl ChatConnection {
    /// Connect to `addr` and perform the `PUBKEY`/`AESKEY`/`AESCONF` handshake.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let mut stream = TcpStream::connect(addr).await?;

        let payload = read_frame(&mut stream).await?.ok_or(ClientError::HandshakeFailed)?;
        let text = String::from_utf8_lossy(&payload).into_owned();
        let pubkey_msg = InnerMessage::parse(&text)?;
        if pubkey_msg.code != MessageCode::Pubkey {
            return Err(ClientError::HandshakeFailed);
        }
        let server_key = PublicKey::from_printable(&pubkey_msg.body.unwrap_or_default())?;

        let cipher = Cipher::generate();
        let body = format!("{}###{}", encode_hex(cipher.key_bytes()), encode_hex(cipher.iv_bytes()));
        let aeskey_msg = InnerMessage::with_body(MessageCode::Aeskey, body);
        let ciphertext = server_key.encrypt(aeskey_msg.to_plaintext().as_bytes())?;
        write_frame(&mut stream, &ciphertext).await?;

        let payload = read_frame(&mut stream).await?.ok_or(ClientError::HandshakeFailed)?;
        let plaintext = cipher.decrypt(&payload)?;
        let confirm = InnerMessage::parse(&String::from_utf8_lossy(&plaintext))?;
        if confirm.code != MessageCode::Aesconf {
            return Err(ClientError::HandshakeFailed);
        }

        Ok(Self { stream, cipher })
    }

    /// Send a command, encrypted under the session cipher.
    pub async fn send(&mut self, msg: InnerMessage) -> Result<(), ClientError> {
        let ciphertext = self.cipher.encrypt(msg.to_plaintext().as_bytes());
        write_frame(&mut self.stream, &ciphertext).await
    }

    /// Receive and decrypt the next message, or `None` if the server closed the connection.
    pub async fn recv(&mut self) -> Result<Option<InnerMessage>, ClientError> {
        let Some(payload) = read_frame(&mut self.stream).await? else { return Ok(None) };
        let plaintext = self.cipher.decrypt(&payload)?;
        Ok(Some(InnerMessage::parse(&String::from_utf8_lossy(&plaintext))?))
    }
}

async fn read_frame(stream: &mut TcpStream) -> Result<Option<Vec<u8>>, ClientError> {
    let mut len_buf = [0u8; 4];
    match stream.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let len = framing::decode_len(&len_buf)?;
    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

async fn write_frame(stream: &mut TcpStream, payload: &[u8]) -> Result<(), ClientError> {
    let frame = framing::encode_frame(payload)?;
    stream.write_all(&frame).await?;
    Ok(())
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
