//! The `"#" CODE "#" BODY` message codec carried inside every frame's
//! (possibly encrypted) payload.
//!
//! Dispatch on `CODE` is an explicit tag, never a string-keyed method lookup —
//! an unrecognized code is a [`crate::ProtocolError::UnknownCode`], not a
//! silent no-op.

use std::fmt;

use crate::ProtocolError;

/// Every message code the chat protocol recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCode {
    Pubkey,
    Aeskey,
    Aesconf,
    Users,
    Usersconf,
    Login,
    Loginconf,
    Regstr,
    Regstrconf,
    Getid,
    Getidconf,
    Sndmsg,
    Sndmsgconf,
    Rcvdmsg,
    Rcvdmsgconf,
    Buffer,
    Bufferconf,
    Database,
    Databaseconf,
    Deluser,
    Deluserconf,
    Loggedout,
}

impl MessageCode {
    /// The exact uppercase ASCII token used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pubkey => "PUBKEY",
            Self::Aeskey => "AESKEY",
            Self::Aesconf => "AESCONF",
            Self::Users => "USERS",
            Self::Usersconf => "USERSCONF",
            Self::Login => "LOGIN",
            Self::Loginconf => "LOGINCONF",
            Self::Regstr => "REGSTR",
            Self::Regstrconf => "REGSTRCONF",
            Self::Getid => "GETID",
            Self::Getidconf => "GETIDCONF",
            Self::Sndmsg => "SNDMSG",
            Self::Sndmsgconf => "SNDMSGCONF",
            Self::Rcvdmsg => "RCVDMSG",
            Self::Rcvdmsgconf => "RCVDMSGCONF",
            Self::Buffer => "BUFFER",
            Self::Bufferconf => "BUFFERCONF",
            Self::Database => "DATABASE",
            Self::Databaseconf => "DATABASECONF",
            Self::Deluser => "DELUSER",
            Self::Deluserconf => "DELUSERCONF",
            Self::Loggedout => "LOGGEDOUT",
        }
    }

    /// Parse a wire token back into a code.
    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        Ok(match token {
            "PUBKEY" => Self::Pubkey,
            "AESKEY" => Self::Aeskey,
            "AESCONF" => Self::Aesconf,
            "USERS" => Self::Users,
            "USERSCONF" => Self::Usersconf,
            "LOGIN" => Self::Login,
            "LOGINCONF" => Self::Loginconf,
            "REGSTR" => Self::Regstr,
            "REGSTRCONF" => Self::Regstrconf,
            "GETID" => Self::Getid,
            "GETIDCONF" => Self::Getidconf,
            "SNDMSG" => Self::Sndmsg,
            "SNDMSGCONF" => Self::Sndmsgconf,
            "RCVDMSG" => Self::Rcvdmsg,
            "RCVDMSGCONF" => Self::Rcvdmsgconf,
            "BUFFER" => Self::Buffer,
            "BUFFERCONF" => Self::Bufferconf,
            "DATABASE" => Self::Database,
            "DATABASECONF" => Self::Databaseconf,
            "DELUSER" => Self::Deluser,
            "DELUSERCONF" => Self::Deluserconf,
            "LOGGEDOUT" => Self::Loggedout,
            other => return Err(ProtocolError::UnknownCode(other.to_string())),
        })
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed `"#" CODE ["#" BODY]` message.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerMessage {
    pub code: MessageCode,
    pub body: Option<String>,
}

impl InnerMessage {
    /// Build a bodyless message, e.g. `#USERS`.
    pub fn bare(code: MessageCode) -> Self {
        Self { code, body: None }
    }

    /// Build a message with a body, e.g. `#LOGINCONF#1`.
    pub fn with_body(code: MessageCode, body: impl Into<String>) -> Self {
        Self { code, body: Some(body.into()) }
    }

    /// Serialize to the plaintext form that is then framed and (usually) encrypted.
    pub fn to_plaintext(&self) -> String {
        match &self.body {
            Some(body) => format!("#{}#{}", self.code.as_str(), body),
            None => format!("#{}", self.code.as_str()),
        }
    }

    /// Parse a decrypted payload back into code + body.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let rest = text
            .strip_prefix('#')
            .ok_or_else(|| ProtocolError::UnknownCode(text.to_string()))?;
        match rest.split_once('#') {
            Some((code, body)) => Ok(Self::with_body(MessageCode::parse(code)?, body)),
            None => Ok(Self::bare(MessageCode::parse(rest)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_message_round_trips() {
        let m = InnerMessage::bare(MessageCode::Users);
        assert_eq!(m.to_plaintext(), "#USERS");
        assert_eq!(InnerMessage::parse("#USERS").unwrap(), m);
    }

    #[test]
    fn bodied_message_round_trips() {
        let m = InnerMessage::with_body(MessageCode::Loginconf, "1");
        assert_eq!(m.to_plaintext(), "#LOGINCONF#1");
        assert_eq!(InnerMessage::parse("#LOGINCONF#1").unwrap(), m);
    }

    #[test]
    fn body_may_contain_hash_separators() {
        let m = InnerMessage::with_body(MessageCode::Rcvdmsg, "1234#hello#world");
        assert_eq!(
            InnerMessage::parse(&m.to_plaintext()).unwrap().body.unwrap(),
            "1234#hello#world"
        );
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert!(matches!(InnerMessage::parse("#BOGUS#x"), Err(ProtocolError::UnknownCode(_))));
    }

    #[test]
    fn missing_leading_hash_is_an_error() {
        assert!(InnerMessage::parse("LOGIN#x").is_err());
    }
}
