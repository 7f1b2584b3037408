//! Wire messages exchanged between the two peers.
//!
//! Every message is a single UTF-8 line of the form `KIND|payload`. The payload
//! is the remainder of the text after the first separator, so free-text payloads
//! may themselves contain `|`.

use crate::error::{DuelError, Result};
use std::fmt;
use std::str::FromStr;

pub const SEPARATOR: char = '|';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Name,
    Guess,
    Stake,
    Roll,
    Balance,
    Exit,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Name => "NAME",
            Kind::Guess => "GUESS",
            Kind::Stake => "STAKE",
            Kind::Roll => "ROLL",
            Kind::Balance => "BALANCE",
            Kind::Exit => "EXIT",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NAME" => Ok(Kind::Name),
            "GUESS" => Ok(Kind::Guess),
            "STAKE" => Ok(Kind::Stake),
            "ROLL" => Ok(Kind::Roll),
            "BALANCE" => Ok(Kind::Balance),
            "EXIT" => Ok(Kind::Exit),
            other => Err(DuelError::malformed(format!("unknown kind '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Name(String),
    Guess(i64),
    Stake(i64),
    Roll(i64),
    Balance(i64),
    Exit(String),
}

impl Message {
    pub fn exit(reason: impl Into<String>) -> Self {
        Message::Exit(reason.into())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Message::Name(_) => Kind::Name,
            Message::Guess(_) => Kind::Guess,
            Message::Stake(_) => Kind::Stake,
            Message::Roll(_) => Kind::Roll,
            Message::Balance(_) => Kind::Balance,
            Message::Exit(_) => Kind::Exit,
        }
    }

    pub fn encode(&self) -> String {
        let payload = match self {
            Message::Name(text) | Message::Exit(text) => single_line(text),
            Message::Guess(v) | Message::Stake(v) | Message::Roll(v) | Message::Balance(v) => {
                v.to_string()
            }
        };
        format!("{}{}{}", self.kind(), SEPARATOR, payload)
    }

    pub fn decode(raw: &str) -> Result<Self> {
        let (kind, payload) = raw
            .split_once(SEPARATOR)
            .ok_or_else(|| DuelError::malformed(format!("missing separator in '{}'", raw)))?;

        let kind: Kind = kind.parse()?;
        let message = match kind {
            Kind::Name => Message::Name(payload.to_string()),
            Kind::Exit => Message::Exit(payload.to_string()),
            Kind::Guess => Message::Guess(parse_int(kind, payload)?),
            Kind::Stake => Message::Stake(parse_int(kind, payload)?),
            Kind::Roll => Message::Roll(parse_int(kind, payload)?),
            Kind::Balance => Message::Balance(parse_int(kind, payload)?),
        };
        Ok(message)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn parse_int(kind: Kind, payload: &str) -> Result<i64> {
    payload.trim().parse().map_err(|_| {
        DuelError::malformed(format!("{} payload '{}' is not an integer", kind, payload))
    })
}

// framing is line based, so free text must stay on one line
fn single_line(text: &str) -> String {
    text.replace(&['\r', '\n'][..], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_numeric() {
        assert_eq!(Message::Guess(3).encode(), "GUESS|3");
        assert_eq!(Message::Balance(-20).encode(), "BALANCE|-20");
    }

    #[test]
    fn test_decode_payload_keeps_extra_separators() {
        let msg = Message::decode("EXIT|alice quit | for now").unwrap();
        assert_eq!(msg, Message::exit("alice quit | for now"));
    }

    #[test]
    fn test_free_text_flattened_to_one_line() {
        let msg = Message::Name("bob\nsmith".to_string());
        assert_eq!(msg.encode(), "NAME|bob smith");
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(
            Message::decode("GUESS 3"),
            Err(DuelError::Malformed(_))
        ));
        assert!(matches!(
            Message::decode("STAKE|ten"),
            Err(DuelError::Malformed(_))
        ));
        assert!(matches!(
            Message::decode("SHOUT|hi"),
            Err(DuelError::Malformed(_))
        ));
        assert!(matches!(Message::decode("ROLL|"), Err(DuelError::Malformed(_))));
    }

    #[test]
    fn test_wait_is_not_a_wire_kind() {
        assert!(Message::decode("WAIT|").is_err());
    }
}
