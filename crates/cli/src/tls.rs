use anyhow::{Result, bail};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How the connection to the mail server is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TlsMode {
    None,
    Auto,
    #[default]
    SslOnConnect,
    StartTls,
    StartTlsWhenAvailable,
}

impl TlsMode {
    pub const ALL: [TlsMode; 5] = [
        TlsMode::None,
        TlsMode::Auto,
        TlsMode::SslOnConnect,
        TlsMode::StartTls,
        TlsMode::StartTlsWhenAvailable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Auto => "Auto",
            Self::SslOnConnect => "SslOnConnect",
            Self::StartTls => "StartTls",
            Self::StartTlsWhenAvailable => "StartTlsWhenAvailable",
        }
    }

    /// Literals accepted on the command line, in display order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::as_str)
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TlsMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::ALL.into_iter().find(|m| m.as_str() == s) {
            Some(mode) => Ok(mode),
            None => bail!("unknown TLS mode: {s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in TlsMode::names() {
            let mode: TlsMode = name.parse().unwrap();
            assert_eq!(mode.to_string(), name);
        }
        assert_eq!(TlsMode::default().as_str(), "SslOnConnect");
        assert!("sslonconnect".parse::<TlsMode>().is_err());
    }
}
