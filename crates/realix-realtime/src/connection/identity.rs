//! Origin-derived client identity.

use std::fmt;

use realix_core::error::AppError;
use realix_core::result::AppResult;

/// The host portion of a peer's remote address, port discarded.
///
/// Treated as an opaque key: two connections share an identity exactly when
/// their host strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Derives an identity from a `host:port` remote address.
    ///
    /// IPv6 hosts must be bracketed (`[::1]:443`). A missing or non-numeric
    /// port, an empty host, or an unbracketed host containing colons is
    /// rejected.
    pub fn from_remote_addr(addr: &str) -> AppResult<Self> {
        let malformed = |reason: &str| {
            AppError::validation(format!("malformed remote address '{addr}': {reason}"))
        };

        let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| malformed("missing ']'"))?;
            let port = tail
                .strip_prefix(':')
                .ok_or_else(|| malformed("missing port"))?;
            (host, port)
        } else {
            let (host, port) = addr
                .rsplit_once(':')
                .ok_or_else(|| malformed("missing port"))?;
            if host.contains(':') {
                return Err(malformed("too many colons"));
            }
            (host, port)
        };

        if host.is_empty() {
            return Err(malformed("empty host"));
        }
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("invalid port"));
        }

        Ok(Self(host.to_string()))
    }

    /// The host string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
