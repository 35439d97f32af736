use crate::types::RemoteEndpoint;
use thiserror::Error;

/// A proc net address token that fails structural or numeric validation.
///
/// Decode failures are local: callers skip the token and keep scanning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed token `{token}`: {reason}")]
pub struct MalformedToken {
    pub token: String,
    pub reason: String,
}

impl MalformedToken {
    fn new(token: &str, reason: impl Into<String>) -> Self {
        Self {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Decode a `HEXADDR:HEXPORT` token from a `tcp` table (4-byte address).
pub fn decode_endpoint_v4(token: &str) -> Result<RemoteEndpoint, MalformedToken> {
    decode_endpoint(token, 4)
}

/// Decode a `HEXADDR:HEXPORT` token from a `tcp6` table (16-byte address).
pub fn decode_endpoint_v6(token: &str) -> Result<RemoteEndpoint, MalformedToken> {
    decode_endpoint(token, 16)
}

fn decode_endpoint(token: &str, addr_width: usize) -> Result<RemoteEndpoint, MalformedToken> {
    let (addr_hex, port_hex) = match token.split_once(':') {
        Some((a, p)) if !p.contains(':') => (a, p),
        _ => return Err(MalformedToken::new(token, "expected a single `:` separator")),
    };

    let port = u16::from_str_radix(port_hex, 16)
        .map_err(|e| MalformedToken::new(token, format!("invalid port hex `{port_hex}`: {e}")))?;

    let bytes = hex_bytes(addr_hex)
        .ok_or_else(|| MalformedToken::new(token, format!("invalid address hex `{addr_hex}`")))?;
    if bytes.len() != addr_width {
        return Err(MalformedToken::new(
            token,
            format!("address is {} bytes, expected {addr_width}", bytes.len()),
        ));
    }

    Ok(RemoteEndpoint {
        addr: render_addr(&bytes),
        port,
    })
}

/// The kernel writes each address word little-endian, so the printable
/// octets come from reading the decoded bytes backwards. For the 16-byte
/// form only the last four bytes are rendered, which is only a faithful
/// textual address for IPv4-mapped entries; a general IPv6 rendering is
/// intentionally not produced here.
fn render_addr(bytes: &[u8]) -> String {
    let tail = &bytes[bytes.len() - 4..];
    format!("{}.{}.{}.{}", tail[3], tail[2], tail[1], tail[0])
}

fn hex_bytes(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() || s.len() % 2 != 0 {
        return None;
    }
    (0..s.len() / 2)
        .map(|i| u8::from_str_radix(s.get(i * 2..i * 2 + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_loopback_v4() {
        let ep = decode_endpoint_v4("0100007F:1F90").unwrap();
        assert_eq!(ep.addr, "127.0.0.1");
        assert_eq!(ep.port, 8080);
    }

    #[test]
    fn decodes_wildcard_v4() {
        let ep = decode_endpoint_v4("00000000:0000").unwrap();
        assert_eq!(ep.addr, "0.0.0.0");
        assert_eq!(ep.port, 0);
    }

    #[test]
    fn byte_reversal_round_trips() {
        // Re-encoding the printed octets in reverse must reproduce the token.
        for hex in ["0100007F", "0101A8C0", "FFFFFFFF", "08080808", "0F02000A"] {
            let token = format!("{hex}:0050");
            let ep = decode_endpoint_v4(&token).unwrap();
            let octets: Vec<u8> = ep.addr.split('.').map(|o| o.parse().unwrap()).collect();
            let reencoded: String = octets
                .iter()
                .rev()
                .map(|b| format!("{b:02X}"))
                .collect();
            assert_eq!(reencoded, hex);
        }
    }

    #[test]
    fn v4_rejects_wrong_address_width() {
        let err = decode_endpoint_v4("1234:1F90").unwrap_err();
        assert_eq!(err.token, "1234:1F90");
        assert!(err.reason.contains("2 bytes"), "reason: {}", err.reason);
    }

    #[test]
    fn rejects_missing_or_extra_separator() {
        assert!(decode_endpoint_v4("0100007F1F90").is_err());
        assert!(decode_endpoint_v4("0100007F:1F90:00").is_err());
    }

    #[test]
    fn rejects_non_hex_port() {
        let err = decode_endpoint_v4("0100007F:XYZW").unwrap_err();
        assert!(err.reason.contains("port"));
    }

    #[test]
    fn rejects_over_wide_port() {
        // Five hex digits overflow the 16-bit port field.
        assert!(decode_endpoint_v4("0100007F:11F90").is_err());
    }

    #[test]
    fn rejects_non_hex_address() {
        assert!(decode_endpoint_v4("0100ZZ7F:1F90").is_err());
    }

    #[test]
    fn decodes_v4_mapped_v6() {
        let ep = decode_endpoint_v6("0000000000000000FFFF00000100007F:0050").unwrap();
        assert_eq!(ep.addr, "127.0.0.1");
        assert_eq!(ep.port, 80);
    }

    #[test]
    fn well_formed_v6_tokens_always_decode() {
        // The dotted-quad rendering draws from the last four bytes only.
        let ep = decode_endpoint_v6("00000000000000000000000001000000:0050").unwrap();
        assert_eq!(ep.addr, "0.0.0.1");
        assert_eq!(ep.port, 80);
    }

    #[test]
    fn v6_rejects_v4_width() {
        assert!(decode_endpoint_v6("0100007F:1F90").is_err());
    }
}
