//! Endpoint URL construction

/// Build a WebSocket endpoint URL for a host and path
///
/// The scheme follows the caller's security context: pass `secure = true`
/// when the surrounding page or service is itself served securely, since
/// secure origins require the `wss` scheme for the handshake to succeed.
///
/// # Examples
///
/// ```rust
/// use evsock_client::ws_endpoint;
///
/// assert_eq!(
///     ws_endpoint("example.com", "/ws/chat/5", true),
///     "wss://example.com/ws/chat/5"
/// );
/// assert_eq!(
///     ws_endpoint("localhost:8080", "ws/chat/5", false),
///     "ws://localhost:8080/ws/chat/5"
/// );
/// ```
pub fn ws_endpoint(host: &str, path: &str, secure: bool) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    if path.starts_with('/') {
        format!("{}://{}{}", scheme, host, path)
    } else {
        format!("{}://{}/{}", scheme, host, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_scheme() {
        assert_eq!(ws_endpoint("example.com", "/ws", true), "wss://example.com/ws");
    }

    #[test]
    fn test_insecure_scheme() {
        assert_eq!(
            ws_endpoint("localhost:8080", "/ws", false),
            "ws://localhost:8080/ws"
        );
    }

    #[test]
    fn test_missing_leading_slash() {
        assert_eq!(
            ws_endpoint("example.com", "ws/chat", false),
            "ws://example.com/ws/chat"
        );
    }
}
