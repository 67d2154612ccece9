//! Error types for flightpad.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer and protocol-layer
//! failures are both captured here. Note that most inbound-path failures
//! (malformed datagrams, beacon noise) are deliberately *not* errors:
//! broadcast UDP routinely carries non-matching traffic, so the decoders
//! reject it silently instead of surfacing it.

/// The error type for all flightpad operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (UDP socket creation, bind, or send failure).
    ///
    /// Transport errors are reported once and leave the component inert;
    /// recovery requires an explicit reconnect from the caller. There is no
    /// internal retry loop.
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol-level error (frame built from invalid arguments).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// An invalid parameter was passed to a client operation
    /// (e.g. a host string that does not parse as an address).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No session endpoint has been established.
    #[error("not connected")]
    NotConnected,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("bind failed".into());
        assert_eq!(e.to_string(), "transport error: bind failed");
    }

    #[test]
    fn error_display_protocol() {
        let e = Error::Protocol("bad beacon".into());
        assert_eq!(e.to_string(), "protocol error: bad beacon");
    }

    #[test]
    fn error_display_invalid_parameter() {
        let e = Error::InvalidParameter("host does not parse".into());
        assert_eq!(e.to_string(), "invalid parameter: host does not parse");
    }

    #[test]
    fn error_display_not_connected() {
        let e = Error::NotConnected;
        assert_eq!(e.to_string(), "not connected");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("port taken"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }
}
