/// Default local agent HTTP port the tunnel forwards to
pub const DEFAULT_LOCAL_PORT: u16 = 3773;

/// Default timeout for a forwarded local request (60 seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Interval between keepalive pings on the tunnel connection (10 seconds)
pub const PING_INTERVAL_SECS: u64 = 10;

/// Initial delay for exponential backoff reconnection (1 second)
pub const RECONNECT_MIN_DELAY_SECS: u64 = 1;

/// Maximum delay for exponential backoff reconnection (60 seconds)
pub const RECONNECT_MAX_DELAY_SECS: u64 = 60;

/// Responses whose serialized form exceeds this are considered for compression (1 KiB)
pub const COMPRESSION_THRESHOLD_BYTES: usize = 1024;

/// Compression is only used when it shrinks the payload below this ratio (>10% saving)
pub const COMPRESSION_MIN_RATIO: f64 = 0.9;

/// Payloads above this size are logged as oversized (10 MiB)
pub const LARGE_PAYLOAD_WARN_BYTES: usize = 10 * 1024 * 1024;

/// Capacity of the outgoing message channel feeding the tunnel writer
pub const OUTGOING_CHANNEL_CAPACITY: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_values() {
        // Compile-time checks documenting constraints between constants
        const _: () = assert!(RECONNECT_MIN_DELAY_SECS < RECONNECT_MAX_DELAY_SECS);
        const _: () = assert!(PING_INTERVAL_SECS < RECONNECT_MAX_DELAY_SECS);
        const _: () = assert!(COMPRESSION_THRESHOLD_BYTES < LARGE_PAYLOAD_WARN_BYTES);
        const _: () = assert!(COMPRESSION_MIN_RATIO < 1.0);

        assert_eq!(COMPRESSION_THRESHOLD_BYTES, 1024);
        assert_eq!(LARGE_PAYLOAD_WARN_BYTES, 10 * 1024 * 1024);
    }
}
