use core::sync::atomic::{AtomicU32, Ordering};

use esp_println::println;

static JOIN_CONNECT_ATTEMPTS: AtomicU32 = AtomicU32::new(0);
static JOIN_SUCCESSES: AtomicU32 = AtomicU32::new(0);
static JOIN_FAILURES: AtomicU32 = AtomicU32::new(0);
static JOIN_DISCONNECT_EVENTS: AtomicU32 = AtomicU32::new(0);
static LINK_DROPS: AtomicU32 = AtomicU32::new(0);
static STREAM_CONNECT_ATTEMPTS: AtomicU32 = AtomicU32::new(0);
static STREAM_CONNECT_FAILURES: AtomicU32 = AtomicU32::new(0);
static STREAM_SESSIONS: AtomicU32 = AtomicU32::new(0);
static STREAM_TEARDOWNS: AtomicU32 = AtomicU32::new(0);
static STREAM_SEND_FAILURES: AtomicU32 = AtomicU32::new(0);
static STREAM_RECV_FAILURES: AtomicU32 = AtomicU32::new(0);
static STREAM_BYTES_SENT: AtomicU32 = AtomicU32::new(0);
static STREAM_BYTES_RECEIVED: AtomicU32 = AtomicU32::new(0);

/// Point-in-time copy of every counter, for diagnostics and tests.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TelemetrySnapshot {
    pub join_connect_attempts: u32,
    pub join_successes: u32,
    pub join_failures: u32,
    pub join_disconnect_events: u32,
    pub link_drops: u32,
    pub stream_connect_attempts: u32,
    pub stream_connect_failures: u32,
    pub stream_sessions: u32,
    pub stream_teardowns: u32,
    pub stream_send_failures: u32,
    pub stream_recv_failures: u32,
    pub stream_bytes_sent: u32,
    pub stream_bytes_received: u32,
}

pub fn snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        join_connect_attempts: JOIN_CONNECT_ATTEMPTS.load(Ordering::Relaxed),
        join_successes: JOIN_SUCCESSES.load(Ordering::Relaxed),
        join_failures: JOIN_FAILURES.load(Ordering::Relaxed),
        join_disconnect_events: JOIN_DISCONNECT_EVENTS.load(Ordering::Relaxed),
        link_drops: LINK_DROPS.load(Ordering::Relaxed),
        stream_connect_attempts: STREAM_CONNECT_ATTEMPTS.load(Ordering::Relaxed),
        stream_connect_failures: STREAM_CONNECT_FAILURES.load(Ordering::Relaxed),
        stream_sessions: STREAM_SESSIONS.load(Ordering::Relaxed),
        stream_teardowns: STREAM_TEARDOWNS.load(Ordering::Relaxed),
        stream_send_failures: STREAM_SEND_FAILURES.load(Ordering::Relaxed),
        stream_recv_failures: STREAM_RECV_FAILURES.load(Ordering::Relaxed),
        stream_bytes_sent: STREAM_BYTES_SENT.load(Ordering::Relaxed),
        stream_bytes_received: STREAM_BYTES_RECEIVED.load(Ordering::Relaxed),
    }
}

pub(crate) fn record_join_connect_attempt() {
    JOIN_CONNECT_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_join_success() {
    JOIN_SUCCESSES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_join_failure() {
    JOIN_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_join_disconnect_event() {
    JOIN_DISCONNECT_EVENTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_link_drop() {
    LINK_DROPS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_stream_connect_attempt() {
    STREAM_CONNECT_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_stream_connect_failure() {
    STREAM_CONNECT_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_stream_session_open() {
    STREAM_SESSIONS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_stream_teardown() {
    STREAM_TEARDOWNS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_stream_send_failure() {
    STREAM_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_stream_recv_failure() {
    STREAM_RECV_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_stream_bytes_sent(bytes: usize) {
    STREAM_BYTES_SENT.fetch_add(saturating_u32(bytes), Ordering::Relaxed);
}

pub(crate) fn record_stream_bytes_received(bytes: usize) {
    STREAM_BYTES_RECEIVED.fetch_add(saturating_u32(bytes), Ordering::Relaxed);
}

/// One compact join-counters line, emitted whenever a join cycle reaches a
/// terminal outcome.
pub(crate) fn log_join_counters() {
    let counters = snapshot();
    println!(
        "station: counters attempts={} successes={} failures={} disconnects={} link_drops={}",
        counters.join_connect_attempts,
        counters.join_successes,
        counters.join_failures,
        counters.join_disconnect_events,
        counters.link_drops,
    );
}

/// One compact stream-counters line, emitted on every stream teardown.
pub(crate) fn log_stream_counters() {
    let counters = snapshot();
    println!(
        "stream: counters connects={} connect_errs={} sessions={} teardowns={} send_errs={} recv_errs={} sent={}B recvd={}B",
        counters.stream_connect_attempts,
        counters.stream_connect_failures,
        counters.stream_sessions,
        counters.stream_teardowns,
        counters.stream_send_failures,
        counters.stream_recv_failures,
        counters.stream_bytes_sent,
        counters.stream_bytes_received,
    );
}

fn saturating_u32(value: usize) -> u32 {
    if value > u32::MAX as usize {
        u32::MAX
    } else {
        value as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_observes_join_counters() {
        let before = snapshot();
        record_join_connect_attempt();
        record_join_disconnect_event();
        record_join_success();
        record_join_failure();
        record_link_drop();
        let after = snapshot();
        assert_eq!(
            after.join_connect_attempts - before.join_connect_attempts,
            1
        );
        assert_eq!(
            after.join_disconnect_events - before.join_disconnect_events,
            1
        );
        assert_eq!(after.join_successes - before.join_successes, 1);
        assert_eq!(after.join_failures - before.join_failures, 1);
        assert_eq!(after.link_drops - before.link_drops, 1);
    }

    #[test]
    fn snapshot_observes_stream_byte_counters() {
        let before = snapshot();
        record_stream_bytes_sent(22);
        record_stream_bytes_received(7);
        let after = snapshot();
        assert_eq!(after.stream_bytes_sent - before.stream_bytes_sent, 22);
        assert_eq!(
            after.stream_bytes_received - before.stream_bytes_received,
            7
        );
    }

    #[test]
    fn oversized_byte_counts_saturate() {
        assert_eq!(saturating_u32(usize::MAX), u32::MAX);
        assert_eq!(saturating_u32(42), 42);
    }
}
