use embassy_net::tcp;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RecvDisposition {
    Deliver(usize),
    TearDown,
}

/// Decides what a completed receive means for the session. An orderly
/// remote close reads as zero bytes and is not distinguished from a short
/// read here: the session keeps polling, and only a hard error tears the
/// connection down.
pub fn recv_disposition(result: Result<usize, tcp::Error>) -> RecvDisposition {
    match result {
        Ok(len) => RecvDisposition::Deliver(len),
        Err(_) => RecvDisposition::TearDown,
    }
}

/// Terminates the inbound chunk at offset `len` and hands back the
/// received bytes as loggable text. `len` must leave the headroom byte
/// untouched, i.e. `len < buf.len()`.
pub fn terminate_inbound(buf: &mut [u8], len: usize) -> &str {
    debug_assert!(len < buf.len());
    buf[len] = 0;
    core::str::from_utf8(&buf[..len]).unwrap_or("<non_utf8>")
}
