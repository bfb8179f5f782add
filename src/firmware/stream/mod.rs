pub mod policy;

use core::net::Ipv4Addr;
use core::str::FromStr;

use embassy_net::{tcp::TcpSocket, IpEndpoint, Stack};
use embassy_time::{with_timeout, Duration, Timer};
use embedded_io_async::Write;
use esp_println::println;
use static_cell::StaticCell;

use super::config::{
    INBOUND_BUF, REMOTE_ADDR, REMOTE_PORT, SEND_CADENCE_MS, STREAM_PAYLOAD, STREAM_RW_BUF,
};
use super::telemetry;
use policy::{recv_disposition, terminate_inbound, RecvDisposition};

/// Best-effort persistent stream to the fixed remote endpoint. The outer
/// loop reconnects forever with no backoff; only a bad address literal
/// ends the task.
pub(crate) async fn run_stream_client(stack: Stack<'static>) {
    static RX_BUFFER: StaticCell<[u8; STREAM_RW_BUF]> = StaticCell::new();
    static TX_BUFFER: StaticCell<[u8; STREAM_RW_BUF]> = StaticCell::new();

    let rx_buffer = RX_BUFFER.init([0u8; STREAM_RW_BUF]);
    let tx_buffer = TX_BUFFER.init([0u8; STREAM_RW_BUF]);
    let mut inbound = [0u8; INBOUND_BUF];

    loop {
        let remote = match Ipv4Addr::from_str(REMOTE_ADDR) {
            Ok(addr) => IpEndpoint::from((addr, REMOTE_PORT)),
            Err(_) => {
                println!("stream: bad remote address literal {}", REMOTE_ADDR);
                return;
            }
        };

        let mut socket = TcpSocket::new(stack, &mut rx_buffer[..], &mut tx_buffer[..]);
        telemetry::record_stream_connect_attempt();
        if let Err(err) = socket.connect(remote).await {
            println!("stream: connect err={:?}", err);
            telemetry::record_stream_connect_failure();
            socket.close();
            continue;
        }
        println!("stream: connected to {}:{}", REMOTE_ADDR, REMOTE_PORT);
        telemetry::record_stream_session_open();

        run_session(&mut socket, &mut inbound).await;

        telemetry::record_stream_teardown();
        let _ = with_timeout(Duration::from_millis(250), socket.flush()).await;
        socket.close();
        telemetry::log_stream_counters();
    }
}

async fn run_session(socket: &mut TcpSocket<'_>, inbound: &mut [u8; INBOUND_BUF]) {
    loop {
        if let Err(err) = socket.write_all(STREAM_PAYLOAD.as_bytes()).await {
            println!("stream: send err={:?}", err);
            telemetry::record_stream_send_failure();
            return;
        }
        telemetry::record_stream_bytes_sent(STREAM_PAYLOAD.len());

        let read_result = socket.read(&mut inbound[..INBOUND_BUF - 1]).await;
        if let Err(err) = &read_result {
            println!("stream: recv err={:?}", err);
        }
        let received = match recv_disposition(read_result) {
            RecvDisposition::Deliver(len) => len,
            RecvDisposition::TearDown => {
                telemetry::record_stream_recv_failure();
                return;
            }
        };
        let text = terminate_inbound(inbound, received);
        telemetry::record_stream_bytes_received(received);
        println!("stream: recv {} bytes: {}", received, text);

        Timer::after(Duration::from_millis(SEND_CADENCE_MS)).await;
    }
}
