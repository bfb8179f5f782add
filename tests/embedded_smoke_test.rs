//! On-device async test harness for xtensa/ESP32.
//! Exercises the join engine and inbound termination without the radio.

#![no_std]
#![no_main]

#[cfg(test)]
#[embedded_test::tests(executor = esp_rtos::embassy::Executor::new())]
mod tests {
    use stationlink::firmware::join::JoinEngine;
    use stationlink::firmware::stream::policy::terminate_inbound;
    use stationlink::firmware::types::{JoinEvent, JoinOutcome, JoinStep};

    #[init]
    fn init() {
        let peripherals = esp_hal::init(esp_hal::Config::default());
        let timg0 = esp_hal::timer::timg::TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);
    }

    #[test]
    async fn join_cycle_rides_out_two_drops_then_succeeds() {
        embassy_time::Timer::after(embassy_time::Duration::from_millis(10)).await;

        let mut engine = JoinEngine::new(2);
        assert_eq!(
            engine.handle(JoinEvent::InterfaceStarted),
            JoinStep::RequestConnect
        );
        assert_eq!(
            engine.handle(JoinEvent::Disconnected),
            JoinStep::RequestConnect
        );
        assert_eq!(
            engine.handle(JoinEvent::Disconnected),
            JoinStep::RequestConnect
        );
        assert_eq!(
            engine.handle(JoinEvent::AddressAssigned),
            JoinStep::Latch(JoinOutcome::Success)
        );
        assert_eq!(engine.attempts(), 0);
    }

    #[test]
    async fn join_cycle_gives_up_past_the_ceiling() {
        let mut engine = JoinEngine::new(2);
        assert_eq!(
            engine.handle(JoinEvent::InterfaceStarted),
            JoinStep::RequestConnect
        );
        assert_eq!(
            engine.handle(JoinEvent::Disconnected),
            JoinStep::RequestConnect
        );
        assert_eq!(
            engine.handle(JoinEvent::Disconnected),
            JoinStep::RequestConnect
        );
        assert_eq!(
            engine.handle(JoinEvent::Disconnected),
            JoinStep::Latch(JoinOutcome::Failure)
        );
    }

    #[test]
    async fn inbound_chunk_terminates_cleanly() {
        let mut buf = [0xAAu8; 32];
        buf[..4].copy_from_slice(b"pong");
        assert_eq!(terminate_inbound(&mut buf, 4), "pong");
        assert_eq!(buf[4], 0);
    }
}
