use super::super::types::{JoinEvent, JoinOutcome, JoinStep};
use super::JoinEngine;

fn started_engine(retry_ceiling: u32) -> JoinEngine {
    let mut engine = JoinEngine::new(retry_ceiling);
    assert_eq!(
        engine.handle(JoinEvent::InterfaceStarted),
        JoinStep::RequestConnect
    );
    engine
}

#[test]
fn ceiling_zero_latches_failure_on_first_disconnect() {
    let mut engine = started_engine(0);
    assert_eq!(
        engine.handle(JoinEvent::Disconnected),
        JoinStep::Latch(JoinOutcome::Failure)
    );
}

#[test]
fn exactly_ceiling_reconnects_before_failure() {
    let ceiling = 3;
    let mut engine = started_engine(ceiling);
    for attempt in 1..=ceiling {
        assert_eq!(
            engine.handle(JoinEvent::Disconnected),
            JoinStep::RequestConnect
        );
        assert_eq!(engine.attempts(), attempt);
    }
    assert_eq!(
        engine.handle(JoinEvent::Disconnected),
        JoinStep::Latch(JoinOutcome::Failure)
    );
}

#[test]
fn address_assignment_latches_success_immediately() {
    let mut engine = started_engine(10);
    assert_eq!(
        engine.handle(JoinEvent::AddressAssigned),
        JoinStep::Latch(JoinOutcome::Success)
    );
}

#[test]
fn success_resets_attempt_counter() {
    let mut engine = started_engine(5);
    for _ in 0..4 {
        assert_eq!(
            engine.handle(JoinEvent::Disconnected),
            JoinStep::RequestConnect
        );
    }
    assert_eq!(engine.attempts(), 4);
    assert_eq!(
        engine.handle(JoinEvent::AddressAssigned),
        JoinStep::Latch(JoinOutcome::Success)
    );
    assert_eq!(engine.attempts(), 0);
}

#[test]
fn events_before_interface_start_are_ignored() {
    let mut engine = JoinEngine::new(10);
    assert_eq!(engine.handle(JoinEvent::Disconnected), JoinStep::Ignored);
    assert_eq!(engine.handle(JoinEvent::AddressAssigned), JoinStep::Ignored);
    // The cycle still starts cleanly afterwards.
    assert_eq!(
        engine.handle(JoinEvent::InterfaceStarted),
        JoinStep::RequestConnect
    );
}

#[test]
fn interface_started_while_connecting_is_ignored() {
    let mut engine = started_engine(10);
    assert_eq!(
        engine.handle(JoinEvent::InterfaceStarted),
        JoinStep::Ignored
    );
    assert_eq!(engine.attempts(), 0);
}

#[test]
fn events_after_terminal_state_are_never_reprocessed() {
    let mut engine = started_engine(1);
    assert_eq!(
        engine.handle(JoinEvent::AddressAssigned),
        JoinStep::Latch(JoinOutcome::Success)
    );
    assert_eq!(engine.handle(JoinEvent::Disconnected), JoinStep::Ignored);
    assert_eq!(engine.handle(JoinEvent::AddressAssigned), JoinStep::Ignored);
    assert_eq!(
        engine.handle(JoinEvent::InterfaceStarted),
        JoinStep::Ignored
    );
}

#[test]
fn ceiling_two_with_two_drops_then_address_succeeds() {
    let mut engine = started_engine(2);
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
fn ceiling_two_with_three_drops_fails() {
    let mut engine = started_engine(2);
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
