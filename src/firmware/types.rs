/// Terminal result of one join cycle, latched exactly once.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JoinOutcome {
    Success,
    Failure,
}

/// Asynchronous notifications fed into the join state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JoinEvent {
    InterfaceStarted,
    Disconnected,
    AddressAssigned,
}

/// Side effect requested by one state-machine dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JoinStep {
    RequestConnect,
    Latch(JoinOutcome),
    Ignored,
}
