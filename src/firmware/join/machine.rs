use statig::blocking::IntoStateMachineExt as _;
use statig::prelude::*;

use super::super::types::{JoinEvent, JoinOutcome, JoinStep};

/// Station-join transition logic. Kept free of any radio plumbing so it
/// can be driven with synthetic events.
#[derive(Clone, Copy, Debug)]
pub(crate) struct JoinMachine {
    retry_ceiling: u32,
    attempts: u32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct DispatchContext {
    step: JoinStep,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            step: JoinStep::Ignored,
        }
    }
}

impl JoinMachine {
    fn new(retry_ceiling: u32) -> Self {
        Self {
            retry_ceiling,
            attempts: 0,
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl JoinMachine {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &JoinEvent) -> Outcome<State> {
        match event {
            JoinEvent::InterfaceStarted => {
                context.step = JoinStep::RequestConnect;
                Transition(State::connecting())
            }
            JoinEvent::Disconnected | JoinEvent::AddressAssigned => {
                context.step = JoinStep::Ignored;
                Handled
            }
        }
    }

    #[state]
    fn connecting(&mut self, context: &mut DispatchContext, event: &JoinEvent) -> Outcome<State> {
        match event {
            JoinEvent::AddressAssigned => {
                self.attempts = 0;
                context.step = JoinStep::Latch(JoinOutcome::Success);
                Transition(State::done())
            }
            JoinEvent::Disconnected => {
                // Strict less-than: exactly `retry_ceiling` reconnects are
                // issued after the first failure.
                if self.attempts < self.retry_ceiling {
                    self.attempts += 1;
                    context.step = JoinStep::RequestConnect;
                    Handled
                } else {
                    context.step = JoinStep::Latch(JoinOutcome::Failure);
                    Transition(State::done())
                }
            }
            JoinEvent::InterfaceStarted => {
                context.step = JoinStep::Ignored;
                Handled
            }
        }
    }

    #[state]
    fn done(&mut self, context: &mut DispatchContext, _event: &JoinEvent) -> Outcome<State> {
        context.step = JoinStep::Ignored;
        Handled
    }
}

pub struct JoinEngine {
    machine: statig::blocking::StateMachine<JoinMachine>,
}

impl JoinEngine {
    pub fn new(retry_ceiling: u32) -> Self {
        Self {
            machine: JoinMachine::new(retry_ceiling).state_machine(),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.machine.inner().attempts
    }

    pub fn handle(&mut self, event: JoinEvent) -> JoinStep {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.step
    }
}
