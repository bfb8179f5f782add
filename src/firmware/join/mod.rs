mod machine;
#[cfg(test)]
mod tests;

use embassy_futures::select::{select, Either};
use embassy_net::Stack;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use esp_println::println;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, ScanMethod, WifiController, WifiEvent,
};

use super::config::{self, JOIN_RETRY_CEILING, STATION_AUTH_FLOOR};
use super::telemetry;
use super::types::{JoinEvent, JoinOutcome, JoinStep};

pub use machine::JoinEngine;

/// Owns the station interface and drives one join cycle to a latched
/// terminal outcome. Attempt counter and outcome signal are instance
/// state; nothing here lives in a process-wide global.
pub(crate) struct JoinController {
    controller: WifiController<'static>,
    stack: Stack<'static>,
    engine: JoinEngine,
    outcome: Signal<CriticalSectionRawMutex, JoinOutcome>,
}

impl JoinController {
    pub(crate) fn new(controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self {
            controller,
            stack,
            engine: JoinEngine::new(JOIN_RETRY_CEILING),
            outcome: Signal::new(),
        }
    }

    pub(crate) fn stack(&self) -> Stack<'static> {
        self.stack
    }

    /// Applies the station config, starts the interface and blocks the
    /// calling task until a terminal outcome is latched. No timeout:
    /// without network access the device has nothing else to do.
    pub(crate) async fn start_and_wait(&mut self) -> JoinOutcome {
        if let Err(err) = self.controller.set_config(&station_mode_config()) {
            println!("station: station config err={:?}", err);
            self.outcome.signal(JoinOutcome::Failure);
        } else if let Err(err) = self.controller.start_async().await {
            println!("station: start err={:?}", err);
            self.outcome.signal(JoinOutcome::Failure);
        } else {
            let step = self.apply(JoinEvent::InterfaceStarted);
            self.drive(step).await;
        }

        let outcome = match self.outcome.try_take() {
            Some(outcome) => outcome,
            None => {
                // Neither terminal value latched: a logic error worth
                // reporting, not a crash.
                println!("station: woke with no outcome latched");
                JoinOutcome::Failure
            }
        };
        telemetry::log_join_counters();
        outcome
    }

    /// Keeps servicing interface-level disconnects after the stream client
    /// has taken over. Each drop gets a fresh bounded join cycle; once a
    /// cycle exhausts its retries the watch only logs further drops.
    pub(crate) async fn run_link_watch(mut self) {
        loop {
            self.controller
                .wait_for_event(WifiEvent::StaDisconnected)
                .await;
            println!("station: link dropped; rejoining");
            telemetry::record_link_drop();

            // The interface is still started, so the fresh cycle begins
            // straight at the connect request.
            self.engine = JoinEngine::new(JOIN_RETRY_CEILING);
            let step = self.apply(JoinEvent::InterfaceStarted);
            self.drive(step).await;
            telemetry::log_join_counters();

            match self.outcome.try_take() {
                Some(JoinOutcome::Success) => println!("station: rejoined"),
                Some(JoinOutcome::Failure) | None => {
                    println!("station: rejoin exhausted; logging drops only");
                    loop {
                        self.controller
                            .wait_for_event(WifiEvent::StaDisconnected)
                            .await;
                        println!("station: link down");
                    }
                }
            }
        }
    }

    async fn drive(&mut self, mut step: JoinStep) {
        loop {
            match step {
                JoinStep::RequestConnect => {
                    telemetry::record_join_connect_attempt();
                    step = match self.controller.connect_async().await {
                        Ok(()) => self.await_address().await,
                        Err(err) => {
                            println!("station: connect err={:?}", err);
                            self.apply(JoinEvent::Disconnected)
                        }
                    };
                }
                JoinStep::Latch(outcome) => {
                    self.outcome.signal(outcome);
                    return;
                }
                JoinStep::Ignored => return,
            }
        }
    }

    async fn await_address(&mut self) -> JoinStep {
        let config_up = self.stack.wait_config_up();
        let dropped = self.controller.wait_for_event(WifiEvent::StaDisconnected);
        match select(config_up, dropped).await {
            Either::First(_) => {
                if let Some(cfg) = self.stack.config_v4() {
                    println!("station: ip={}", cfg.address.address());
                }
                self.apply(JoinEvent::AddressAssigned)
            }
            Either::Second(_) => {
                println!("station: disconnected before address assignment");
                self.apply(JoinEvent::Disconnected)
            }
        }
    }

    fn apply(&mut self, event: JoinEvent) -> JoinStep {
        if matches!(event, JoinEvent::Disconnected) {
            telemetry::record_join_disconnect_event();
        }
        let step = self.engine.handle(event);
        match step {
            JoinStep::RequestConnect if matches!(event, JoinEvent::Disconnected) => {
                println!(
                    "station: retrying connect attempt={}/{}",
                    self.engine.attempts(),
                    JOIN_RETRY_CEILING
                );
            }
            JoinStep::Latch(JoinOutcome::Success) => telemetry::record_join_success(),
            JoinStep::Latch(JoinOutcome::Failure) => {
                telemetry::record_join_failure();
                println!("station: retry ceiling reached; giving up");
            }
            _ => {}
        }
        step
    }
}

fn station_mode_config() -> ModeConfig {
    let ssid = config::station_ssid();
    let password = config::station_password();
    let auth_method = if password.is_empty() {
        AuthMethod::None
    } else {
        STATION_AUTH_FLOOR
    };
    ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(ssid.into())
            .with_password(password.into())
            .with_auth_method(auth_method)
            .with_scan_method(ScanMethod::AllChannels),
    )
}
