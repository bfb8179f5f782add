use embassy_executor::Spawner;
use embassy_net::{Runner, Stack};
use esp_hal::timer::timg::TimerGroup;
use esp_println::println;
use esp_radio::wifi::WifiDevice;

use super::config::{self, HEAP_BYTES};
use super::join::JoinController;
use super::net;
use super::settings::SettingsStore;
use super::stream;
use super::types::JoinOutcome;

pub fn run() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);
    esp_alloc::heap_allocator!(size: HEAP_BYTES);

    let mut settings = SettingsStore::new(peripherals.FLASH);
    match settings.init_or_repair() {
        Ok(persisted) => println!("boot: settings ok boot_count={}", persisted.boot_count),
        Err(err) => {
            println!("boot: settings init failed err={:?}", err);
            halt_forever();
        }
    }

    let net_runtime = match net::setup(peripherals.WIFI) {
        Ok(net_runtime) => net_runtime,
        Err(err) => {
            println!("{}", err);
            halt_forever();
        }
    };

    let join = JoinController::new(net_runtime.wifi_controller, net_runtime.stack);

    let mut executor = esp_rtos::embassy::Executor::new();
    let executor = unsafe { make_static(&mut executor) };
    executor.run(move |spawner| {
        spawner.must_spawn(net_task(net_runtime.net_runner));
        spawner.must_spawn(supervisor_task(spawner, join));
    });
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

/// Runs the join cycle to its terminal outcome and only then hands the
/// stack to the stream client. A failed join leaves the device idle on
/// purpose: there is no fallback without network access.
#[embassy_executor::task]
async fn supervisor_task(spawner: Spawner, mut join: JoinController) {
    match join.start_and_wait().await {
        JoinOutcome::Success => {
            println!("boot: station join ok ssid={}", config::station_ssid());
            spawner.must_spawn(stream_client_task(join.stack()));
            spawner.must_spawn(link_watch_task(join));
        }
        JoinOutcome::Failure => {
            println!(
                "boot: station join failed ssid={}; stream client not started",
                config::station_ssid()
            );
        }
    }
}

#[embassy_executor::task]
async fn stream_client_task(stack: Stack<'static>) {
    stream::run_stream_client(stack).await;
}

#[embassy_executor::task]
async fn link_watch_task(join: JoinController) {
    join.run_link_watch().await;
}

unsafe fn make_static<T>(value: &mut T) -> &'static mut T {
    unsafe { core::mem::transmute(value) }
}

fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
