use core::sync::atomic::{AtomicBool, Ordering};

use embassy_net::{Runner, Stack, StackResources};
use esp_hal::rng::Rng;
use esp_radio::wifi::{
    Config as WifiRuntimeConfig, InternalWifiError, WifiController, WifiDevice, WifiError,
};
use static_cell::StaticCell;

use super::config::{
    WIFI_DYNAMIC_RX_BUF_NUM, WIFI_DYNAMIC_TX_BUF_NUM, WIFI_RX_BA_WIN, WIFI_RX_QUEUE_SIZE,
    WIFI_STATIC_RX_BUF_NUM, WIFI_TX_QUEUE_SIZE,
};

pub(crate) struct NetRuntime {
    pub(crate) wifi_controller: WifiController<'static>,
    pub(crate) net_runner: Runner<'static, WifiDevice<'static>>,
    pub(crate) stack: Stack<'static>,
}

static SETUP_DONE: AtomicBool = AtomicBool::new(false);

/// One-time radio and network-stack construction. Must run exactly once
/// per process; a second call is rejected loudly instead of silently
/// re-initializing the radio.
pub(crate) fn setup(
    wifi: esp_hal::peripherals::WIFI<'static>,
) -> Result<NetRuntime, &'static str> {
    if SETUP_DONE.swap(true, Ordering::SeqCst) {
        return Err("boot: net setup called twice without teardown");
    }

    static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

    let radio_ctrl = esp_radio::init().map_err(|err| {
        esp_println::println!("boot: esp_radio::init err={:?}", err);
        "boot: esp_radio::init failed"
    })?;
    let radio_ctrl = RADIO_CTRL.init(radio_ctrl);
    let (wifi_controller, ifaces) = esp_radio::wifi::new(radio_ctrl, wifi, wifi_runtime_config())
        .map_err(|err| match err {
            WifiError::InvalidArguments => "boot: wifi init failed invalid_args",
            WifiError::Unsupported => "boot: wifi init failed unsupported",
            WifiError::NotInitialized => "boot: wifi init failed not_initialized",
            WifiError::InternalError(InternalWifiError::NoMem) => "boot: wifi init failed no_mem",
            _ => "boot: wifi init failed other",
        })?;

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    let (stack, net_runner) = embassy_net::new(
        ifaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::<3>::new()),
        seed,
    );

    Ok(NetRuntime {
        wifi_controller,
        net_runner,
        stack,
    })
}

fn wifi_runtime_config() -> WifiRuntimeConfig {
    WifiRuntimeConfig::default()
        .with_rx_queue_size(WIFI_RX_QUEUE_SIZE)
        .with_tx_queue_size(WIFI_TX_QUEUE_SIZE)
        .with_static_rx_buf_num(WIFI_STATIC_RX_BUF_NUM)
        .with_dynamic_rx_buf_num(WIFI_DYNAMIC_RX_BUF_NUM)
        .with_dynamic_tx_buf_num(WIFI_DYNAMIC_TX_BUF_NUM)
        .with_ampdu_rx_enable(false)
        .with_ampdu_tx_enable(false)
        .with_rx_ba_win(WIFI_RX_BA_WIN)
}
