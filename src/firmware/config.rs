use esp_radio::wifi::AuthMethod;

pub(crate) const STATION_SSID_DEFAULT: &str = "iptime";
pub(crate) const STATION_PASSWORD_DEFAULT: &str = "01234567";
/// Minimum acceptable authentication strength for the target network.
/// Open networks are allowed; an empty password still downgrades to
/// `AuthMethod::None` regardless of this floor.
pub(crate) const STATION_AUTH_FLOOR: AuthMethod = AuthMethod::None;
pub(crate) const JOIN_RETRY_CEILING: u32 = 10;

pub(crate) const REMOTE_ADDR: &str = "192.168.0.100";
pub(crate) const REMOTE_PORT: u16 = 3333;
pub(crate) const STREAM_PAYLOAD: &str = "hello from stationlink";
pub(crate) const SEND_CADENCE_MS: u64 = 2_000;
/// Inbound chunk capacity. One byte stays reserved for the terminator, so
/// a single receive delivers at most `INBOUND_BUF - 1` bytes.
pub(crate) const INBOUND_BUF: usize = 128;
pub(crate) const STREAM_RW_BUF: usize = 1024;

pub(crate) const HEAP_BYTES: usize = 96 * 1024;

pub(crate) const WIFI_RX_QUEUE_SIZE: usize = 3;
pub(crate) const WIFI_TX_QUEUE_SIZE: usize = 2;
pub(crate) const WIFI_STATIC_RX_BUF_NUM: u8 = 4;
pub(crate) const WIFI_DYNAMIC_RX_BUF_NUM: u16 = 8;
pub(crate) const WIFI_DYNAMIC_TX_BUF_NUM: u16 = 8;
pub(crate) const WIFI_RX_BA_WIN: u8 = 3;

pub(crate) fn station_ssid() -> &'static str {
    option_env!("STATIONLINK_WIFI_SSID")
        .or(option_env!("SSID"))
        .unwrap_or(STATION_SSID_DEFAULT)
}

pub(crate) fn station_password() -> &'static str {
    option_env!("STATIONLINK_WIFI_PASSWORD")
        .or(option_env!("PASSWORD"))
        .unwrap_or(STATION_PASSWORD_DEFAULT)
}
