use embedded_storage::{ReadStorage, Storage};
use esp_println::println;
use esp_storage::FlashStorage;

const SETTINGS_MAGIC: u32 = 0x534C_4E4B;
const SETTINGS_VERSION: u8 = 1;
const SETTINGS_RECORD_LEN: usize = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct PersistedSettings {
    pub(crate) boot_count: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum SettingsError {
    Flash,
    CorruptAfterRepair,
}

/// Persistent settings in the last flash sector. Must come up valid (or
/// be repaired) before the join controller starts.
pub(crate) struct SettingsStore<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
}

impl<'d> SettingsStore<'d> {
    pub(crate) fn new(flash_peripheral: esp_hal::peripherals::FLASH<'d>) -> Self {
        let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(FlashStorage::SECTOR_SIZE);
        Self { flash, offset }
    }

    /// Validates the persisted record, rewriting it when blank, corrupt or
    /// from an older format. A record that still fails verification after
    /// the rewrite is an environment problem boot cannot recover from.
    pub(crate) fn init_or_repair(&mut self) -> Result<PersistedSettings, SettingsError> {
        if let Some(settings) = self.load() {
            let updated = PersistedSettings {
                boot_count: settings.boot_count.saturating_add(1),
            };
            self.save(updated)?;
            return Ok(updated);
        }

        println!("boot: settings record blank or corrupt; rewriting");
        self.save(PersistedSettings { boot_count: 1 })?;
        match self.load() {
            Some(settings) => Ok(settings),
            None => Err(SettingsError::CorruptAfterRepair),
        }
    }

    fn load(&mut self) -> Option<PersistedSettings> {
        let mut record = [0u8; SETTINGS_RECORD_LEN];
        self.flash.read(self.offset, &mut record).ok()?;
        decode_record(&record)
    }

    fn save(&mut self, settings: PersistedSettings) -> Result<(), SettingsError> {
        let record = encode_record(settings);
        self.flash
            .write(self.offset, &record)
            .map_err(|_| SettingsError::Flash)
    }
}

fn decode_record(record: &[u8; SETTINGS_RECORD_LEN]) -> Option<PersistedSettings> {
    if record.iter().all(|&byte| byte == 0xFF) {
        return None;
    }
    if u32::from_le_bytes([record[0], record[1], record[2], record[3]]) != SETTINGS_MAGIC {
        return None;
    }
    if record[4] != SETTINGS_VERSION {
        return None;
    }
    if record[SETTINGS_RECORD_LEN - 1] != checksum8(&record[..SETTINGS_RECORD_LEN - 1]) {
        return None;
    }
    Some(PersistedSettings {
        boot_count: u32::from_le_bytes([record[5], record[6], record[7], record[8]]),
    })
}

fn encode_record(settings: PersistedSettings) -> [u8; SETTINGS_RECORD_LEN] {
    let mut record = [0xFFu8; SETTINGS_RECORD_LEN];
    record[0..4].copy_from_slice(&SETTINGS_MAGIC.to_le_bytes());
    record[4] = SETTINGS_VERSION;
    record[5..9].copy_from_slice(&settings.boot_count.to_le_bytes());
    record[SETTINGS_RECORD_LEN - 1] = checksum8(&record[..SETTINGS_RECORD_LEN - 1]);
    record
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}
