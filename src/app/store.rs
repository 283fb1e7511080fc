use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;
use wavewatch::face::{daily::DAILY_COUNT_RECORD_LEN, DailyCountRecord, DailyCountStore};

/// Daily count kept in the last flash sector.
pub(crate) struct FlashDailyCountStore<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
}

impl<'d> FlashDailyCountStore<'d> {
    pub(crate) fn new(flash_peripheral: esp_hal::peripherals::FLASH<'d>) -> Self {
        let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(FlashStorage::SECTOR_SIZE);
        Self { flash, offset }
    }
}

impl DailyCountStore for FlashDailyCountStore<'_> {
    fn load(&mut self) -> Option<DailyCountRecord> {
        let mut record = [0u8; DAILY_COUNT_RECORD_LEN];
        self.flash.read(self.offset, &mut record).ok()?;
        DailyCountRecord::from_record(&record)
    }

    fn save(&mut self, record: DailyCountRecord) {
        if self.load() == Some(record) {
            return;
        }
        if self.flash.write(self.offset, &record.record_bytes()).is_err() {
            log::warn!("daily count save failed at {:#x}", self.offset);
        }
    }
}
