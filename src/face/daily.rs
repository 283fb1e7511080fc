use crate::event_engine::types::CalendarDate;

pub const DAILY_COUNT_RECORD_MAGIC: u32 = 0x5741_5645;
pub const DAILY_COUNT_RECORD_VERSION: u8 = 1;
pub const DAILY_COUNT_RECORD_LEN: usize = 12;

/// Triggers counted for one calendar day.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DailyCounter {
    count: u16,
    date: Option<CalendarDate>,
}

impl DailyCounter {
    pub const fn new() -> Self {
        Self {
            count: 0,
            date: None,
        }
    }

    pub const fn restored(count: u16, date: CalendarDate) -> Self {
        Self {
            count,
            date: Some(date),
        }
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn date(&self) -> Option<CalendarDate> {
        self.date
    }

    /// Aligns the stored date with `today`. Returns true when the stored
    /// state changed.
    pub fn maybe_roll_day(&mut self, today: CalendarDate) -> bool {
        match self.date {
            Some(date) if date == today => false,
            Some(_) => {
                self.count = 0;
                self.date = Some(today);
                true
            }
            None => {
                self.date = Some(today);
                true
            }
        }
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DailyCountRecord {
    pub date: CalendarDate,
    pub count: u16,
}

impl DailyCountRecord {
    pub fn from_counter(counter: &DailyCounter) -> Option<Self> {
        counter.date().map(|date| Self {
            date,
            count: counter.count(),
        })
    }

    pub fn into_counter(self) -> DailyCounter {
        DailyCounter::restored(self.count, self.date)
    }

    pub fn record_bytes(self) -> [u8; DAILY_COUNT_RECORD_LEN] {
        let mut record = [0xFFu8; DAILY_COUNT_RECORD_LEN];
        record[0..4].copy_from_slice(&DAILY_COUNT_RECORD_MAGIC.to_le_bytes());
        record[4] = DAILY_COUNT_RECORD_VERSION;
        record[5..7].copy_from_slice(&self.date.year.to_le_bytes());
        record[7] = self.date.month;
        record[8] = self.date.day;
        record[9..11].copy_from_slice(&self.count.to_le_bytes());
        record[DAILY_COUNT_RECORD_LEN - 1] = checksum8(&record[..DAILY_COUNT_RECORD_LEN - 1]);
        record
    }

    pub fn from_record(record: &[u8; DAILY_COUNT_RECORD_LEN]) -> Option<Self> {
        if record.iter().all(|&byte| byte == 0xFF) {
            return None;
        }
        if u32::from_le_bytes([record[0], record[1], record[2], record[3]])
            != DAILY_COUNT_RECORD_MAGIC
        {
            return None;
        }
        if record[4] != DAILY_COUNT_RECORD_VERSION {
            return None;
        }
        if checksum8(&record[..DAILY_COUNT_RECORD_LEN - 1]) != record[DAILY_COUNT_RECORD_LEN - 1] {
            return None;
        }
        let month = record[7];
        let day = record[8];
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self {
            date: CalendarDate::new(u16::from_le_bytes([record[5], record[6]]), month, day),
            count: u16::from_le_bytes([record[9], record[10]]),
        })
    }
}

/// Where the daily count lives between power cycles.
pub trait DailyCountStore {
    fn load(&mut self) -> Option<DailyCountRecord>;
    fn save(&mut self, record: DailyCountRecord);
}

/// Keeps nothing; the count lasts as long as the face state.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;

impl DailyCountStore for NullStore {
    fn load(&mut self) -> Option<DailyCountRecord> {
        None
    }

    fn save(&mut self, _record: DailyCountRecord) {}
}

pub fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}
