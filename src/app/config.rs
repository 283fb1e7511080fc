use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};

use super::types::{ClockAnchorCell, ToneRequest};

pub(crate) const UART_BAUD: u32 = 115_200;
pub(crate) const TIMESET_CMD_BUF_LEN: usize = 64;
pub(crate) const I2C_TIMEOUT_MS: u64 = 40;

// Local time assumed at boot until a TIMESET arrives: 2025-01-01 00:00:00.
pub(crate) const CLOCK_EPOCH_LOCAL_SECONDS: u64 = 1_735_689_600;

pub(crate) const LIS2DW12_ADDR: u8 = 0x19;
pub(crate) const LIS2DW12_REG_WHO_AM_I: u8 = 0x0F;
pub(crate) const LIS2DW12_WHO_AM_I_VALUE: u8 = 0x44;
pub(crate) const LIS2DW12_REG_CTRL1: u8 = 0x20;
pub(crate) const LIS2DW12_REG_CTRL2: u8 = 0x21;
pub(crate) const LIS2DW12_REG_CTRL6: u8 = 0x25;
pub(crate) const LIS2DW12_REG_STATUS: u8 = 0x27;
pub(crate) const LIS2DW12_REG_OUT_X_L: u8 = 0x28;
pub(crate) const LIS2DW12_STATUS_DRDY: u8 = 0x01;
// CTRL2: block data update, register auto-increment.
pub(crate) const LIS2DW12_CTRL2_BDU_INC: u8 = 0x0C;
// CTRL1 low nibble: high-performance mode.
pub(crate) const LIS2DW12_MODE_HIGH_PERF: u8 = 0x04;

pub(crate) static TONE_REQUESTS: Channel<CriticalSectionRawMutex, ToneRequest, 4> = Channel::new();
pub(crate) static CLOCK_ANCHOR: ClockAnchorCell = ClockAnchorCell::new();
