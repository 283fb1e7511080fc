use esp_hal::{
    i2c::master::{Error as I2cError, I2c},
    Blocking,
};
use wavewatch::{
    event_engine::RawSample,
    face::{Accelerometer, SensorError},
};

use super::config::{
    LIS2DW12_ADDR, LIS2DW12_CTRL2_BDU_INC, LIS2DW12_MODE_HIGH_PERF, LIS2DW12_REG_CTRL1,
    LIS2DW12_REG_CTRL2, LIS2DW12_REG_CTRL6, LIS2DW12_REG_OUT_X_L, LIS2DW12_REG_STATUS,
    LIS2DW12_REG_WHO_AM_I, LIS2DW12_STATUS_DRDY, LIS2DW12_WHO_AM_I_VALUE,
};

/// LIS2DW12 accelerometer polled over I2C at +/-2g, 14-bit.
pub(crate) struct Lis2dw12<'d> {
    bus: I2c<'d, Blocking>,
}

impl<'d> Lis2dw12<'d> {
    pub(crate) fn new(bus: I2c<'d, Blocking>) -> Self {
        Self { bus }
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut value = [0u8; 1];
        self.bus
            .write_read(LIS2DW12_ADDR, &[reg], &mut value)
            .map_err(bus_error)?;
        Ok(value[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.bus
            .write(LIS2DW12_ADDR, &[reg, value])
            .map_err(bus_error)
    }
}

impl Accelerometer for Lis2dw12<'_> {
    fn configure(&mut self, sample_rate_hz: u16) -> Result<(), SensorError> {
        if self.read_reg(LIS2DW12_REG_WHO_AM_I)? != LIS2DW12_WHO_AM_I_VALUE {
            return Err(SensorError::NotResponding);
        }
        let odr = odr_bits(sample_rate_hz).ok_or(SensorError::UnsupportedRate(sample_rate_hz))?;

        self.write_reg(LIS2DW12_REG_CTRL2, LIS2DW12_CTRL2_BDU_INC)?;
        // +/-2g full scale, ODR/2 bandwidth, no high-pass.
        self.write_reg(LIS2DW12_REG_CTRL6, 0x00)?;
        self.write_reg(LIS2DW12_REG_CTRL1, (odr << 4) | LIS2DW12_MODE_HIGH_PERF)?;
        Ok(())
    }

    fn disable(&mut self) {
        // ODR nibble zero is power-down.
        let _ = self.write_reg(LIS2DW12_REG_CTRL1, 0x00);
    }

    fn has_new_data(&mut self) -> Result<bool, SensorError> {
        let status = self.read_reg(LIS2DW12_REG_STATUS)?;
        Ok(status & LIS2DW12_STATUS_DRDY != 0)
    }

    fn read_sample(&mut self) -> Result<RawSample, SensorError> {
        let mut raw = [0u8; 6];
        self.bus
            .write_read(LIS2DW12_ADDR, &[LIS2DW12_REG_OUT_X_L], &mut raw)
            .map_err(bus_error)?;

        // Left-justified 14-bit samples.
        let x = i16::from_le_bytes([raw[0], raw[1]]) >> 2;
        let y = i16::from_le_bytes([raw[2], raw[3]]) >> 2;
        let z = i16::from_le_bytes([raw[4], raw[5]]) >> 2;
        Ok(RawSample::new(x, y, z))
    }
}

/// Slowest output data rate that still covers `sample_rate_hz`.
fn odr_bits(sample_rate_hz: u16) -> Option<u8> {
    match sample_rate_hz {
        1..=12 => Some(0x2),
        13..=25 => Some(0x3),
        26..=50 => Some(0x4),
        51..=100 => Some(0x5),
        101..=200 => Some(0x6),
        201..=400 => Some(0x7),
        _ => None,
    }
}

fn bus_error(err: I2cError) -> SensorError {
    match err {
        I2cError::AcknowledgeCheckFailed(_) => SensorError::NotResponding,
        _ => SensorError::Bus,
    }
}
