//! Repeated-motion gesture detection for a wrist-worn watch face.
//!
//! [`event_engine`] turns raw accelerometer samples into a "gesture detected"
//! signal; [`face`] wires it to the host scheduler, sensor, clock and
//! actuators through small traits so it runs unchanged on the device and in
//! host tests.

#![cfg_attr(not(test), no_std)]

pub mod event_engine;
pub mod face;
