//! Register-level drivers for the I2C sensors fitted to the board.
//!
//! Both drivers implement [`envmon_core::Sensor`] and are handed to the
//! startup probes, which decide once whether each sensor exists.

mod bme280;
mod ina219;

pub use bme280::Bme280Sensor;
pub use ina219::Ina219;

use embedded_hal::i2c::I2c;
use heapless::Vec;

/// Every valid 7-bit address outside the reserved ranges.
const SCAN_ADDRESSES: core::ops::RangeInclusive<u8> = 0x08..=0x77;

/// Addresses on the bus that acknowledge a one-byte read.
pub fn scan<I: I2c>(i2c: &mut I) -> Vec<u8, 112> {
    let mut found = Vec::new();
    for address in SCAN_ADDRESSES {
        let mut byte = [0u8; 1];
        if i2c.read(address, &mut byte).is_ok() {
            // Capacity equals the number of scanned addresses.
            found.push(address).ok();
        }
    }
    found
}
