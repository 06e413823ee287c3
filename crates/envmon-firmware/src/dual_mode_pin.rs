//! Dual-mode GPIO line for the bridged HC-SR04 on ESP32-S3
//!
//! The ranging module has TRIG and ECHO tied together, so the driver must
//! drive a trigger pulse and then listen on the same pad within a few
//! microseconds. The pad is configured once through esp-hal's [`Flex`] with
//! its input buffer permanently enabled; switching direction only toggles
//! the output driver with a single write to the GPIO enable registers.

use core::convert::Infallible;
use core::ptr::write_volatile;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use envmon_core::ranging::DualMode;
use esp_hal::gpio::{Flex, InputConfig, OutputConfig, Pin, Pull};

// ESP32-S3 GPIO register addresses for GPIO 0-31 (low bank)
const GPIO_ENABLE_W1TS_REG: u32 = 0x6000_4020; // Enable output driver
const GPIO_ENABLE_W1TC_REG: u32 = 0x6000_4024; // Disable output driver

// ESP32-S3 GPIO register addresses for GPIO 32-48 (high bank)
const GPIO_ENABLE1_W1TS_REG: u32 = 0x6000_4030;
const GPIO_ENABLE1_W1TC_REG: u32 = 0x6000_4034;

/// A GPIO line that switches between driving and listening at runtime.
///
/// The const generic `PIN` is the GPIO number (0-48 for ESP32-S3) and must
/// match the pin handed to [`DualModePin::new`].
///
/// # Example
/// ```no_run
/// let line = DualModePin::<13>::new(peripherals.GPIO13);
/// ```
pub struct DualModePin<'d, const PIN: u8> {
    flex: Flex<'d>,
}

impl<'d, const PIN: u8> DualModePin<'d, PIN> {
    /// Takes ownership of the pad and leaves it listening, output low.
    pub fn new(pin: impl Pin + 'd) -> Self {
        debug_assert_eq!(pin.number(), PIN, "DualModePin number mismatch");

        let mut flex = Flex::new(pin);
        flex.apply_input_config(&InputConfig::default().with_pull(Pull::None));
        flex.apply_output_config(&OutputConfig::default());
        flex.set_low();
        flex.set_input_enable(true);

        let mut line = Self { flex };
        line.set_as_input();
        line
    }

    /// Returns the enable register addresses and bit mask for this pin
    #[inline]
    const fn registers(&self) -> (u32, u32, u32) {
        if PIN < 32 {
            (GPIO_ENABLE_W1TS_REG, GPIO_ENABLE_W1TC_REG, 1u32 << PIN)
        } else {
            (GPIO_ENABLE1_W1TS_REG, GPIO_ENABLE1_W1TC_REG, 1u32 << (PIN - 32))
        }
    }
}

impl<const PIN: u8> DualMode for DualModePin<'_, PIN> {
    fn set_as_output(&mut self) {
        let (enable_set, _, bit) = self.registers();
        critical_section::with(|_| unsafe {
            write_volatile(enable_set as *mut u32, bit);
        });
    }

    fn set_as_input(&mut self) {
        let (_, enable_clr, bit) = self.registers();
        critical_section::with(|_| unsafe {
            write_volatile(enable_clr as *mut u32, bit);
        });
    }
}

impl<const PIN: u8> ErrorType for DualModePin<'_, PIN> {
    type Error = Infallible;
}

impl<const PIN: u8> OutputPin for DualModePin<'_, PIN> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.flex.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.flex.set_high();
        Ok(())
    }
}

impl<const PIN: u8> InputPin for DualModePin<'_, PIN> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.flex.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.flex.is_low())
    }
}
