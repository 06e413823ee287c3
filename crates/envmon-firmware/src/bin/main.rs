#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use core::cell::RefCell;

use embedded_hal_bus::i2c::RefCellDevice;
use envmon_core::screens;
use envmon_core::sensors::probe::{self, NotFitted};
use envmon_core::sensors::{DetectedEnvironmental, SensorHub};
use envmon_core::timing::MillisClock;
use envmon_core::{BridgedRanger, GraphicsSurface, Monitor, MonitorConfig, SensorError};
use envmon_firmware::clock::EspClock;
use envmon_firmware::dual_mode_pin::DualModePin;
use envmon_firmware::sensors::{self, Bme280Sensor, Ina219};
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::time::Rate;
use log::{error, info, warn};
use ssd1306::{I2CDisplayInterface, Ssd1306, prelude::*};

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal::main]
fn main() -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("envmon starting");

    let mut delay = Delay::new();
    let mut clock = EspClock;

    // 1. Shared I2C bus for the display and sensors
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .expect("Failed to configure I2C0")
    .with_sda(peripherals.GPIO4)
    .with_scl(peripherals.GPIO5);
    let i2c_bus = RefCell::new(i2c);

    // 2. SSD1306 128x64 OLED, flushed on every present
    let interface = I2CDisplayInterface::new(RefCellDevice::new(&i2c_bus));
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().expect("Failed to initialize SSD1306");
    let mut surface = GraphicsSurface::new(display, |d| d.flush());
    if let Err(e) = screens::show_initializing(&mut surface) {
        warn!("Failed to draw boot message: {:?}", e);
    }

    let found = sensors::scan(&mut RefCellDevice::new(&i2c_bus));
    info!("I2C devices found: {:02x?}", found.as_slice());

    // 3. Capability probes. This board has no BME680 driver, so the
    //    preferred slot is never fitted and the BME280 is tried directly.
    let environmental = DetectedEnvironmental::probe(
        || Err::<NotFitted, _>(SensorError::NotDetected { sensor: "BME680" }),
        || Bme280Sensor::probe(RefCellDevice::new(&i2c_bus), delay),
    );
    let power = probe::probe_optional("INA219", || Ina219::probe(RefCellDevice::new(&i2c_bus)));

    // 4. Bridged HC-SR04 on GPIO13
    let monitor_config = MonitorConfig::default();
    let ranger = BridgedRanger::new(DualModePin::<13>::new(peripherals.GPIO13), clock, delay)
        .with_echo_timeout(monitor_config.echo_timeout_us);

    let sensors = SensorHub::new(environmental, ranger, power);
    let mut monitor = match Monitor::new(surface, sensors, monitor_config, clock.now_ms()) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("Invalid monitor configuration: {}", e);
            loop {}
        }
    };

    monitor.splash(&mut delay);
    info!("Entering display loop");

    // Nothing asks the loop to stop on hardware.
    monitor.run(&mut clock, &mut delay, || false);

    monitor.shutdown(&mut delay);
    loop {}
}
