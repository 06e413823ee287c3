use core::fmt::Write;

use heapless::String;
use log::warn;

use super::bar_width;
use super::constants::{
    POWER_ABSENT_POS, POWER_ABSENT_TEXT, POWER_BAR_HEIGHT_PX, POWER_BAR_Y, POWER_CURRENT_POS,
    POWER_ERROR_POS, POWER_POWER_POS, POWER_VOLTAGE_POS, SENSOR_ERROR_TEXT,
};
use crate::sensors::{PowerReading, Sensor};
use crate::surface::Surface;

pub(super) fn draw<S, P>(
    surface: &mut S,
    sensor: Option<&mut P>,
    max_power_mw: f32,
) -> Result<(), S::Error>
where
    S: Surface,
    P: Sensor<Reading = PowerReading>,
{
    let Some(sensor) = sensor else {
        let (x, y) = POWER_ABSENT_POS;
        return surface.draw_text(POWER_ABSENT_TEXT, x, y);
    };

    let reading = match sensor.read() {
        Ok(reading) => reading,
        Err(e) => {
            warn!("Power read failed: {}", e);
            let (x, y) = POWER_ERROR_POS;
            return surface.draw_text(SENSOR_ERROR_TEXT, x, y);
        }
    };

    let mut text: String<16> = String::new();
    write!(&mut text, "V:{:.2}V", reading.voltage_v).ok();
    surface.draw_text(&text, POWER_VOLTAGE_POS.0, POWER_VOLTAGE_POS.1)?;

    text.clear();
    write!(&mut text, "I:{:.0}mA", reading.current_ma).ok();
    surface.draw_text(&text, POWER_CURRENT_POS.0, POWER_CURRENT_POS.1)?;

    text.clear();
    write!(&mut text, "P:{:.0}mW", reading.power_mw).ok();
    surface.draw_text(&text, POWER_POWER_POS.0, POWER_POWER_POS.1)?;

    surface.draw_filled_rect(
        0,
        POWER_BAR_Y,
        bar_width(reading.power_mw, max_power_mw),
        POWER_BAR_HEIGHT_PX,
    )
}
