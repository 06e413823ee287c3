use core::fmt::Write;

use heapless::String;
use log::warn;

use super::constants::{
    ENV_ABSENT_TEXT, ENV_HUMIDITY_POS, ENV_MESSAGE_POS, ENV_PRESSURE_POS, ENV_TEMPERATURE_POS,
    SENSOR_ERROR_TEXT,
};
use crate::history::TemperatureHistory;
use crate::sensors::{EnvironmentalReading, Sensor};
use crate::surface::Surface;

pub(super) fn draw<S, E>(
    surface: &mut S,
    sensor: Option<&mut E>,
    history: &mut TemperatureHistory,
) -> Result<(), S::Error>
where
    S: Surface,
    E: Sensor<Reading = EnvironmentalReading>,
{
    let Some(sensor) = sensor else {
        return surface.draw_text(ENV_ABSENT_TEXT, ENV_MESSAGE_POS.0, ENV_MESSAGE_POS.1);
    };

    let reading = match sensor.read() {
        Ok(reading) => reading,
        Err(e) => {
            warn!("Environmental read failed: {}", e);
            return surface.draw_text(SENSOR_ERROR_TEXT, ENV_MESSAGE_POS.0, ENV_MESSAGE_POS.1);
        }
    };

    let mut text: String<16> = String::new();
    write!(&mut text, "T:{:.1}C", reading.temperature_c).ok();
    surface.draw_text(&text, ENV_TEMPERATURE_POS.0, ENV_TEMPERATURE_POS.1)?;

    text.clear();
    write!(&mut text, "H:{:.1}%", reading.humidity_pct).ok();
    surface.draw_text(&text, ENV_HUMIDITY_POS.0, ENV_HUMIDITY_POS.1)?;

    text.clear();
    write!(&mut text, "P:{:.0}hPa", reading.pressure_hpa).ok();
    surface.draw_text(&text, ENV_PRESSURE_POS.0, ENV_PRESSURE_POS.1)?;

    match reading.temperature_whole_degrees() {
        Some(degrees) => history.append(degrees),
        None => warn!("Skipping non-finite temperature {}", reading.temperature_c),
    }
    Ok(())
}
