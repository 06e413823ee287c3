use core::fmt::Write;

use heapless::String;
use log::{debug, warn};

use super::bar_width;
use super::constants::{
    DISTANCE_BAND_Y, DISTANCE_BAR_HEIGHT_PX, DISTANCE_BAR_Y, DISTANCE_MESSAGE_POS,
    DISTANCE_VALUE_POS, OUT_OF_RANGE_TEXT, SENSOR_ERROR_TEXT,
};
use crate::ranging::{Proximity, RangeFinder, RangingResult};
use crate::surface::Surface;

/// Horizontal position of each band label, roughly centred.
fn band_label_x(band: Proximity) -> i32 {
    match band {
        Proximity::VeryClose => 20,
        Proximity::Close => 40,
        Proximity::Near => 45,
        Proximity::Far => 50,
    }
}

pub(super) fn draw<S, R>(
    surface: &mut S,
    ranger: &mut R,
    max_distance_cm: f32,
) -> Result<(), S::Error>
where
    S: Surface,
    R: RangeFinder,
{
    let distance = match ranger.measure() {
        Ok(RangingResult::Distance(distance)) => distance,
        Ok(RangingResult::NoEcho(edge)) => {
            debug!("Out of range, {:?} edge missed", edge);
            let (x, y) = DISTANCE_MESSAGE_POS;
            return surface.draw_text(OUT_OF_RANGE_TEXT, x, y);
        }
        Err(e) => {
            warn!("Ranging line fault: {:?}", e);
            let (x, y) = DISTANCE_MESSAGE_POS;
            return surface.draw_text(SENSOR_ERROR_TEXT, x, y);
        }
    };

    let cm = distance.centimeters();
    let mut text: String<16> = String::new();
    write!(&mut text, "{:.1} cm", cm).ok();
    surface.draw_text(&text, DISTANCE_VALUE_POS.0, DISTANCE_VALUE_POS.1)?;

    surface.draw_filled_rect(
        0,
        DISTANCE_BAR_Y,
        bar_width(cm, max_distance_cm),
        DISTANCE_BAR_HEIGHT_PX,
    )?;

    let band = distance.proximity();
    surface.draw_text(band.label(), band_label_x(band), DISTANCE_BAND_Y)
}
