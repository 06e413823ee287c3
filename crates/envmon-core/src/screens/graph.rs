//! Line plot of the temperature history.
//!
//! The x axis is fixed to the history capacity, so the plot grows from the
//! left until the buffer is full. The y axis is rescaled every frame from
//! the visible min and max.

use core::fmt::Write;

use heapless::String;

use super::constants::{
    DISPLAY_WIDTH_PX, GRAPH_BASELINE_Y, GRAPH_COLLECTING_POS, GRAPH_COLLECTING_TEXT,
    GRAPH_DATA_POS, GRAPH_DATA_TEXT, GRAPH_HEIGHT_PX, GRAPH_MAX_LABEL_POS, GRAPH_MIN_LABEL_POS,
};
use crate::history::{GraphRange, HistoryBuffer};
use crate::surface::Surface;

/// Horizontal pixel for sample `index` of a buffer holding up to `capacity`.
fn sample_x(index: usize, capacity: usize) -> i32 {
    (index * DISPLAY_WIDTH_PX as usize / capacity) as i32
}

/// Vertical pixel for `value`, with `min` on the baseline.
fn sample_y(value: i32, min: i32, span: u32) -> i32 {
    let offset = i64::from(value.abs_diff(min)) * i64::from(GRAPH_HEIGHT_PX) / i64::from(span);
    GRAPH_BASELINE_Y - offset as i32
}

pub(super) fn draw<S: Surface, const N: usize>(
    surface: &mut S,
    history: &HistoryBuffer<N>,
) -> Result<(), S::Error> {
    let GraphRange::Span { min, max, span } = history.range() else {
        surface.draw_text(
            GRAPH_COLLECTING_TEXT,
            GRAPH_COLLECTING_POS.0,
            GRAPH_COLLECTING_POS.1,
        )?;
        return surface.draw_text(GRAPH_DATA_TEXT, GRAPH_DATA_POS.0, GRAPH_DATA_POS.1);
    };

    let capacity = history.capacity();
    let samples = history.snapshot();
    for (i, pair) in samples.windows(2).enumerate() {
        surface.draw_line(
            sample_x(i, capacity),
            sample_y(pair[0], min, span),
            sample_x(i + 1, capacity),
            sample_y(pair[1], min, span),
        )?;
    }

    let mut label: String<16> = String::new();
    write!(&mut label, "{}C", max).ok();
    surface.draw_text(&label, GRAPH_MAX_LABEL_POS.0, GRAPH_MAX_LABEL_POS.1)?;

    label.clear();
    write!(&mut label, "{}C", min).ok();
    surface.draw_text(&label, GRAPH_MIN_LABEL_POS.0, GRAPH_MIN_LABEL_POS.1)
}
