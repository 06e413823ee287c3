//! Desktop simulator for the envmon environmental monitor.
//!
//! Runs the real `envmon-core` monitor (scheduler, screens, bridged-pin
//! ranging driver) against simulated sensors and a simulated HC-SR04 line
//! timed by the host clock. Frames are drawn into the core framebuffer and
//! printed to the terminal.
//!
//! ```text
//! envmon-simulator [settings.toml]
//! ```
//!
//! Stop with Ctrl+C; the goodbye screen is shown before exiting. Set
//! `RUST_LOG=debug` to follow screen transitions and echo timings.

mod hardware;
mod settings;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay};
use envmon_core::framebuffer::FrameBuffer;
use envmon_core::screens;
use envmon_core::screens::constants::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use envmon_core::sensors::probe::{self, EnvironmentalKind};
use envmon_core::sensors::{DetectedEnvironmental, SensorHub};
use envmon_core::{BridgedRanger, GraphicsSurface, Monitor};
use log::{info, warn};

use hardware::{
    HostClock, HostDelay, SimulatedEchoLine, SimulatedEnvironmental, SimulatedPowerMonitor,
};
use settings::SimulatorSettings;

/// Move the cursor home and clear the terminal before each frame.
const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

fn write_frame(out: &mut impl Write, text: &str) -> io::Result<()> {
    let border = "─".repeat(DISPLAY_WIDTH_PX as usize);
    writeln!(out, "{CLEAR_SCREEN}┌{border}┐")?;
    for line in text.lines() {
        writeln!(out, "│{line}│")?;
    }
    writeln!(out, "└{border}┘")?;
    out.flush()
}

/// Print a frame to stdout, boxed so the panel edges are visible.
fn print_frame(fb: &FrameBuffer) {
    let mut text = String::with_capacity(4 * 1024);
    // Writing into a String cannot fail.
    let _ = fb.render_text(&mut text);

    if let Err(e) = write_frame(&mut io::stdout().lock(), &text) {
        warn!("Failed to print frame: {}", e);
    }
}

/// Save the framebuffer contents as a PNG in OLED colours.
fn save_snapshot(fb: &mut FrameBuffer, path: &Path, scale: u32) -> Result<()> {
    let mut display = SimulatorDisplay::<BinaryColor>::new(Size::new(
        DISPLAY_WIDTH_PX,
        DISPLAY_HEIGHT_PX,
    ));
    // The simulator display starts blank, so replaying every change since
    // the last flush reproduces the frame.
    let Ok(()) = fb.flush(&mut display);

    let output_settings = OutputSettingsBuilder::new()
        .theme(BinaryColorTheme::OledBlue)
        .scale(scale)
        .build();
    display
        .to_rgb_output_image(&output_settings)
        .save_png(path)
        .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;

    info!("Saved last frame to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = SimulatorSettings::load(settings_path.as_deref())?;
    let hw = settings.hardware.clone();

    info!("Starting envmon simulator");
    info!(
        "Display: {}x{}, environmental sensor: {:?}, power sensor: {}",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, hw.environmental, hw.power_sensor
    );

    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))
        .context("Failed to register SIGINT handler")?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))
        .context("Failed to register SIGTERM handler")?;

    let clock = HostClock::new(Instant::now());
    let mut delay = HostDelay;

    let show_frames = settings.display.terminal;
    let mut surface = GraphicsSurface::new(FrameBuffer::new(), move |fb: &mut FrameBuffer| {
        if show_frames {
            print_frame(fb);
        }
        Ok(())
    });

    let Ok(()) = screens::show_initializing(&mut surface);

    // Capability probes run once; their outcome is fixed for the session.
    let environmental = DetectedEnvironmental::probe(
        || SimulatedEnvironmental::probe(EnvironmentalKind::Bme680, clock, &hw),
        || SimulatedEnvironmental::probe(EnvironmentalKind::Bme280, clock, &hw),
    );
    let power = probe::probe_optional("INA219", || SimulatedPowerMonitor::probe(clock, &hw));
    let ranger = BridgedRanger::new(SimulatedEchoLine::new(clock, hw.clone()), clock, HostDelay)
        .with_echo_timeout(settings.monitor.echo_timeout_us);

    let mut monitor = Monitor::new(
        surface,
        SensorHub::new(environmental, ranger, power),
        settings.monitor,
        0,
    )
    .map_err(|e| anyhow::anyhow!("Invalid monitor configuration: {}", e))?;

    monitor.splash(&mut delay);
    let mut run_clock = clock;
    monitor.run(&mut run_clock, &mut delay, || stop.load(Ordering::SeqCst));

    if let Some(path) = &settings.display.snapshot_png {
        let fb = monitor.surface_mut().target_mut();
        if let Err(e) = save_snapshot(fb, path, settings.display.scale) {
            warn!("{:#}", e);
        }
    }

    monitor.shutdown(&mut delay);
    info!("Simulator exiting");
    Ok(())
}
