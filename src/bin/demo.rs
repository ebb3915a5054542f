//! Plays a short tour of the synthesis API on the default output device.

use std::thread::sleep;
use std::time::Duration;

use tactus::prelude::*;
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut session = Session::new();
    for device in session.available_devices() {
        info!(
            index = device.index,
            name = device.name,
            api = device.api_name,
            channels = device.max_channels,
            default = device.is_default,
            "output device"
        );
    }

    if session.default_device().is_none() {
        warn!("no output device available, exiting");
        return Ok(());
    }
    session.open()?;
    info!(
        channels = session.channel_count(),
        sample_rate = session.sample_rate(),
        "session open"
    );

    // a plain shaped tone
    let cue = sine(175.0) * asr(0.1, 0.3, 0.2)?;
    info!("playing sine + asr");
    session.play(0, cue.clone())?;
    sleep(Duration::from_millis(700));

    // frequency modulation and a chirp, back to back on a timeline
    let pattern = sine_fm(250.0, 20.0, 2.0) * adsr(0.1, 0.1, 0.2, 0.2)?
        << 0.1
        << chirp(120.0, 240.0) * envelope(0.5)?;
    info!(length = pattern.length(), "playing sequence");
    session.play(0, pattern.into())?;
    sleep(Duration::from_millis(1300));

    // sweep a spatializer target across all channels
    let channels = session.channel_count();
    let mut spatial = Spatializer::new();
    spatial.bind(&session);
    spatial.create_grid(1, channels)?;
    spatial.set_radius(0.5)?;
    spatial.set_target((0.0, 0.5));
    spatial.play(&sine(200.0))?;
    info!(channels, "sweeping spatializer target");
    for step in 0..=50 {
        spatial.set_target((step as f64 / 50.0, 0.5));
        sleep(Duration::from_millis(40));
    }
    spatial.stop()?;

    session.close()?;
    Ok(())
}
