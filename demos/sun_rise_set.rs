//! Sunrise and sunset from an interpolated altitude curve
//!
//! Samples the Sun's altitude over Istanbul every 10 minutes for one day,
//! finds the horizon crossings on an Akima interpolant and checks them
//! against a direct discrete search. The Moon is then checked against a
//! 5 degree minimum elevation.
//!
//! Run with: cargo run --example sun_rise_set

use skytrack::almanac::{
    discrete_crossings, AlmanacEventKind, AltitudeCurve, SamplingConfig, HORIZON_DEGREES,
};
use skytrack::planetlib::{EphemerisProvider, LowPrecisionMoon, LowPrecisionSun};
use skytrack::time::Timescale;
use skytrack::toposlib::WGS84;
use skytrack::units::km_to_au;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ts = Timescale::default();
    let istanbul = WGS84.latlon(41.015137, 28.979530, 0.0);
    let start = ts.utc((2020, 4, 12));
    let config = SamplingConfig::default();

    let curve = AltitudeCurve::sample(&LowPrecisionSun, &istanbul, &start, &config)?;
    println!("Observer: {istanbul}");
    println!("Window  : {} .. {}", start.utc_iso()?, curve.end().utc_iso()?);
    let sun = LowPrecisionSun.state_at(&start)?;
    println!("Sun     : {:.6} AU", km_to_au(sun.position.norm()));
    println!();

    let hours: Vec<_> = (0..24).step_by(3).map(|h| start.add_seconds(h as f64 * 3600.0)).collect();
    for (t, altitude) in hours.iter().zip(curve.altitudes_at(&hours)?) {
        println!("{}  {altitude:+7.2} deg", t.utc_strftime("%H:%M")?);
    }
    println!();

    let reference = discrete_crossings(
        &LowPrecisionSun,
        &istanbul,
        &start,
        &curve.end(),
        HORIZON_DEGREES,
        config.step_seconds,
    )?;

    for event in curve.rise_set() {
        let exact = reference.iter().find(|r| r.kind == event.kind);
        let miss = exact.map(|r| event.time.seconds_since(&r.time));
        println!(
            "{:<5} {}  (reference offset {})",
            format!("{:?}", event.kind),
            event.time.utc_strftime("%H:%M:%S UTC")?,
            miss.map_or("n/a".to_string(), |s| format!("{s:+.2} s"))
        );
    }
    for event in curve.culminations() {
        println!(
            "{:?} {} at {:.2} deg",
            event.kind,
            event.time.utc_strftime("%H:%M:%S UTC")?,
            event.altitude_deg
        );
    }
    println!();

    let min_elevation = 5.0;
    let moon = AltitudeCurve::sample(&LowPrecisionMoon, &istanbul, &start, &config)?;
    for event in moon.crossings(min_elevation) {
        let direction = match event.kind {
            AlmanacEventKind::Rise => "above",
            _ => "below",
        };
        println!(
            "Moon {direction} {min_elevation} deg at {}",
            event.time.utc_strftime("%H:%M:%S UTC")?
        );
    }
    Ok(())
}
