//! Trajectory interpolation of SGP4 output
//!
//! Propagates the ISS for 3 days in 4000 steps, fits degree-5 splines per
//! axis and reports the interpolation error against direct propagation over
//! the first 0.01 day at 1 s spacing.
//!
//! Run with: cargo run --example satellite_interpolation

use std::time::Instant;

use skytrack::interplib::{InterpolatorConfig, TrajectoryInterpolator};
use skytrack::planetlib::EphemerisProvider;
use skytrack::sgp4lib::Sgp4Satellite;
use skytrack::time::{Time, Timescale};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ts = Timescale::default();
    let line1 = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    let line2 = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";
    let sat = Sgp4Satellite::from_tle(line1, line2, Some("ISS"), &ts)?;

    let start = ts.utc((2019, 12, 9, 12, 0, 0.0));
    let duration_days = 3.0;
    let steps = 4000;
    let step_days = duration_days / steps as f64;
    println!("Propagation duration: {duration_days} days");
    println!("Step size: {:.1} sec", step_days * 86400.0);

    let timer = Instant::now();
    let epochs: Vec<Time> = (0..steps)
        .map(|i| start.add_days(i as f64 * step_days))
        .collect();
    let states = sat.states_at(&epochs)?;
    println!(
        "Took {:.3} ms to generate {steps} states",
        timer.elapsed().as_secs_f64() * 1e3
    );

    let config = InterpolatorConfig::from_json(
        r#"{ "method": { "kind": "spline", "degree": 5 }, "extrapolation": "raise" }"#,
    )?;
    let timer = Instant::now();
    let trajectory = TrajectoryInterpolator::from_states(&states, &config)?;
    println!(
        "Took {:.3} ms to build x, y, z interpolators",
        timer.elapsed().as_secs_f64() * 1e3
    );

    let mut worst = [0.0_f64; 3];
    for s in 0..864 {
        let t = start.add_seconds(s as f64);
        let (truth, _) = sat.propagate_teme(&t)?;
        let error = trajectory.position_at(&t)? - truth;
        for (w, e) in worst.iter_mut().zip(error.iter()) {
            *w = w.max(e.abs() * 1000.0);
        }
    }
    println!(
        "Max error over 0.01 day: x {:.4} m, y {:.4} m, z {:.4} m",
        worst[0], worst[1], worst[2]
    );

    let beyond = start.add_days(duration_days + 0.1);
    match trajectory.position_at(&beyond) {
        Ok(_) => println!("unexpected value outside the sampled span"),
        Err(e) => println!("Outside the span: {e}"),
    }
    Ok(())
}
