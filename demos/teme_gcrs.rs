//! TEME to GCRS conversion of an SGP4 state
//!
//! Propagates the Vanguard 1 element set from Vallado's worked example and
//! compares the GCRS result against the published J2000 vector.
//!
//! Run with: cargo run --example teme_gcrs

use nalgebra::Vector3;
use skytrack::framelib::Frame;
use skytrack::planetlib::EphemerisProvider;
use skytrack::sgp4lib::Sgp4Satellite;
use skytrack::time::Timescale;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ts = Timescale::default();
    let line1 = "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
    let line2 = "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";
    let sat = Sgp4Satellite::from_tle(line1, line2, Some("VANGUARD 1"), &ts)?;

    let t = ts.utc_day_of_year(2000, 182.78495062);
    let teme = sat.state_at(&t)?;
    println!("Satellite         : {sat}");
    println!("Time              : {}", t.utc_iso()?);
    println!("Pos vector (TEME) : {:?} km", teme.position.as_slice());

    let gcrs = teme.transform_to(Frame::Gcrs)?;
    println!("Pos vector (GCRS) : {:?} km", gcrs.position.as_slice());
    if let Some(v) = gcrs.velocity {
        println!("Vel vector (GCRS) : {:?} km/s", v.as_slice());
    }

    // Vallado p. 234, J2000
    let r_true = Vector3::new(-9059.9413786, 4659.6972000, 813.9588875);
    let v_true = Vector3::new(-2.233348094, -4.110136162, -3.157394074);
    println!("r GCRS diff       : {:.1} mm", (gcrs.position - r_true).norm() * 1e6);
    if let Some(v) = gcrs.velocity {
        println!("v GCRS diff       : {:.3} mm/s", (v - v_true).norm() * 1e6);
    }

    let back = gcrs.transform_to(Frame::Teme)?;
    println!(
        "round trip        : {:.3e} km",
        (back.position - teme.position).norm()
    );
    Ok(())
}
