//! # diffpt
//!
//! Recovers the Cornell box's right-wall reflectance by gradient descent through a
//! differentiable path tracer. Settings come from `DIFFPT_*` environment variables; log
//! verbosity from `RUST_LOG` (default `info`).

use diffpt_core::{config, training};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = config::from_env()?;
    let report = training::run(&cfg)?;

    let [r, g, b] = report.reflectance;
    match report.losses.last() {
        Some(loss) => log::info!("final loss {loss:.6}, reflectance ({r:.4}, {g:.4}, {b:.4})"),
        None => log::info!("reflectance ({r:.4}, {g:.4}, {b:.4})"),
    }
    log::info!(
        "target reflectance {:?}, snapshots in {}",
        training::TARGET_REFLECTANCE,
        cfg.output_dir.display()
    );
    Ok(())
}
