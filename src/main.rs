mod graphics; // brings `graphics.rs` in as `crate::graphics`
mod report;
mod settings;

use anyhow::Context;
use racecar_dynamics::{RaceSimulator, VehicleConfig};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

use graphics::window_conf;
use settings::DEFAULT_CONFIG_PATH;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let settings = settings::load_settings(&config_path)
        .with_context(|| format!("failed to load settings from {config_path}"))?;

    let vehicle = VehicleConfig::new(settings.vehicle).context("invalid vehicle parameters")?;
    info!(%vehicle, "Vehicle configured.");

    let simulator = RaceSimulator::new().with_max_steps(settings.simulation.max_steps);
    let race = simulator.run(&vehicle).context("race simulation failed")?;

    report::report(&vehicle, &race);

    if settings.plot.enabled {
        macroquad::Window::from_config(window_conf(), graphics::run_plot_loop(race));
    }

    Ok(())
}
