use config::{Config, ConfigError, Environment, File, FileFormat, Source};
use racecar_dynamics::{DEFAULT_MAX_STEPS, VehicleParameters};
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "RACECAR";

/// Everything the simulator binary reads from its settings file.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub vehicle: VehicleParameters,
    pub simulation: SimulationSettings,
    pub plot: PlotSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub max_steps: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings { max_steps: DEFAULT_MAX_STEPS }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub enabled: bool,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings { enabled: true }
    }
}

fn env_overrides() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Layer `env` over `file` and deserialize the result.
fn read_settings<S>(file: S, env: Environment) -> Result<Settings, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?
        .try_deserialize()
}

/// Load settings from `path`, then let `RACECAR_`-prefixed environment
/// variables override single values (e.g. `RACECAR_VEHICLE__CAR_MASS=1.2`).
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = read_settings(
        File::new(path, FileFormat::Toml).required(true),
        env_overrides(),
    );

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
