#![warn(missing_docs)]
#![doc = "Longitudinal race dynamics for a small DC-motor-driven car."]
#![doc = ""]
#![doc = "This crate integrates a car from a standing start down a straight track,"]
#![doc = "coupling a linear torque-speed motor, a two-stage gear reduction and"]
#![doc = "quadratic air drag, and records velocity, acceleration, distance and"]
#![doc = "current draw at every timestep."]

pub mod error;
pub mod simulator;
pub mod trace;
pub mod vehicle;

pub use error::SimulationError;
pub use simulator::{DEFAULT_MAX_STEPS, RaceSimulator};
pub use trace::{RaceOutcome, RaceTrace};
pub use vehicle::{VehicleConfig, VehicleParameters};
