//! Error types for the race dynamics library.
//!
//! Everything that can go wrong is a parameter problem: either a vehicle
//! constant is outside its physical domain, or the parameters are valid but
//! describe a car that never settles at either end of the track.

use thiserror::Error;

/// Errors that can occur while configuring or running a race simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A vehicle parameter violates its domain constraint.
    /// This variant is returned by [`VehicleConfig::new`](crate::VehicleConfig::new).
    #[error("Invalid vehicle config: {parameter} {reason}")]
    InvalidConfig {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The constraint it violates.
        reason: &'static str,
    },
    /// The integration loop hit its step cap, or its state stopped being finite,
    /// before the car left the track.
    #[error(
        "Simulation diverged after {steps} steps (t = {time:.2} s, distance = {distance:.3} m)"
    )]
    DivergedSimulation {
        /// Integration steps taken when the run was abandoned.
        steps: usize,
        /// Simulated time at that point (s).
        time: f64,
        /// Distance travelled at that point (m).
        distance: f64,
    },
}
