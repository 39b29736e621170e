//! Fixed-timestep race integration.
//!
//! Each step runs the motor → wheel torque path forward, integrates the car's
//! velocity with explicit Euler and its distance with the trapezoid rule, then
//! walks the new velocity back through the drivetrain to get the motor speed
//! (and so the motor torque) for the next step.

use tracing::{debug, trace, warn};

use crate::error::SimulationError;
use crate::trace::{RaceOutcome, RaceTrace, TraceRecorder};
use crate::vehicle::VehicleConfig;

/// Step cap used by [`RaceSimulator::default`].
///
/// The reference car finishes in well under a thousand 10 ms steps.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Mutable state of one run. Lives only inside [`RaceSimulator::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct SimulationState {
    time: f64,
    distance_travelled: f64,
    car_velocity: f64,
    motor_torque: f64,
    motor_speed: f64,
}

impl SimulationState {
    /// Car at rest on the start line; a stalled motor delivers its full torque.
    fn at_rest(config: &VehicleConfig) -> Self {
        SimulationState {
            time: 0.0,
            distance_travelled: 0.0,
            car_velocity: 0.0,
            motor_torque: config.stall_torque(),
            motor_speed: 0.0,
        }
    }

    fn on_track(&self, track_length: f64) -> bool {
        self.distance_travelled >= 0.0 && self.distance_travelled <= track_length
    }

    fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.distance_travelled.is_finite()
            && self.car_velocity.is_finite()
            && self.motor_torque.is_finite()
            && self.motor_speed.is_finite()
    }
}

/// Quantities computed during a step from the state at its start.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StepForces {
    current_draw: f64,
    acceleration: f64,
}

/// Runs races to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceSimulator {
    max_steps: usize,
}

impl Default for RaceSimulator {
    fn default() -> Self {
        RaceSimulator { max_steps: DEFAULT_MAX_STEPS }
    }
}

impl RaceSimulator {
    /// A simulator with the default step cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the step cap.
    ///
    /// A run that needs more than `max_steps` steps to leave the track fails
    /// with [`SimulationError::DivergedSimulation`].
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Returns the step cap.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Race `config` from a standing start until the car passes the finish
    /// line or rolls back behind the start.
    ///
    /// # Arguments
    ///
    /// * `config`: The validated vehicle to race.
    ///
    /// # Errors
    ///
    /// Returns `Err(SimulationError::DivergedSimulation)` if the car is still on
    /// the track after `max_steps` steps, or if the state stops being finite.
    ///
    /// # Returns
    ///
    /// The full trace, one sample per step plus the `t = 0` seed.
    pub fn run(&self, config: &VehicleConfig) -> Result<RaceTrace, SimulationError> {
        let track_length = config.track_length();
        debug!(%config, max_steps = self.max_steps, "Starting race simulation");

        let mut state = SimulationState::at_rest(config);
        let expected_steps = self.max_steps.min(1024);
        let mut recorder = TraceRecorder::with_capacity(expected_steps + 1);
        recorder.record_sample(
            state.time,
            state.car_velocity,
            state.distance_travelled,
            state.motor_speed,
            state.motor_torque,
        );

        let mut steps = 0usize;
        while state.on_track(track_length) {
            if steps >= self.max_steps {
                return Err(diverged(steps, &state));
            }

            let forces = step_forces(config, &state);
            recorder.record_step(forces.acceleration, forces.current_draw);

            state = advance(config, state, forces.acceleration);
            steps += 1;
            if !state.is_finite() {
                return Err(diverged(steps, &state));
            }

            trace!(
                time = state.time,
                velocity = state.car_velocity,
                distance = state.distance_travelled,
                "Step {}",
                steps
            );
            recorder.record_sample(
                state.time,
                state.car_velocity,
                state.distance_travelled,
                state.motor_speed,
                state.motor_torque,
            );
        }

        let outcome = if state.distance_travelled < 0.0 {
            RaceOutcome::Reversed
        } else {
            RaceOutcome::Finished
        };
        let race = recorder.finish(outcome);
        debug!(
            ?outcome,
            steps,
            final_time = race.final_time(),
            final_velocity = race.final_velocity(),
            "Race simulation finished"
        );
        Ok(race)
    }
}

fn diverged(steps: usize, state: &SimulationState) -> SimulationError {
    warn!(
        steps,
        time = state.time,
        distance = state.distance_travelled,
        velocity = state.car_velocity,
        "Race simulation did not leave the track"
    );
    SimulationError::DivergedSimulation {
        steps,
        time: state.time,
        distance: state.distance_travelled,
    }
}

/// Current draw and car acceleration for the state at the start of a step.
fn step_forces(config: &VehicleConfig, state: &SimulationState) -> StepForces {
    let current_draw = config.current_draw(state.motor_torque);

    let wheel_force = config.wheel_torque(state.motor_torque) / config.wheel_radius();
    let net_force = wheel_force - config.air_resistance(state.car_velocity);
    let acceleration = net_force / config.car_mass();

    StepForces { current_draw, acceleration }
}

/// Advance the state by one timestep under `acceleration`.
///
/// Velocity is forward Euler; distance uses the mean of the old and new
/// velocity. The motor speed follows the new velocity and the torque follows
/// the motor's torque-speed line, negative above the no-load speed.
fn advance(config: &VehicleConfig, state: SimulationState, acceleration: f64) -> SimulationState {
    let dt = config.timestep();
    let previous_velocity = state.car_velocity;

    let time = state.time + dt;
    let car_velocity = previous_velocity + dt * acceleration;
    let motor_speed = config.motor_speed_from_velocity(car_velocity);
    let motor_torque = config.motor_torque_at(motor_speed);
    let distance_travelled =
        state.distance_travelled + ((car_velocity + previous_velocity) / 2.0) * dt;

    SimulationState {
        time,
        distance_travelled,
        car_velocity,
        motor_torque,
        motor_speed,
    }
}
