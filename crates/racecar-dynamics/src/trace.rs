//! Recorded output of a race.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a race ended.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceOutcome {
    /// The car crossed the finish line.
    Finished,
    /// Distance went negative: the car rolled back past the start.
    Reversed,
}

/// Index-aligned time series of one race plus its summary values.
///
/// Every series has one entry per recorded sample, the `t = 0` seed included.
/// Acceleration and current draw are per-step quantities; their last entry is
/// a copy of the one before it so the series line up with `time`.
///
/// Only the simulator builds traces, so only `Serialize` is derived.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RaceTrace {
    time: Vec<f64>,
    velocity: Vec<f64>,
    acceleration: Vec<f64>,
    distance: Vec<f64>,
    current_draw: Vec<f64>,
    motor_speed: Vec<f64>,
    motor_torque: Vec<f64>,
    outcome: RaceOutcome,
}

impl RaceTrace {
    /// Sample times (s).
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Car velocity (m/s).
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Car acceleration (m/s²).
    pub fn acceleration(&self) -> &[f64] {
        &self.acceleration
    }

    /// Distance travelled (m).
    pub fn distance(&self) -> &[f64] {
        &self.distance
    }

    /// Motor current draw (A).
    pub fn current_draw(&self) -> &[f64] {
        &self.current_draw
    }

    /// Motor speed (rad/s).
    pub fn motor_speed(&self) -> &[f64] {
        &self.motor_speed
    }

    /// Motor torque (N·m).
    pub fn motor_torque(&self) -> &[f64] {
        &self.motor_torque
    }

    /// How the race ended.
    pub fn outcome(&self) -> RaceOutcome {
        self.outcome
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false for a trace produced by the simulator; the seed sample is
    /// recorded before the first step.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Number of integration steps taken.
    pub fn steps(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Velocity at the last recorded sample (m/s).
    pub fn final_velocity(&self) -> f64 {
        self.velocity.last().copied().unwrap_or_default()
    }

    /// Time at the last recorded sample (s).
    pub fn final_time(&self) -> f64 {
        self.time.last().copied().unwrap_or_default()
    }

    /// Distance at the last recorded sample (m).
    pub fn final_distance(&self) -> f64 {
        self.distance.last().copied().unwrap_or_default()
    }

    /// Highest velocity reached at any sample (m/s). `0.0` for an empty trace.
    pub fn peak_velocity(&self) -> f64 {
        max_of(&self.velocity)
    }

    /// Highest current drawn at any sample (A). `0.0` for an empty trace.
    pub fn peak_current(&self) -> f64 {
        max_of(&self.current_draw)
    }
}

fn max_of(series: &[f64]) -> f64 {
    series.iter().copied().reduce(f64::max).unwrap_or_default()
}

/// Growable builder for a [`RaceTrace`].
///
/// `record_sample` is called once for the seed and once per step;
/// `record_step` once per step, before the state is advanced.
#[derive(Debug, Default)]
pub(crate) struct TraceRecorder {
    time: Vec<f64>,
    velocity: Vec<f64>,
    acceleration: Vec<f64>,
    distance: Vec<f64>,
    current_draw: Vec<f64>,
    motor_speed: Vec<f64>,
    motor_torque: Vec<f64>,
}

impl TraceRecorder {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        TraceRecorder {
            time: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
            acceleration: Vec::with_capacity(capacity),
            distance: Vec::with_capacity(capacity),
            current_draw: Vec::with_capacity(capacity),
            motor_speed: Vec::with_capacity(capacity),
            motor_torque: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record_sample(
        &mut self,
        time: f64,
        velocity: f64,
        distance: f64,
        motor_speed: f64,
        motor_torque: f64,
    ) {
        self.time.push(time);
        self.velocity.push(velocity);
        self.distance.push(distance);
        self.motor_speed.push(motor_speed);
        self.motor_torque.push(motor_torque);
    }

    pub(crate) fn record_step(&mut self, acceleration: f64, current_draw: f64) {
        self.acceleration.push(acceleration);
        self.current_draw.push(current_draw);
    }

    /// Close the trace.
    ///
    /// The per-step series are one entry short of the per-sample ones (the
    /// seed has no step of its own), so their last entry is repeated once.
    pub(crate) fn finish(mut self, outcome: RaceOutcome) -> RaceTrace {
        if let Some(&last) = self.acceleration.last() {
            self.acceleration.push(last);
        }
        if let Some(&last) = self.current_draw.last() {
            self.current_draw.push(last);
        }
        debug_assert_eq!(self.acceleration.len(), self.time.len());
        debug_assert_eq!(self.current_draw.len(), self.time.len());

        RaceTrace {
            time: self.time,
            velocity: self.velocity,
            acceleration: self.acceleration,
            distance: self.distance,
            current_draw: self.current_draw,
            motor_speed: self.motor_speed,
            motor_torque: self.motor_torque,
            outcome,
        }
    }
}
