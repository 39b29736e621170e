//! Vehicle, drivetrain and motor constants.
//!
//! [`VehicleParameters`] is the plain, editable form (what a settings file
//! deserializes into). [`VehicleConfig`] is the validated, immutable form the
//! simulator accepts. The drivetrain and motor relations are methods on the
//! config because every one of them is a pure function of its constants.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Current drawn per newton-metre of motor torque (A/N·m), fitted for the stock motor.
pub const CURRENT_PER_TORQUE: f64 = 117.67;
/// Current drawn by the motor at zero torque (A).
pub const NO_LOAD_CURRENT: f64 = 0.45;

/// Raw vehicle constants, before validation.
///
/// The [`Default`] is the reference car: a 0.9 kg model on a 25 m track with a
/// 30:1 gearbox and a 9:1 final drive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParameters {
    /// Track length (m).
    pub track_length: f64,
    /// Air density (kg/m³).
    pub air_density: f64,
    /// First reduction stage. `1/30` means the gearbox output turns 30x slower than the motor.
    pub gear_box_ratio: f64,
    /// Motor torque at zero speed (N·m).
    pub stall_torque: f64,
    /// Motor speed at zero torque (rad/s).
    pub no_load_speed: f64,
    /// Wheel radius (m).
    pub wheel_radius: f64,
    /// Car mass (kg).
    pub car_mass: f64,
    /// Integration timestep (s).
    pub timestep: f64,
    /// Second reduction stage, between gearbox and wheel.
    pub chosen_gear_ratio: f64,
    /// Frontal area used for drag (m²).
    pub cross_sectional_area: f64,
    /// Fraction of torque surviving the gearbox.
    pub gear_box_efficiency: f64,
    /// Fraction of torque surviving the final drive.
    pub transmission_efficiency: f64,
    /// Aerodynamic drag coefficient.
    pub drag_coefficient: f64,
}

impl Default for VehicleParameters {
    fn default() -> Self {
        VehicleParameters {
            track_length: 25.0,
            air_density: 1.2,
            gear_box_ratio: 1.0 / 30.0,
            stall_torque: 0.05259,
            no_load_speed: 628.32,
            wheel_radius: 0.0325,
            car_mass: 0.9,
            timestep: 0.01,
            chosen_gear_ratio: 9.0,
            cross_sectional_area: 0.17 * 0.15,
            gear_box_efficiency: 0.75,
            transmission_efficiency: 0.6,
            drag_coefficient: 0.34,
        }
    }
}

/// Validated, immutable vehicle configuration.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleConfig {
    params: VehicleParameters,
}

fn require_positive(parameter: &'static str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() {
        return Err(SimulationError::InvalidConfig { parameter, reason: "must be finite" });
    }
    if value <= 0.0 {
        return Err(SimulationError::InvalidConfig { parameter, reason: "must be positive" });
    }
    Ok(())
}

fn require_efficiency(parameter: &'static str, value: f64) -> Result<(), SimulationError> {
    // NaN fails both comparisons, so it lands here too.
    if !(value > 0.0 && value <= 1.0) {
        return Err(SimulationError::InvalidConfig {
            parameter,
            reason: "must be in (0, 1]",
        });
    }
    Ok(())
}

impl VehicleConfig {
    /// Validate a set of vehicle parameters.
    ///
    /// Checks run in field order and the first violation is reported.
    ///
    /// # Errors
    ///
    /// Returns `Err(SimulationError::InvalidConfig)` if any length, mass, density,
    /// ratio, motor constant or the timestep is not positive and finite, if either
    /// efficiency lies outside `(0, 1]`, or if the drag coefficient is negative
    /// or not finite.
    pub fn new(params: VehicleParameters) -> Result<Self, SimulationError> {
        require_positive("track_length", params.track_length)?;
        require_positive("air_density", params.air_density)?;
        require_positive("gear_box_ratio", params.gear_box_ratio)?;
        require_positive("stall_torque", params.stall_torque)?;
        require_positive("no_load_speed", params.no_load_speed)?;
        require_positive("wheel_radius", params.wheel_radius)?;
        require_positive("car_mass", params.car_mass)?;
        require_positive("timestep", params.timestep)?;
        require_positive("chosen_gear_ratio", params.chosen_gear_ratio)?;
        require_positive("cross_sectional_area", params.cross_sectional_area)?;
        require_efficiency("gear_box_efficiency", params.gear_box_efficiency)?;
        require_efficiency("transmission_efficiency", params.transmission_efficiency)?;
        if !params.drag_coefficient.is_finite() {
            return Err(SimulationError::InvalidConfig {
                parameter: "drag_coefficient",
                reason: "must be finite",
            });
        }
        if params.drag_coefficient < 0.0 {
            return Err(SimulationError::InvalidConfig {
                parameter: "drag_coefficient",
                reason: "must be non-negative",
            });
        }
        Ok(VehicleConfig { params })
    }

    /// Returns a copy of the validated parameters.
    pub fn parameters(&self) -> VehicleParameters {
        self.params
    }

    /// Returns the track length (m).
    pub fn track_length(&self) -> f64 {
        self.params.track_length
    }

    /// Returns the air density (kg/m³).
    pub fn air_density(&self) -> f64 {
        self.params.air_density
    }

    /// Returns the first-stage reduction.
    pub fn gear_box_ratio(&self) -> f64 {
        self.params.gear_box_ratio
    }

    /// Returns the motor stall torque (N·m).
    pub fn stall_torque(&self) -> f64 {
        self.params.stall_torque
    }

    /// Returns the motor no-load speed (rad/s).
    pub fn no_load_speed(&self) -> f64 {
        self.params.no_load_speed
    }

    /// Returns the wheel radius (m).
    pub fn wheel_radius(&self) -> f64 {
        self.params.wheel_radius
    }

    /// Returns the car mass (kg).
    pub fn car_mass(&self) -> f64 {
        self.params.car_mass
    }

    /// Returns the integration timestep (s).
    pub fn timestep(&self) -> f64 {
        self.params.timestep
    }

    /// Returns the second-stage reduction.
    pub fn chosen_gear_ratio(&self) -> f64 {
        self.params.chosen_gear_ratio
    }

    /// Returns the frontal area (m²).
    pub fn cross_sectional_area(&self) -> f64 {
        self.params.cross_sectional_area
    }

    /// Returns the gearbox efficiency.
    pub fn gear_box_efficiency(&self) -> f64 {
        self.params.gear_box_efficiency
    }

    /// Returns the final drive efficiency.
    pub fn transmission_efficiency(&self) -> f64 {
        self.params.transmission_efficiency
    }

    /// Returns the drag coefficient.
    pub fn drag_coefficient(&self) -> f64 {
        self.params.drag_coefficient
    }

    /// Current drawn by the motor while it delivers `motor_torque` (A).
    ///
    /// Affine fit of the stock motor's datasheet; it does not depend on the
    /// vehicle constants.
    pub fn current_draw(&self, motor_torque: f64) -> f64 {
        CURRENT_PER_TORQUE * motor_torque + NO_LOAD_CURRENT
    }

    /// Torque at the wheel for a given motor torque, after both reduction
    /// stages and their losses.
    pub fn wheel_torque(&self, motor_torque: f64) -> f64 {
        let gear_box_torque = (motor_torque / self.params.gear_box_ratio) * self.params.gear_box_efficiency;
        (gear_box_torque / self.params.chosen_gear_ratio) * self.params.transmission_efficiency
    }

    /// Quadratic aerodynamic drag at `velocity` (N).
    pub fn air_resistance(&self, velocity: f64) -> f64 {
        0.5 * self.params.air_density
            * self.params.cross_sectional_area
            * self.params.drag_coefficient
            * velocity
            * velocity
    }

    /// Motor speed implied by a car velocity, walking back through the wheel,
    /// the final drive and the gearbox (rad/s).
    pub fn motor_speed_from_velocity(&self, velocity: f64) -> f64 {
        let wheel_speed = velocity / self.params.wheel_radius;
        let gear_box_speed = wheel_speed / self.params.chosen_gear_ratio;
        gear_box_speed / self.params.gear_box_ratio
    }

    /// Motor torque on the linear torque-speed line (N·m).
    ///
    /// Not clamped: above the no-load speed the result is negative.
    pub fn motor_torque_at(&self, motor_speed: f64) -> f64 {
        self.params.stall_torque * (1.0 - motor_speed / self.params.no_load_speed)
    }

    /// Top speed with no load and no losses, straight from the no-load speed
    /// through both stages (m/s).
    pub fn theoretical_top_speed(&self) -> f64 {
        self.params.no_load_speed
            * self.params.gear_box_ratio
            * self.params.chosen_gear_ratio
            * self.params.wheel_radius
    }
}

impl TryFrom<VehicleParameters> for VehicleConfig {
    type Error = SimulationError;

    fn try_from(params: VehicleParameters) -> Result<Self, Self::Error> {
        VehicleConfig::new(params)
    }
}

impl Default for VehicleConfig {
    /// The reference car. Its parameters are known to be valid.
    fn default() -> Self {
        VehicleConfig { params: VehicleParameters::default() }
    }
}

impl fmt::Display for VehicleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vehicle (m: {:.3} kg, r: {:.4} m, ratios: {:.4} x {:.2}, track: {:.1} m, dt: {} s)",
            self.params.car_mass,
            self.params.wheel_radius,
            self.params.gear_box_ratio,
            self.params.chosen_gear_ratio,
            self.params.track_length,
            self.params.timestep,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_default_parameters_are_valid() {
        let config = VehicleConfig::new(VehicleParameters::default()).unwrap();
        assert_eq!(config, VehicleConfig::default());
        assert_eq!(config.track_length(), 25.0);
        assert_eq!(config.chosen_gear_ratio(), 9.0);
        assert!((config.cross_sectional_area() - 0.0255).abs() < EPSILON);
        assert_eq!(config.parameters(), VehicleParameters::default());
    }

    #[test]
    fn test_constructor_rejects_non_positive_values() {
        let cases: [(&str, fn(&mut VehicleParameters)); 10] = [
            ("track_length", |p: &mut VehicleParameters| p.track_length = 0.0),
            ("air_density", |p: &mut VehicleParameters| p.air_density = -1.2),
            ("gear_box_ratio", |p: &mut VehicleParameters| p.gear_box_ratio = 0.0),
            ("stall_torque", |p: &mut VehicleParameters| p.stall_torque = 0.0),
            ("no_load_speed", |p: &mut VehicleParameters| p.no_load_speed = -628.32),
            ("wheel_radius", |p: &mut VehicleParameters| p.wheel_radius = 0.0),
            ("car_mass", |p: &mut VehicleParameters| p.car_mass = 0.0),
            ("timestep", |p: &mut VehicleParameters| p.timestep = -0.01),
            ("chosen_gear_ratio", |p: &mut VehicleParameters| p.chosen_gear_ratio = 0.0),
            ("cross_sectional_area", |p: &mut VehicleParameters| p.cross_sectional_area = 0.0),
        ];
        for (name, mutate) in cases {
            let mut params = VehicleParameters::default();
            mutate(&mut params);
            let result = VehicleConfig::new(params);
            assert!(
                matches!(
                    result,
                    Err(SimulationError::InvalidConfig { parameter, reason: "must be positive" }) if parameter == name
                ),
                "{name} accepted: {result:?}"
            );
        }
    }

    #[test]
    fn test_constructor_rejects_efficiency_out_of_range() {
        for bad in [0.0, -0.5, 1.01, f64::NAN] {
            let params = VehicleParameters { gear_box_efficiency: bad, ..Default::default() };
            assert!(matches!(
                VehicleConfig::new(params),
                Err(SimulationError::InvalidConfig { parameter: "gear_box_efficiency", .. })
            ));
            let params = VehicleParameters { transmission_efficiency: bad, ..Default::default() };
            assert!(matches!(
                VehicleConfig::new(params),
                Err(SimulationError::InvalidConfig { parameter: "transmission_efficiency", .. })
            ));
        }
        let lossless = VehicleParameters {
            gear_box_efficiency: 1.0,
            transmission_efficiency: 1.0,
            ..Default::default()
        };
        assert!(VehicleConfig::new(lossless).is_ok());
    }

    #[test]
    fn test_constructor_drag_coefficient() {
        let no_drag = VehicleParameters { drag_coefficient: 0.0, ..Default::default() };
        assert!(VehicleConfig::new(no_drag).is_ok());

        let negative = VehicleParameters { drag_coefficient: -0.1, ..Default::default() };
        assert!(matches!(
            VehicleConfig::new(negative),
            Err(SimulationError::InvalidConfig { parameter: "drag_coefficient", reason: "must be non-negative" })
        ));
    }

    #[test]
    fn test_constructor_rejects_non_finite_values() {
        let params = VehicleParameters { car_mass: f64::INFINITY, ..Default::default() };
        assert!(matches!(
            VehicleConfig::new(params),
            Err(SimulationError::InvalidConfig { parameter: "car_mass", reason: "must be finite" })
        ));
        let params = VehicleParameters { track_length: f64::NAN, ..Default::default() };
        assert!(matches!(
            VehicleConfig::new(params),
            Err(SimulationError::InvalidConfig { parameter: "track_length", reason: "must be finite" })
        ));
    }

    #[test]
    fn test_first_violation_is_reported() {
        let params = VehicleParameters { track_length: 0.0, car_mass: 0.0, ..Default::default() };
        assert!(matches!(
            VehicleConfig::try_from(params),
            Err(SimulationError::InvalidConfig { parameter: "track_length", .. })
        ));
    }

    #[test]
    fn test_current_draw() {
        let config = VehicleConfig::default();
        // 117.67 * 0.05259 + 0.45
        assert!((config.current_draw(0.05259) - 6.6382653).abs() < EPSILON);
        assert!((config.current_draw(0.0) - 0.45).abs() < EPSILON);
    }

    #[test]
    fn test_wheel_torque_applies_both_stages() {
        let config = VehicleConfig::default();
        // 0.05259 * 30 * 0.75 / 9 * 0.6 = 0.078885
        assert!((config.wheel_torque(0.05259) - 0.078885).abs() < EPSILON);
        assert!(config.wheel_torque(-0.01) < 0.0);
    }

    #[test]
    fn test_air_resistance_is_quadratic() {
        let config = VehicleConfig::default();
        assert_eq!(config.air_resistance(0.0), 0.0);
        // 0.5 * 1.2 * 0.0255 * 0.34 * 4
        assert!((config.air_resistance(2.0) - 0.020808).abs() < EPSILON);
        assert!((config.air_resistance(4.0) - 4.0 * config.air_resistance(2.0)).abs() < EPSILON);
    }

    #[test]
    fn test_motor_speed_from_velocity() {
        let config = VehicleConfig::default();
        // 1 m/s -> 1 / 0.0325 rad/s at the wheel, / 9, * 30
        let expected = 1.0 / 0.0325 / 9.0 * 30.0;
        assert!((config.motor_speed_from_velocity(1.0) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_motor_torque_line() {
        let config = VehicleConfig::default();
        assert!((config.motor_torque_at(0.0) - 0.05259).abs() < EPSILON);
        assert!(config.motor_torque_at(628.32).abs() < EPSILON);
        assert!((config.motor_torque_at(314.16) - 0.05259 / 2.0).abs() < EPSILON);
        // Overrun is not clamped.
        assert!(config.motor_torque_at(700.0) < 0.0);
    }

    #[test]
    fn test_theoretical_top_speed() {
        let config = VehicleConfig::default();
        let expected = 628.32 / 30.0 * 9.0 * 0.0325;
        assert!((config.theoretical_top_speed() - expected).abs() < EPSILON);
    }
}
