use racecar_dynamics::{RaceOutcome, RaceTrace, VehicleConfig};
use tracing::{info, warn};

/// Human-readable summary of a finished race.
pub fn summary_lines(race: &RaceTrace) -> Vec<String> {
    let mut lines = vec![
        format!("Actual top speed: {}", race.final_velocity()),
        format!("Race completed in: {:.2} s", race.final_time()),
    ];
    if race.outcome() == RaceOutcome::Reversed {
        lines.push(format!(
            "Race not completed: car rolled back to {:.2} m",
            race.final_distance()
        ));
    }
    lines
}

pub fn report(config: &VehicleConfig, race: &RaceTrace) {
    info!(
        "Theoretical top speed (no loading): {:.3} m/s",
        config.theoretical_top_speed()
    );
    info!(
        steps = race.steps(),
        peak_velocity = race.peak_velocity(),
        peak_current = race.peak_current(),
        outcome = ?race.outcome(),
        "Race finished"
    );
    if race.outcome() == RaceOutcome::Reversed {
        warn!(distance = race.final_distance(), "Car did not reach the finish line");
    }

    for line in summary_lines(race) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racecar_dynamics::{RaceSimulator, VehicleParameters};

    #[test]
    fn test_summary_for_reference_race() {
        let race = RaceSimulator::default().run(&VehicleConfig::default()).unwrap();
        let lines = summary_lines(&race);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Actual top speed: 5.457"));
        assert_eq!(lines[1], "Race completed in: 6.35 s");
    }

    #[test]
    fn test_summary_flags_reversed_race() {
        let params = VehicleParameters {
            car_mass: 1e-4,
            drag_coefficient: 0.0,
            ..Default::default()
        };
        let config = VehicleConfig::new(params).unwrap();
        let race = RaceSimulator::default().run(&config).unwrap();
        let lines = summary_lines(&race);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("Race not completed"));
    }
}
