use racecar_dynamics::*;

fn main() {
    let params = VehicleParameters::default();
    let config_result = VehicleConfig::new(params);

    match config_result {
        Ok(config) => {
            println!("Initializing race...");
            println!("  Vehicle Parameters:");
            println!("    Car Mass:      {} kg", config.car_mass());
            println!("    Wheel Radius:  {} m", config.wheel_radius());
            println!("    Gearbox Ratio: {:.4}", config.gear_box_ratio());
            println!("    Final Drive:   {}", config.chosen_gear_ratio());
            println!("  Simulation Settings:");
            println!("    Track Length:  {} m", config.track_length());
            println!("    Time Step:     {} s", config.timestep());
            println!(
                "  Theoretical top speed (no loading): {:.3} m/s",
                config.theoretical_top_speed()
            );
            println!("\nSimulating...");

            match RaceSimulator::default().run(&config) {
                Ok(race) => {
                    // Print roughly every half second of race time.
                    for i in (0..race.len()).step_by(50) {
                        println!(
                            "t = {:>5.2} s  v = {:>5.2} m/s  a = {:>6.2} m/s/s  d = {:>6.2} m  I = {:>5.2} A",
                            race.time()[i],
                            race.velocity()[i],
                            race.acceleration()[i],
                            race.distance()[i],
                            race.current_draw()[i],
                        );
                    }
                    println!("\nRace complete ({:?}, {} steps).", race.outcome(), race.steps());
                    println!("Actual top speed: {}", race.final_velocity());
                    println!("Race completed in: {:.2} s", race.final_time());
                }
                Err(e) => eprintln!("Simulation failed: {}", e),
            }
        }
        Err(e) => {
            eprintln!("Failed to configure vehicle: {:?}", e);
        }
    }
}
