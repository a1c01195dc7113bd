//! Solar system example
//!
//! Runs the three-body solar system scenario alongside a random debris field
//! and prints a summary every few hundred ticks.
//!
//! Run with: cargo run --package gravsim --example solar_system

use gravsim::config::{SimulationConfig, TimeScale};
use gravsim::scenario::{Scenario, random_field};
use gravsim::Simulation;

fn main() -> gravsim::Result<()> {
    println!("Gravity Simulation: Solar System with Debris\n");
    println!("{}", "=".repeat(60));

    let config = SimulationConfig::default();
    let mut specs = Scenario::SolarSystem.bodies(&config);
    specs.extend(random_field(42, 200, 5.0, 0.5, &config.board));

    let mut sim = Simulation::new(config, specs)?;
    let mut time_scale = TimeScale::default();
    time_scale.faster();

    println!("\nInitial bodies: {}", sim.bodies().len());
    println!("Initial total mass: {:.1}", sim.bodies().total_mass());
    println!("Time scale: {}", time_scale.value());

    let total_ticks = 2_000;
    let report_every = 250;
    let mut merge_count = 0;

    println!("\n{}", "=".repeat(60));
    println!("Starting simulation...\n");

    for _ in 0..total_ticks {
        let report = sim.step(time_scale.value())?;
        merge_count += report.merges.len();

        for merge in &report.merges {
            if merge.survivor_mass > 1_000.0 {
                println!(
                    "tick {:5}: body {:?} absorbed {:?}, now mass {:.1}",
                    report.tick, merge.survivor, merge.consumed, merge.survivor_mass
                );
            }
        }

        if report.tick % report_every == 0 {
            let momentum = sim.bodies().total_momentum();
            println!(
                "tick {:5}: {} bodies, momentum ({:.3}, {:.3})",
                report.tick,
                sim.bodies().len(),
                momentum.x,
                momentum.y
            );
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Simulation complete!\n");
    println!("  Ticks: {}", sim.tick_count());
    println!("  Merges: {}", merge_count);
    println!("  Final bodies: {}", sim.bodies().len());
    println!("  Final total mass: {:.1}", sim.bodies().total_mass());

    let mut heaviest: Vec<_> = sim.bodies().iter().collect();
    heaviest.sort_by(|a, b| b.mass().total_cmp(&a.mass()));
    println!("\nHeaviest bodies:");
    for body in heaviest.iter().take(5) {
        println!(
            "  {:?}: mass={:.1}, radius={:.1}, pos=({:.0}, {:.0}), speed={:.3}",
            body.id,
            body.mass(),
            body.radius(),
            body.position.x,
            body.position.y,
            body.speed
        );
    }

    sim.shutdown();
    Ok(())
}
