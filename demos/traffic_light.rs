//! Traffic Light State Machine
//!
//! This demo drives a cyclic flat machine through two full cycles.
//!
//! Key concepts:
//! - Flat transitions with explicit `from` lists
//! - `can` as a side-effect free legality check
//! - Structural rejection leaves state untouched without an error
//!
//! Run with: cargo run --example traffic_light

use futures::executor::block_on;
use statecraft::builder::MachineBuilder;
use statecraft::core::FlatTransition;
use statecraft::Machine;

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let mut machine: Machine<()> = MachineBuilder::new()
        .initial("red")
        .transition("GREEN", FlatTransition::new(["red"], "green"))
        .transition("YELLOW", FlatTransition::new(["green"], "yellow"))
        .transition("RED", FlatTransition::new(["yellow"], "red"))
        .build()
        .unwrap();

    println!("Initial state: {}", machine.state());
    println!("Available: {:?}\n", machine.available_transitions());

    block_on(async {
        let rejected = machine.transition("RED", ()).await.unwrap();
        println!(
            "RED from {}: changed = {}, error = {:?}\n",
            rejected.previous_state, rejected.state_changed, rejected.error
        );

        println!("Transition sequence:");
        for name in ["GREEN", "YELLOW", "RED", "GREEN", "YELLOW", "RED"] {
            let outcome = machine.transition(name, ()).await.unwrap();
            println!(
                "  {:<6} {} -> {}",
                name, outcome.previous_state, outcome.new_state
            );
        }
    });

    let path: Vec<String> = machine
        .history()
        .get_path()
        .iter()
        .map(|state| state.to_string())
        .collect();
    println!("\nPath: {}", path.join(" -> "));

    println!("\n=== Demo Complete ===");
}
