//! Composite Axes
//!
//! This demo runs a machine whose state is two independent axes. Each
//! transition constrains both axes but moves only one.
//!
//! Key concepts:
//! - Per-axis `from` lists and partial `to` updates
//! - Encoded initial state (`"a:one|b:one"`)
//! - Structural mismatch reported as `InvalidTransition`
//!
//! Run with: cargo run --example composite_axes

use futures::executor::block_on;
use statecraft::builder::MachineBuilder;
use statecraft::core::AxisTransition;
use statecraft::Machine;

fn main() {
    println!("=== Composite Axes ===\n");

    let all = ["one", "two", "three"];
    let mut machine: Machine<()> = MachineBuilder::new()
        .initial("a:one|b:one")
        .axis_transition(
            "a1",
            AxisTransition::new()
                .from_axis("a", ["two", "three"])
                .from_axis("b", all)
                .to_axis("a", "one"),
        )
        .axis_transition(
            "a2",
            AxisTransition::new()
                .from_axis("a", ["one", "three"])
                .from_axis("b", all)
                .to_axis("a", "two"),
        )
        .axis_transition(
            "b1",
            AxisTransition::new()
                .from_axis("a", all)
                .from_axis("b", ["two", "three"])
                .to_axis("b", "one"),
        )
        .axis_transition(
            "b2",
            AxisTransition::new()
                .from_axis("a", all)
                .from_axis("b", ["one", "three"])
                .to_axis("b", "two"),
        )
        .build()
        .unwrap();

    println!("Initial state: {}\n", machine.state());

    block_on(async {
        for name in ["a1", "a2", "b2", "a1", "b1"] {
            let outcome = machine.transition(name, ()).await.unwrap();
            match outcome.error {
                Some(error) => println!("  {name}: {error}"),
                None => println!(
                    "  {name}: {} -> {}",
                    outcome.previous_state, outcome.new_state
                ),
            }
        }
    });

    println!("\nFinal state: {}", machine.state());
    println!("\n=== Demo Complete ===");
}
