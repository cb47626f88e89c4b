//! Vending Machine
//!
//! This demo accumulates credit through a reducer and gates `BUY` with a guard.
//! A subscriber dispenses the product once a purchase commits.
//!
//! Key concepts:
//! - Context reducer runs for every request
//! - Guards veto transitions and report every result
//! - Async subscribers observe the committed context
//!
//! Run with: cargo run --example vending_machine

use serde_json::json;
use statecraft::builder::MachineBuilder;
use statecraft::core::{FlatTransition, Guard, TransitionIntent};
use statecraft::Machine;

#[derive(Debug, Clone, Default)]
struct Credit {
    cents: u32,
}

fn reduce_credit(credit: &Credit, intent: TransitionIntent<'_, u32>) -> Credit {
    match intent.name {
        "INSERTMONEY" => Credit {
            cents: credit.cents + intent.data,
        },
        "RESET" => Credit::default(),
        _ => credit.clone(),
    }
}

#[tokio::main]
async fn main() {
    println!("=== Vending Machine ===\n");

    let mut machine: Machine<Credit, u32> = MachineBuilder::new()
        .initial("idle")
        .transition("INSERTMONEY", FlatTransition::new(["idle", "buying"], "buying"))
        .transition("RESET", FlatTransition::new(["idle", "buying"], "idle"))
        .transition("BUY", FlatTransition::new(["buying"], "idle"))
        .reducer(reduce_credit)
        .guard(
            "BUY",
            Guard::require(
                |credit: &Credit, _: &u32| credit.cents >= 100,
                "you have not enough credit",
            ),
        )
        .build()
        .unwrap();

    machine.on("BUY", |credit: Credit, _| async move {
        println!("  [dispenser] product out, {} cents spent", credit.cents);
        Ok(json!({ "dispensed": true }))
    });

    for (name, coin) in [
        ("INSERTMONEY", 40),
        ("BUY", 0),
        ("INSERTMONEY", 40),
        ("BUY", 0),
        ("INSERTMONEY", 20),
        ("BUY", 0),
    ] {
        let outcome = machine.transition(name, coin).await.unwrap();
        println!(
            "{:<12} {} -> {} credit = {}",
            name, outcome.previous_state, outcome.new_state, outcome.context.cents
        );

        if let Some(guards) = outcome.error.as_ref().and_then(|error| error.guards()) {
            for failure in guards.iter().filter_map(|result| result.as_ref().err()) {
                println!("  rejected: {failure}");
            }
        }
        if !outcome.subscriber_results.is_empty() {
            println!("  subscribers: {:?}", outcome.subscriber_results);
        }
    }

    println!("\nBUY attempts: {}", machine.history().count("BUY"));
    println!("\n=== Demo Complete ===");
}
