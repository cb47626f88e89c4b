//! Property-based tests for the state codec and machine evaluation.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use statecraft::builder::{BuildError, MachineBuilder};
use statecraft::core::codec::{decode, encode, is_encodable};
use statecraft::core::{AxisTransition, CompositeState, FlatTransition, MachineState};
use statecraft::{Machine, MachineError};
use std::collections::BTreeMap;

const LIGHTS: [&str; 3] = ["red", "green", "yellow"];

fn traffic_light(initial: &str) -> Machine<()> {
    MachineBuilder::new()
        .initial(initial)
        .transition("GREEN", FlatTransition::new(["red"], "green"))
        .transition("YELLOW", FlatTransition::new(["green"], "yellow"))
        .transition("RED", FlatTransition::new(["yellow"], "red"))
        .build()
        .unwrap()
}

prop_compose! {
    fn arbitrary_axes()(
        pairs in prop::collection::vec(("[a-z]{1,6}", "[a-z0-9]{0,6}"), 0..6)
    ) -> Vec<(String, String)> {
        pairs
    }
}

prop_compose! {
    fn reserved_token()(
        prefix in "[a-z]{0,3}",
        separator in prop::sample::select(vec!['|', ':']),
        suffix in "[a-z|:]{0,3}",
    ) -> String {
        format!("{prefix}{separator}{suffix}")
    }
}

prop_compose! {
    fn arbitrary_light()(index in 0..3usize) -> &'static str {
        LIGHTS[index]
    }
}

proptest! {
    #[test]
    fn decode_inverts_encode(pairs in arbitrary_axes()) {
        let axes: BTreeMap<String, String> = pairs.into_iter().collect();
        prop_assert_eq!(decode(&encode(&axes)), axes);
    }

    #[test]
    fn reserved_tokens_never_build(token in reserved_token(), as_axis_name in any::<bool>()) {
        prop_assert!(!is_encodable(&token));

        let initial = if as_axis_name {
            CompositeState::new().with("a", "one").with(token.clone(), "one")
        } else {
            CompositeState::new().with("a", token.clone())
        };
        let result = MachineBuilder::<(), ()>::new()
            .initial(initial)
            .axis_transition(
                "a2",
                AxisTransition::new().from_axis("a", ["one"]).to_axis("a", "two"),
            )
            .build();

        let is_reserved = matches!(
            result,
            Err(BuildError::ReservedCharacter { token: rejected, .. }) if rejected == token
        );
        prop_assert!(is_reserved);
    }

    #[test]
    fn encodable_machine_state_reparses(pairs in arbitrary_axes()) {
        prop_assume!(!pairs.is_empty());
        let state: CompositeState = pairs.into_iter().collect();
        prop_assert!(state.iter().all(|(k, v)| is_encodable(k) && is_encodable(v)));

        let (axis, value) = state.iter().next().unwrap();
        let noop = AxisTransition::new().from_axis(axis, [value]);
        let machine: Machine<()> = MachineBuilder::new()
            .initial(state.clone())
            .axis_transition("noop", noop)
            .build()
            .unwrap();

        let reparsed: CompositeState = machine.state().to_string().parse().unwrap();
        prop_assert_eq!(MachineState::from(reparsed), machine.state().clone());
    }

    #[test]
    fn encoding_ignores_insertion_order(pairs in arbitrary_axes()) {
        let forward: CompositeState = pairs.iter().cloned().collect();
        let reverse: CompositeState = pairs.iter().rev().cloned().collect();

        // Later duplicates win on insertion, so compare only unique-key inputs.
        let unique: BTreeMap<&String, ()> = pairs.iter().map(|(k, _)| (k, ())).collect();
        prop_assume!(unique.len() == pairs.len());

        prop_assert_eq!(forward.encode(), reverse.encode());
    }

    #[test]
    fn encoded_keys_are_sorted(pairs in arbitrary_axes()) {
        let state: CompositeState = pairs.into_iter().collect();
        let encoded = state.encode();
        let keys: Vec<String> = decode(&encoded).into_keys().collect();

        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn exactly_one_light_transition_is_allowed(light in arbitrary_light()) {
        let machine = traffic_light(light);
        let allowed = ["GREEN", "YELLOW", "RED"]
            .iter()
            .filter(|name| machine.can(name, &()).unwrap())
            .count();

        prop_assert_eq!(allowed, 1);
    }

    #[test]
    fn unknown_names_are_always_faults(name in "[A-Z]{4,8}") {
        prop_assume!(!["GREEN", "YELLOW", "RED"].contains(&name.as_str()));

        let machine = traffic_light("red");
        let is_unknown = matches!(
            machine.can(&name, &()),
            Err(MachineError::UnknownTransition { .. })
        );
        prop_assert!(is_unknown);
    }

    #[test]
    fn random_walk_only_commits_legal_moves(
        requests in prop::collection::vec(0..3usize, 1..20)
    ) {
        let mut machine = traffic_light("red");
        let names = ["GREEN", "YELLOW", "RED"];

        futures::executor::block_on(async {
            for index in requests {
                let name = names[index];
                let was_allowed = machine.can(name, &()).unwrap();
                let before = machine.state().clone();
                let outcome = machine.transition(name, ()).await.unwrap();

                assert_eq!(outcome.previous_state, before);
                assert_eq!(outcome.state_changed, was_allowed);
                assert!(outcome.error.is_none());
                if !was_allowed {
                    assert_eq!(machine.state(), &before);
                }
            }
        });

        let path = machine.history().get_path();
        if let Some(first) = path.first() {
            prop_assert_eq!(*first, &MachineState::from("red"));
        }
    }
}
