//! Property-based invariant tests for the back stack engine.
//!
//! 1. Popping once per push restores the exact prior entry sequence
//! 2. singleTop to the current top never changes the stack length
//! 3. popUpTo(X) leaves X on top; inclusive leaves X's predecessor on top
//! 4. Pane layout flips never change entry order or count
//! 5. Deep-link resolution gives the same answer for the same graph

use duonav::core::config::ControllerConfig;
use duonav::core::entry::EntryId;
use duonav::graph::args::Args;
use duonav::navigator::NavigatorRegistry;
use duonav::navigator::navigators::{HostNavigator, OverlayNavigator};
use duonav::pane::PaneLayout;
use duonav::{DestinationBuilder, NavController, NavGraph, NavGraphBuilder, NavOptions, NavTarget};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

const LEAVES: [&str; 5] = ["home", "alpha", "beta", "gamma", "sheet"];

/// Flat graph: every leaf is reachable from every other leaf.
fn flat_graph() -> NavGraph {
    let mut builder = NavGraphBuilder::new("root", "home");
    for leaf in LEAVES {
        let navigator = if leaf == "sheet" { "dialog" } else { "host" };
        builder = builder.destination("root", DestinationBuilder::new(leaf, navigator));
    }
    builder
        .destination(
            "root",
            DestinationBuilder::new("item", "host").deep_link("app://duo/{kind}/{id}"),
        )
        .destination(
            "root",
            DestinationBuilder::new("other_item", "host").deep_link("app://duo/{section}/{key}"),
        )
        .build()
        .unwrap()
}

fn controller() -> NavController {
    let mut registry = NavigatorRegistry::new();
    registry.register("host", HostNavigator::new()).unwrap();
    registry.register("dialog", OverlayNavigator::new()).unwrap();
    let mut c = NavController::new(flat_graph(), registry, ControllerConfig::default());
    c.start().unwrap();
    c
}

fn navigate_all(c: &mut NavController, picks: &[usize]) {
    for &i in picks {
        c.navigate_to(LEAVES[i % LEAVES.len()]).unwrap();
    }
}

fn entry_ids(c: &NavController) -> Vec<EntryId> {
    c.back_stack().iter().map(|e| e.id()).collect()
}

fn arb_picks(max: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0usize..LEAVES.len(), 0..=max)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Push / pop are inverses
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pop_undoes_push(prefix in arb_picks(8), pushes in arb_picks(12)) {
        let mut c = controller();
        navigate_all(&mut c, &prefix);
        let before = entry_ids(&c);

        navigate_all(&mut c, &pushes);
        prop_assert_eq!(c.back_stack().len(), before.len() + pushes.len());
        for _ in 0..pushes.len() {
            prop_assert!(c.pop_back_stack().unwrap());
        }
        prop_assert_eq!(entry_ids(&c), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. singleTop to the top keeps the length
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_top_keeps_length(picks in arb_picks(10), value in any::<i64>()) {
        let mut c = controller();
        navigate_all(&mut c, &picks);
        let len = c.back_stack().len();
        let top = c.current_entry().unwrap();
        let (top_id, top_dest) = (top.id(), top.destination().clone());

        c.navigate(
            NavTarget::Destination(top_dest),
            Args::new().with("n", value),
            Some(NavOptions::new().single_top(true)),
        )
        .unwrap();

        prop_assert_eq!(c.back_stack().len(), len);
        let top = c.current_entry().unwrap();
        prop_assert_eq!(top.id(), top_id);
        prop_assert_eq!(top.args().get("n").and_then(|v| v.as_int()), Some(value));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. popUpTo leaves the target (or its predecessor) on top
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pop_up_to_exclusive(picks in arb_picks(12), at in any::<prop::sample::Index>()) {
        let mut c = controller();
        navigate_all(&mut c, &picks);
        let destinations: Vec<String> = c.back_stack().iter().map(|e| e.destination().to_string()).collect();
        let target = &destinations[at.index(destinations.len())];
        let topmost = destinations.iter().rposition(|d| d == target).unwrap();

        c.pop_back_stack_to(target.as_str(), false).unwrap();
        prop_assert_eq!(c.back_stack().len(), topmost + 1);
        prop_assert_eq!(c.current_entry().unwrap().destination().as_str(), target.as_str());
    }

    #[test]
    fn pop_up_to_inclusive(picks in arb_picks(12), at in any::<prop::sample::Index>()) {
        let mut c = controller();
        navigate_all(&mut c, &picks);
        let before = entry_ids(&c);
        let destinations: Vec<String> = c.back_stack().iter().map(|e| e.destination().to_string()).collect();
        let target = &destinations[at.index(destinations.len())];
        let topmost = destinations.iter().rposition(|d| d == target).unwrap();

        let popped = c.pop_back_stack_to(target.as_str(), true).unwrap();
        if topmost == 0 {
            // would empty the stack: refused
            prop_assert!(!popped);
            prop_assert_eq!(entry_ids(&c), before);
        } else {
            prop_assert_eq!(c.back_stack().len(), topmost);
            prop_assert_eq!(c.current_entry().unwrap().id(), before[topmost - 1]);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Layout flips never touch the stack
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_flips_preserve_stack(picks in arb_picks(10), flips in 1usize..6) {
        let mut c = controller();
        navigate_all(&mut c, &picks);
        let before = entry_ids(&c);
        let single = c.pane_assignment().clone();

        for _ in 0..flips {
            c.layout_changed(PaneLayout::dual()).unwrap();
            prop_assert_eq!(entry_ids(&c), before.clone());
            c.layout_changed(PaneLayout::single()).unwrap();
            prop_assert_eq!(entry_ids(&c), before.clone());
        }
        prop_assert_eq!(c.pane_assignment(), &single);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Deep-link resolution is deterministic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn deep_link_resolution_is_deterministic(kind in "[a-z]{1,8}", id in "[a-z0-9]{1,8}") {
        let route = format!("app://duo/{kind}/{id}");
        let first = flat_graph();
        let second = flat_graph();
        let a = first.resolve_deep_link(&route).unwrap();
        let b = second.resolve_deep_link(&route).unwrap();
        prop_assert_eq!(a.destination.id(), b.destination.id());
        prop_assert_eq!(a.pattern, b.pattern);
        // equal specificity: registration order decides
        prop_assert_eq!(a.destination.id().as_str(), "item");
    }
}
