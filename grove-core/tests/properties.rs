//! Property-based tests for the grove builder and node views
//!
//! These check structural invariants over generated document shapes:
//! whatever the input, reading the grove back must agree with what was
//! fed in, and every route to a node must yield the same node.

mod common;

use common::{build, build_with, element_type, render, text, Shape};
use grove_core::{Event, GroveConfig, NodeHandle, StartElement};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 100,
        max_shrink_iters: 100,
        timeout: 1000,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Strategies
// =============================================================================

fn content() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        4 => "[a-z ]{1,6}".prop_map(Shape::Data),
        1 => "[a-z]{1,4}".prop_map(Shape::Pi),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        ("[A-D]{1,2}", prop::collection::vec(inner, 0..4))
            .prop_map(|(gi, children)| Shape::Element { gi, children })
    })
}

fn document() -> impl Strategy<Value = Shape> {
    ("[A-Z]{1,3}", prop::collection::vec(content(), 0..6))
        .prop_map(|(gi, children)| Shape::Element { gi, children })
}

// =============================================================================
// Helpers
// =============================================================================

/// Every chunk in document order, starting at the document element.
fn document_order(root: &NodeHandle) -> Vec<NodeHandle> {
    let mut out = Vec::new();
    let Ok(mut node) = root.document_element() else {
        return out;
    };
    loop {
        out.push(node.clone());
        match node.next_chunk_after() {
            Ok(next) => node = next,
            Err(_) => return out,
        }
    }
}

fn elements(root: &NodeHandle) -> Vec<NodeHandle> {
    document_order(root).into_iter().filter(|n| n.gi().is_some()).collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// Reading a grove back yields the input with adjacent data merged.
    #[test]
    fn prop_render_matches_coalesced_shape(shape in document()) {
        let root = build(&shape);
        let doc = root.document_element().unwrap();
        prop_assert_eq!(render(&doc), shape.coalesced());
    }

    /// However a run of data is split into events, it lands in one chunk.
    #[test]
    fn prop_data_splits_coalesce(
        data in "[a-z]{1,40}",
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let mut cuts: Vec<usize> = cuts.iter().map(|c| c.index(data.len())).collect();
        cuts.push(data.len());
        cuts.sort_unstable();
        cuts.dedup();

        let mut events = vec![Event::start(StartElement::new(element_type("P")))];
        let mut start = 0;
        for cut in cuts {
            if cut > start {
                events.push(Event::data(&data[start..cut]));
                start = cut;
            }
        }
        events.push(Event::EndElement);
        let (mut builder, root) = build_with(GroveConfig::default(), events);
        builder.end_document();

        let first = root.document_element().unwrap().first_child().unwrap();
        prop_assert_eq!(text(&first), data.clone());
        prop_assert!(first.next_chunk_sibling().is_err());
        let chars = root.document_element().unwrap().children().unwrap().iter().count();
        prop_assert_eq!(chars, data.len());
    }

    /// Element indices count start tags in document order.
    #[test]
    fn prop_element_indices_in_document_order(shape in document()) {
        let root = build(&shape);
        let elements = elements(&root);
        prop_assert_eq!(elements.len(), shape.element_count());
        for (i, element) in elements.iter().enumerate() {
            prop_assert_eq!(element.element_index(), Some(i as u32));
        }
    }

    /// Stepping a handle in place visits the same nodes as materializing
    /// each sibling anew.
    #[test]
    fn prop_in_place_steps_match_materialized(shape in document()) {
        let root = build(&shape);
        for parent in elements(&root) {
            let Ok(first) = parent.first_child() else { continue };
            let mut expected = vec![first.clone()];
            while let Ok(next) = expected.last().unwrap().next_sibling() {
                expected.push(next);
            }

            // A private copy, so every step can reuse the node.
            let mut walker = NodeHandle::new(first.node().clone_node());
            let mut visited = 1;
            while walker.assign_next_sibling().is_ok() {
                prop_assert!(walker.same_node(&expected[visited]));
                visited += 1;
            }
            prop_assert_eq!(visited, expected.len());
        }
    }

    /// Nodes reached by different routes are the same node with the same hash.
    #[test]
    fn prop_same_node_by_any_route(shape in document()) {
        let root = build(&shape);
        // The document element has no siblings list to index into.
        for node in document_order(&root).into_iter().skip(1) {
            let parent = node.parent().unwrap();
            let index = node.node().siblings_index().unwrap();
            let via_list = parent.children().unwrap().nth(index).unwrap();
            prop_assert!(via_list.same_node(&node));
            prop_assert_eq!(via_list.node().hash_code(), node.node().hash_code());

            let via_first = node.node().first_sibling().unwrap();
            prop_assert!(parent.first_child().unwrap().node().same(via_first.as_node()));

            if let Ok(child) = node.first_child() {
                prop_assert!(child.parent().unwrap().same_node(&node));
            }
        }
    }
}
