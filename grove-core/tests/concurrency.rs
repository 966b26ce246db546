//! Readers navigating a grove while another thread builds it.
//!
//! Runs are seeded; set GROVE_TEST_SEED to replay a failure.

mod common;

use std::thread;
use std::time::{Duration, Instant};

use common::{element_type, events_for, text, Gen, Shape};
use grove_core::{
    Access, AccessResult, Event, GroveBuilder, GroveConfig, NodeClass, NodeHandle, StartElement,
};
use pretty_assertions::assert_eq;
use rand::Rng;

const WAIT: Duration = Duration::from_millis(20);
const DEADLINE: Duration = Duration::from_secs(10);

/// Retry `f` on `node` until it answers something other than timeout.
fn settle<T>(node: &NodeHandle, f: impl Fn(&NodeHandle) -> AccessResult<T>) -> AccessResult<T> {
    let start = Instant::now();
    loop {
        match node.retry_on_timeout(WAIT, &f) {
            Err(Access::Timeout) if start.elapsed() < DEADLINE => continue,
            other => return other,
        }
    }
}

/// Like `common::render`, but waits for content that is still growing.
fn render_live(node: &NodeHandle) -> Shape {
    match node.node().class() {
        NodeClass::Element => {
            let mut children = Vec::new();
            let mut child = settle(node, |n| n.first_child());
            while let Ok(current) = child {
                children.push(render_live(&current));
                child = settle(&current, |n| n.next_chunk_sibling());
            }
            assert_eq!(child.err(), Some(Access::Null), "navigation gave up under {:?}", node);
            Shape::Element { gi: node.gi().map(|g| g.to_string()).unwrap_or_default(), children }
        }
        NodeClass::DataChar => Shape::Data(text(node)),
        NodeClass::Pi => Shape::Pi(node.node().system_data().map(|s| s.to_string()).unwrap_or_default()),
        other => panic!("unexpected class in content: {:?}", other),
    }
}

fn feed(mut builder: GroveBuilder, events: Vec<Event>, gen: &mut Gen) {
    for event in events {
        builder.handle_event(event).unwrap();
        if gen.chance(0.1) {
            thread::sleep(Duration::from_micros(200));
        } else if gen.chance(0.3) {
            thread::yield_now();
        }
    }
    builder.end_document();
}

#[test]
fn test_reader_follows_growing_grove() {
    let mut gen = Gen::from_env_or_random();
    let seed = gen.seed;
    for _ in 0..8 {
        let shape = gen.element(4);
        let events = events_for(&shape);
        let config = GroveConfig::default().with_pulse_interval(1 + gen.geometric(0.6) as u32);
        let (builder, root) = GroveBuilder::new(0, config);

        let mut feeder_gen = Gen::new(gen.rng.gen());
        let seen = thread::scope(|s| {
            let reader = s.spawn(|| {
                let doc = settle(&root, |r| r.document_element()).unwrap();
                render_live(&doc)
            });
            s.spawn(move || feed(builder, events, &mut feeder_gen));
            reader.join().unwrap()
        });

        assert_eq!(seen, shape.coalesced(), "seed {}", seed);
        assert!(!root.node().wait_for_more_nodes(WAIT), "seed {}", seed);
    }
}

#[test]
fn test_waiting_reader_sees_null_after_complete() {
    let (mut builder, root) = GroveBuilder::new(0, GroveConfig::default());
    builder.start_element(StartElement::new(element_type("A"))).unwrap();
    let a = root.document_element().unwrap();
    assert_eq!(a.next_sibling().err(), Some(Access::Timeout));

    thread::scope(|s| {
        let waiter = s.spawn(|| settle(&a, |n| n.next_sibling()).err());
        thread::sleep(Duration::from_millis(5));
        builder.end_element().unwrap();
        builder.end_document();
        assert_eq!(waiter.join().unwrap(), Some(Access::Null));
    });
}

#[test]
fn test_handles_cross_threads() {
    let shape = Shape::element("A", (0..50).map(|i| Shape::element(&format!("E{}", i % 5), vec![])).collect());
    let root = common::build(&shape);
    let a = root.document_element().unwrap();

    let counts: Vec<usize> = thread::scope(|s| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let a = a.clone();
                s.spawn(move || {
                    let mut node = a.first_child().unwrap();
                    let mut count = 1;
                    while node.assign_next_sibling().is_ok() {
                        count += 1;
                    }
                    count
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![50; 4]);
}
