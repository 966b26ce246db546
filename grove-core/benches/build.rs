//! Benchmarks for grove building and navigation.
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grove_core::decl::ElementType;
use grove_core::{Event, GroveBuilder, GroveConfig, NodeHandle, StartElement};

/// A flat document: one root with `n` paragraphs of text.
fn flat_events(n: usize) -> Vec<Event> {
    let doc = Arc::new(ElementType::new("DOC"));
    let para = Arc::new(ElementType::new("P"));
    let mut events = vec![Event::start(StartElement::new(doc))];
    for i in 0..n {
        events.push(Event::start(StartElement::new(para.clone())));
        events.push(Event::data(format!("paragraph {} has some text", i)));
        events.push(Event::EndElement);
    }
    events.push(Event::EndElement);
    events
}

/// A deep document: `n` nested sections, each with a little data.
fn deep_events(n: usize) -> Vec<Event> {
    let sec = Arc::new(ElementType::new("SEC"));
    let mut events = Vec::new();
    for _ in 0..n {
        events.push(Event::start(StartElement::new(sec.clone())));
        events.push(Event::data("x"));
    }
    events.extend((0..n).map(|_| Event::EndElement));
    events
}

fn build(events: Vec<Event>) -> NodeHandle {
    let (mut builder, root) = GroveBuilder::new(0, GroveConfig::default());
    for event in events {
        builder.handle_event(event).expect("event accepted");
    }
    builder.end_document();
    root
}

/// Visit every chunk, stepping handles in place.
fn walk(node: &NodeHandle) -> usize {
    let mut count = 1;
    let Ok(mut child) = node.first_child() else {
        return count;
    };
    loop {
        count += walk(&child);
        if child.assign_next_chunk_sibling().is_err() {
            return count;
        }
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("flat", n), &n, |b, &n| {
            b.iter_batched(|| flat_events(n), |events| black_box(build(events)), criterion::BatchSize::LargeInput)
        });
    }
    group.bench_function("deep_500", |b| {
        b.iter_batched(|| deep_events(500), |events| black_box(build(events)), criterion::BatchSize::LargeInput)
    });
    group.finish();
}

fn bench_navigate(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigate");
    for n in [1_000, 10_000] {
        let root = build(flat_events(n));
        let doc = root.document_element().unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("walk_in_place", n), &doc, |b, doc| {
            b.iter(|| walk(black_box(doc)))
        });
        group.bench_with_input(BenchmarkId::new("next_sibling_materialized", n), &doc, |b, doc| {
            b.iter(|| {
                let mut count = 0;
                let mut node = doc.first_child();
                while let Ok(current) = node {
                    count += 1;
                    node = current.next_sibling();
                }
                count
            })
        });
    }

    // The scan for a data chunk's next sibling skips whole subtrees.
    let root = build(deep_events(500));
    let doc = root.document_element().unwrap();
    group.bench_function("deep_first_data_next", |b| {
        b.iter(|| black_box(doc.first_child().and_then(|d| d.next_chunk_sibling())).is_ok())
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_navigate);
criterion_main!(benches);
