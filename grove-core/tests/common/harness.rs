//! Shape <-> grove conversion used by the integration tests

use std::collections::HashMap;
use std::sync::Arc;

use grove_core::decl::ElementType;
use grove_core::{
    Event, GroveBuilder, GroveConfig, NoSdataMapper, NodeClass, NodeHandle, StartElement,
};

use super::Shape;

pub fn element_type(name: &str) -> Arc<ElementType> {
    Arc::new(ElementType::new(name))
}

/// Builder events for `shape`, sharing one element type per name.
pub fn events_for(shape: &Shape) -> Vec<Event> {
    fn walk(shape: &Shape, types: &mut HashMap<String, Arc<ElementType>>, out: &mut Vec<Event>) {
        match shape {
            Shape::Element { gi, children } => {
                let ty = types.entry(gi.clone()).or_insert_with(|| element_type(gi)).clone();
                out.push(Event::start(StartElement::new(ty)));
                for child in children {
                    walk(child, types, out);
                }
                out.push(Event::EndElement);
            }
            Shape::Data(text) => out.push(Event::data(text.as_str())),
            Shape::Pi(text) => out.push(Event::pi(text.as_str())),
        }
    }
    let mut out = Vec::new();
    walk(shape, &mut HashMap::new(), &mut out);
    out
}

/// Feed `events` to a fresh grove without completing it.
pub fn build_with(config: GroveConfig, events: Vec<Event>) -> (GroveBuilder, NodeHandle) {
    let (mut builder, root) = GroveBuilder::new(0, config);
    for event in events {
        builder.handle_event(event).expect("event accepted");
    }
    (builder, root)
}

/// Build and complete a grove for `shape`.
pub fn build(shape: &Shape) -> NodeHandle {
    let (mut builder, root) = build_with(GroveConfig::default(), events_for(shape));
    builder.end_document();
    root
}

/// Character data from `node` to the end of its chunk.
pub fn text(node: &NodeHandle) -> String {
    node.node().char_chunk(&NoSdataMapper).map(|s| s.to_string()).unwrap_or_default()
}

/// Read a subtree back as a shape, one `Data` per chunk.
pub fn render(node: &NodeHandle) -> Shape {
    match node.node().class() {
        NodeClass::Element => Shape::Element {
            gi: node.gi().map(|g| g.to_string()).unwrap_or_default(),
            children: render_children(node),
        },
        NodeClass::DataChar => Shape::Data(text(node)),
        NodeClass::Pi => Shape::Pi(node.node().system_data().map(|s| s.to_string()).unwrap_or_default()),
        other => panic!("unexpected class in content: {:?}", other),
    }
}

pub fn render_children(node: &NodeHandle) -> Vec<Shape> {
    let mut out = Vec::new();
    let Ok(mut list) = node.children() else {
        return out;
    };
    while let Ok(first) = list.first() {
        out.push(render(&first));
        let step = if first.node().class() == NodeClass::DataChar {
            list.assign_chunk_rest()
        } else {
            list.assign_rest()
        };
        if step.is_err() {
            break;
        }
    }
    out
}
