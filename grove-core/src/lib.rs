//! SGML Grove Core
//!
//! Incrementally built, property-queryable model of a parsed SGML
//! document. A parser feeds [`Event`]s to a [`GroveBuilder`]; readers on
//! other threads navigate the same grove through [`NodeHandle`]s while it
//! grows. Accessors that cannot answer yet return [`Access::Timeout`].
//!
//! # Architecture
//!
//! - **names.rs** - ComponentName catalog (compact and verbose spellings)
//! - **class_def.rs** - Per-class property metadata
//! - **string.rs** - Zero-copy code-point strings
//! - **arena.rs** - Append-only chunk arena and the sibling scan
//! - **grove.rs** - Grove state, append point, pulse/wait
//! - **builder.rs** - Event consumer, Growing -> Complete
//! - **node.rs** - Node, NodeList and NamedNodeList protocols
//! - **nodes/** - Node views and the chunk-to-node materializer
//! - **lists.rs** - List implementations
//! - **handle.rs** - Owning handles with in-place navigation

pub mod access;
pub mod arena;
pub mod builder;
pub mod class_def;
pub mod config;
pub mod decl;
pub mod event;
pub mod grove;
pub mod handle;
pub mod lists;
pub mod names;
pub mod node;
pub mod nodes;
pub mod string;
pub mod value;

pub use access::{Access, AccessResult};
pub use builder::{BuildError, GroveBuilder};
pub use class_def::{ClassDef, NodeClass};
pub use config::GroveConfig;
pub use event::{Event, PiData, StartElement};
pub use handle::{NamedNodeListHandle, NodeHandle, NodeListHandle, NodeListIter};
pub use names::ComponentName;
pub use node::{
    NamedNodeList, NamedNodeListRef, NamedNodeListType, Node, NodeList, NodeListRef, NodeRef,
    NoSdataMapper, SdataMapper,
};
pub use nodes::MessageNode;
pub use string::{GroveChar, GroveString, GroveStringList};
pub use value::PropertyValue;
