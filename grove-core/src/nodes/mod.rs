//! Node views and the chunk-to-node materializer.
//!
//! Nodes are cheap, transient views. A chunk-backed view is a grove
//! pointer plus a [`ChunkId`] (and a character index for data); the
//! declaration views wrap the `Arc`'d declaration they describe. Two
//! views are [`same`](crate::Node::same) when they describe the same
//! chunk or declaration, whichever object holds them.
//!
//! # Locking
//!
//! Accessors take the grove's read lock once, resolve what they need to
//! ids and `Arc`s, and materialize the result with [`chunk_node`] under
//! that same guard. No accessor calls another accessor while holding
//! the guard.

use std::sync::Arc;

use crate::access::{Access, AccessResult};
use crate::arena::{ChunkId, ChunkKind, SiblingScan};
use crate::class_def::NodeClass;
use crate::grove::{GroveImpl, GroveState};
use crate::node::{Node, NodeRef};

mod attribute;
mod chunk;
mod decl;
mod message;

pub(crate) use attribute::{AttributeAsgnNode, AttributeOwner};
pub(crate) use chunk::{DataNode, DocumentNode, ElementNode, EntityRefNode, NonSgmlNode, PiNode};
pub(crate) use decl::{
    AttributeDefNode, DefinitionOwner, DocumentTypeNode, ElementTypeNode, EntityNode, NotationNode,
    SgmlConstantsNode,
};
pub use message::MessageNode;

/// Boilerplate shared by every grove-backed view. Expects a field
/// `grove: Arc<GroveImpl>` and a `Clone` impl.
macro_rules! node_basics {
    () => {
        fn clone_node(&self) -> $crate::node::NodeRef {
            std::sync::Arc::new(self.clone())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_node(&self) -> &dyn $crate::node::Node {
            self
        }

        fn grove_index(&self) -> u32 {
            self.grove.grove_index()
        }

        fn wait_for_more_nodes(&self, timeout: std::time::Duration) -> bool {
            self.grove.wait_for_more_nodes(timeout)
        }

        fn grove_root(&self) -> $crate::access::AccessResult<$crate::node::NodeRef> {
            Ok($crate::nodes::document_node(&self.grove))
        }
    };
}
pub(crate) use node_basics;

/// `other` as a `T`, when it is one.
#[inline]
pub(crate) fn downcast<T: 'static>(other: &dyn Node) -> Option<&T> {
    other.as_any().downcast_ref::<T>()
}

/// The document node of a grove.
pub(crate) fn document_node(grove: &Arc<GroveImpl>) -> NodeRef {
    Arc::new(DocumentNode::new(grove.clone()))
}

/// Materialize the node for the start of chunk `id`.
pub(crate) fn chunk_node(grove: &Arc<GroveImpl>, state: &GroveState, id: ChunkId) -> AccessResult<NodeRef> {
    let chunk = state.chunk(id).ok_or(Access::Null)?;
    let grove = grove.clone();
    let node: NodeRef = match &chunk.kind {
        ChunkKind::Document => Arc::new(DocumentNode::new(grove)),
        ChunkKind::Element(_) => Arc::new(ElementNode::new(grove, id)),
        ChunkKind::Data(_) => Arc::new(DataNode::new(grove, id, 0)),
        ChunkKind::Pi(_) | ChunkKind::PiEntity(_) => Arc::new(PiNode::new(grove, id)),
        ChunkKind::Sdata(_) => Arc::new(EntityRefNode::new(grove, id, NodeClass::Sdata)),
        ChunkKind::ExternalData(_) => Arc::new(EntityRefNode::new(grove, id, NodeClass::ExternalData)),
        ChunkKind::Subdocument(_) => Arc::new(EntityRefNode::new(grove, id, NodeClass::Subdocument)),
        ChunkKind::NonSgml(_) => Arc::new(NonSgmlNode::new(grove, id)),
    };
    Ok(node)
}

/// Like [`chunk_node`], taking the read lock itself.
pub(crate) fn chunk_node_locked(grove: &Arc<GroveImpl>, id: ChunkId) -> AccessResult<NodeRef> {
    let state = grove.read();
    chunk_node(grove, &state, id)
}

// ============================================================================
// Chunk navigation
// ============================================================================

/// First child of chunk `id`: the chunk allocated right after it, if
/// that chunk's origin is `id`.
pub(crate) fn first_child_id(state: &GroveState, id: ChunkId) -> AccessResult<ChunkId> {
    match state.arena().after(id) {
        Some((next, chunk)) if chunk.origin == Some(id) => Ok(next),
        Some(_) => Err(Access::Null),
        None if !state.is_complete() && state.arena().is_ancestor(id, state.open()) => {
            Err(Access::Timeout)
        }
        None => Err(Access::Null),
    }
}

/// Next sibling chunk of `id`, by explicit link or allocation order.
pub(crate) fn next_chunk_sibling_id(state: &GroveState, id: ChunkId) -> AccessResult<ChunkId> {
    let chunk = state.chunk(id).ok_or(Access::Null)?;
    let origin = chunk.origin.ok_or(Access::NotInClass)?;
    if let Some(element) = chunk.element() {
        if origin == ChunkId::ROOT {
            // The document element has no siblings; the epilog is not one.
            return if state.is_complete() { Err(Access::Null) } else { Err(Access::Timeout) };
        }
        if let Some(next) = element.next_sibling {
            return Ok(next);
        }
    }
    match state.arena().scan_sibling(id) {
        SiblingScan::Found(next) => Ok(next),
        SiblingScan::End => Err(Access::Null),
        SiblingScan::Exhausted if state.maybe_more_siblings(origin) => Err(Access::Timeout),
        SiblingScan::Exhausted => Err(Access::Null),
    }
}

/// First chunk among the siblings of `id`.
pub(crate) fn first_sibling_id(state: &GroveState, id: ChunkId) -> AccessResult<ChunkId> {
    let chunk = state.chunk(id).ok_or(Access::Null)?;
    let origin = chunk.origin.ok_or(Access::NotInClass)?;
    if origin != ChunkId::ROOT {
        return first_child_id(state, origin);
    }
    let root = state.arena().root();
    if chunk.kind.is_element() {
        return Err(Access::NotInClass);
    }
    let in_prolog = root.document_element.map_or(true, |doc| id < doc);
    let first = if in_prolog { root.prolog } else { root.epilog };
    first.ok_or(Access::Null)
}

/// Relationship of a root-level leaf to the document.
pub(crate) fn root_relation(state: &GroveState, id: ChunkId) -> crate::names::ComponentName {
    use crate::names::ComponentName;
    match state.arena().root().document_element {
        Some(doc) if id > doc => ComponentName::Epilog,
        _ => ComponentName::Prolog,
    }
}

/// Parent node of chunk `id`.
pub(crate) fn origin_node(grove: &Arc<GroveImpl>, id: ChunkId) -> AccessResult<NodeRef> {
    let state = grove.read();
    let origin = state.chunk(id).and_then(|c| c.origin).ok_or(Access::Null)?;
    chunk_node(grove, &state, origin)
}

/// Hash consistent with chunk identity.
#[inline]
pub(crate) fn chunk_hash(grove_index: u32, id: ChunkId, index: u32) -> u64 {
    ((grove_index as u64) << 48) ^ ((id.0 as u64) << 16) ^ index as u64
}
