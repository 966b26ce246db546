//! Owning handles over nodes and lists.
//!
//! A [`NodeHandle`] wraps a [`NodeRef`] and adds the conveniences a
//! caller walking a grove wants: typed navigation, attribute lookup by
//! plain string, and `assign_*` steps that move the handle without
//! allocating when it holds the only reference to its node.
//!
//! ```
//! use std::sync::Arc;
//! use grove_core::{Event, GroveBuilder, GroveConfig, StartElement};
//! use grove_core::decl::ElementType;
//!
//! let (mut builder, root) = GroveBuilder::new(0, GroveConfig::default());
//! let list = Arc::new(ElementType::new("LIST"));
//! let item = Arc::new(ElementType::new("ITEM"));
//! builder.handle_event(Event::start(StartElement::new(list))).unwrap();
//! for _ in 0..3 {
//!     builder.handle_event(Event::start(StartElement::new(item.clone()))).unwrap();
//!     builder.handle_event(Event::EndElement).unwrap();
//! }
//! builder.handle_event(Event::EndElement).unwrap();
//! builder.handle_event(Event::EndDocument).unwrap();
//!
//! let mut node = root.document_element().unwrap();
//! node.assign_first_child().unwrap();
//! let mut count = 1;
//! while node.assign_next_sibling().is_ok() {
//!     count += 1;
//! }
//! assert_eq!(count, 3);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::access::{Access, AccessResult};
use crate::node::{NamedNodeListRef, NodeListRef, NodeRef, SdataMapper, Step};
use crate::string::GroveString;

/// An owned reference to one node.
#[derive(Clone)]
pub struct NodeHandle {
    node: NodeRef,
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeHandle").field(&self.node).finish()
    }
}

impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl From<NodeRef> for NodeHandle {
    fn from(node: NodeRef) -> Self {
        NodeHandle::new(node)
    }
}

impl NodeHandle {
    pub fn new(node: NodeRef) -> Self {
        Self { node }
    }

    #[inline]
    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    pub fn into_node(self) -> NodeRef {
        self.node
    }

    pub fn grove_index(&self) -> u32 {
        self.node.grove_index()
    }

    /// Structural equality of the underlying nodes.
    pub fn same_node(&self, other: &NodeHandle) -> bool {
        self.node.same(other.node.as_node())
    }

    /// Whether both handles share one node object.
    pub fn ptr_eq(&self, other: &NodeHandle) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    pub fn gi(&self) -> Option<GroveString> {
        self.node.gi().ok()
    }

    pub fn element_index(&self) -> Option<u32> {
        self.node.element_index().ok()
    }

    /// Value of the attribute `name` as a string: the token text for a
    /// tokenized value, the character data otherwise.
    pub fn attribute_string(&self, name: &str, mapper: &dyn SdataMapper) -> Option<GroveString> {
        let attributes = self.node.attributes().ok()?;
        let assignment = attributes.named_node(&GroveString::from(name)).ok()?;
        match assignment.tokens() {
            Ok(tokens) => Some(tokens),
            Err(Access::NotInClass) => {
                let value = assignment.value().ok()?;
                value.first().ok()?.char_chunk(mapper).ok()
            }
            Err(_) => None,
        }
    }

    // ------------------------------------------------------------------
    // Navigation returning new handles
    // ------------------------------------------------------------------

    pub fn parent(&self) -> AccessResult<NodeHandle> {
        self.node.parent().map(NodeHandle::new)
    }

    pub fn origin(&self) -> AccessResult<NodeHandle> {
        self.node.origin().map(NodeHandle::new)
    }

    pub fn first_child(&self) -> AccessResult<NodeHandle> {
        self.node.first_child().map(NodeHandle::new)
    }

    pub fn next_sibling(&self) -> AccessResult<NodeHandle> {
        self.node.next_sibling().map(NodeHandle::new)
    }

    pub fn next_chunk_sibling(&self) -> AccessResult<NodeHandle> {
        self.node.next_chunk_sibling().map(NodeHandle::new)
    }

    pub fn next_chunk_after(&self) -> AccessResult<NodeHandle> {
        self.node.next_chunk_after().map(NodeHandle::new)
    }

    /// The sibling just before this one, scanning from the first sibling.
    pub fn previous_sibling(&self) -> AccessResult<NodeHandle> {
        let mut node = self.node.first_sibling()?;
        if node.same(self.node.as_node()) {
            return Err(Access::Null);
        }
        loop {
            let next = node.next_sibling()?;
            if next.same(self.node.as_node()) {
                return Ok(NodeHandle::new(node));
            }
            node = next;
        }
    }

    /// The document element of this node's grove.
    pub fn document_element(&self) -> AccessResult<NodeHandle> {
        self.node.grove_root()?.document_element().map(NodeHandle::new)
    }

    pub fn children(&self) -> AccessResult<NodeListHandle> {
        self.node.children().map(NodeListHandle::new)
    }

    pub fn attributes(&self) -> AccessResult<NamedNodeListHandle> {
        self.node.attributes().map(NamedNodeListHandle::new)
    }

    // ------------------------------------------------------------------
    // In-place navigation
    // ------------------------------------------------------------------

    /// Move by `step`, reusing the node when this handle owns it alone.
    /// On failure the handle is left where it was.
    fn assign(&mut self, step: Step) -> AccessResult<()> {
        if let Some(node) = Arc::get_mut(&mut self.node) {
            if let Some(result) = node.step_in_place(step) {
                return result;
            }
        }
        self.node = match step {
            Step::FirstChild => self.node.first_child()?,
            Step::NextSibling => self.node.next_sibling()?,
            Step::NextChunkSibling => self.node.next_chunk_sibling()?,
        };
        Ok(())
    }

    pub fn assign_first_child(&mut self) -> AccessResult<()> {
        self.assign(Step::FirstChild)
    }

    pub fn assign_next_sibling(&mut self) -> AccessResult<()> {
        self.assign(Step::NextSibling)
    }

    pub fn assign_next_chunk_sibling(&mut self) -> AccessResult<()> {
        self.assign(Step::NextChunkSibling)
    }

    pub fn assign_origin(&mut self) -> AccessResult<()> {
        self.node = self.node.origin()?;
        Ok(())
    }

    /// Run `f` until it stops timing out, waiting for the grove to grow
    /// in between. Gives up with the timeout once a wait of `wait` passes
    /// without growth.
    pub fn retry_on_timeout<T>(
        &self,
        wait: Duration,
        mut f: impl FnMut(&NodeHandle) -> AccessResult<T>,
    ) -> AccessResult<T> {
        loop {
            match f(self) {
                Err(Access::Timeout) => {
                    if !self.node.wait_for_more_nodes(wait) {
                        // Complete, or no growth within `wait`.
                        return f(self);
                    }
                }
                other => return other,
            }
        }
    }
}

/// An owned node list.
#[derive(Clone)]
pub struct NodeListHandle {
    list: NodeListRef,
}

impl fmt::Debug for NodeListHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeListHandle").field(&self.list).finish()
    }
}

impl NodeListHandle {
    pub fn new(list: NodeListRef) -> Self {
        Self { list }
    }

    pub fn list(&self) -> &NodeListRef {
        &self.list
    }

    pub fn first(&self) -> AccessResult<NodeHandle> {
        self.list.first().map(NodeHandle::new)
    }

    pub fn nth(&self, n: usize) -> AccessResult<NodeHandle> {
        self.list.nth(n).map(NodeHandle::new)
    }

    pub fn rest(&self) -> AccessResult<NodeListHandle> {
        self.list.rest().map(NodeListHandle::new)
    }

    /// Drop the first member, in place when possible.
    pub fn assign_rest(&mut self) -> AccessResult<()> {
        if let Some(list) = Arc::get_mut(&mut self.list) {
            if let Some(result) = list.rest_in_place() {
                return result;
            }
        }
        self.list = self.list.rest()?;
        Ok(())
    }

    /// Drop the rest of the first member's chunk, in place when possible.
    pub fn assign_chunk_rest(&mut self) -> AccessResult<()> {
        if let Some(list) = Arc::get_mut(&mut self.list) {
            if let Some(result) = list.chunk_rest_in_place() {
                return result;
            }
        }
        self.list = self.list.chunk_rest()?;
        Ok(())
    }

    /// Iterate members, stopping at the end or the first timeout.
    pub fn iter(&self) -> NodeListIter {
        NodeListIter { list: Some(self.list.clone()) }
    }
}

/// Iterator over a node list. Stops at the first accessor that does not
/// yield a node, so a growing list ends early on a timeout.
#[derive(Debug)]
pub struct NodeListIter {
    list: Option<NodeListRef>,
}

impl Iterator for NodeListIter {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<NodeHandle> {
        let list = self.list.take()?;
        let first = list.first().ok()?;
        self.list = list.rest().ok();
        Some(NodeHandle::new(first))
    }
}

/// An owned named node list.
#[derive(Clone)]
pub struct NamedNodeListHandle {
    list: NamedNodeListRef,
}

impl fmt::Debug for NamedNodeListHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamedNodeListHandle").field(&self.list).finish()
    }
}

impl NamedNodeListHandle {
    pub fn new(list: NamedNodeListRef) -> Self {
        Self { list }
    }

    pub fn list(&self) -> &NamedNodeListRef {
        &self.list
    }

    pub fn named_node(&self, name: &str) -> AccessResult<NodeHandle> {
        self.list.named_node(&GroveString::from(name)).map(NodeHandle::new)
    }

    pub fn node_list(&self) -> NodeListHandle {
        NodeListHandle::new(self.list.node_list())
    }

    pub fn node_name(&self, node: &NodeHandle) -> AccessResult<GroveString> {
        self.list.node_name(node.node().as_node())
    }
}
