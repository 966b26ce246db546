//! Node lists and named node lists.
//!
//! Lists are persistent: `rest` returns a new list and leaves the
//! receiver untouched. A list held uniquely can advance itself with
//! `rest_in_place` instead, which reuses the node it already holds.

use std::sync::Arc;

use crate::access::{Access, AccessResult};
use crate::decl::Syntax;
use crate::grove::{GroveImpl, GroveState};
use crate::node::{
    NamedNodeList, NamedNodeListRef, NamedNodeListType, NodeList, NodeListRef, NodeRef, Step,
};
use crate::nodes::{chunk_node, AttributeAsgnNode, AttributeOwner};
use crate::string::GroveString;

// ============================================================================
// Node lists
// ============================================================================

/// The list with no members.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyNodeList;

impl NodeList for EmptyNodeList {
    fn first(&self) -> AccessResult<NodeRef> {
        Err(Access::Null)
    }

    fn rest(&self) -> AccessResult<NodeListRef> {
        Err(Access::Null)
    }

    fn nth(&self, _n: usize) -> AccessResult<NodeRef> {
        Err(Access::Null)
    }

    fn rest_in_place(&mut self) -> Option<AccessResult<()>> {
        Some(Err(Access::Null))
    }
}

/// A node and its following siblings.
#[derive(Debug, Clone)]
pub struct SiblingNodeList {
    first: NodeRef,
}

impl SiblingNodeList {
    pub fn new(first: NodeRef) -> Self {
        Self { first }
    }

    fn after(next: AccessResult<NodeRef>) -> AccessResult<NodeListRef> {
        match next {
            Ok(node) => Ok(Arc::new(SiblingNodeList::new(node))),
            Err(Access::Null) => Ok(Arc::new(EmptyNodeList)),
            Err(other) => Err(other),
        }
    }

    /// Advance `first` by one step, in place when the node allows it.
    /// A null step leaves the list unchanged and returns `None`.
    fn advance(&mut self, step: Step) -> Option<AccessResult<()>> {
        if let Some(node) = Arc::get_mut(&mut self.first) {
            match node.step_in_place(step) {
                Some(Err(Access::Null)) => return None,
                Some(result) => return Some(result),
                None => {}
            }
        }
        let next = match step {
            Step::NextChunkSibling => self.first.next_chunk_sibling(),
            _ => self.first.next_sibling(),
        };
        match next {
            Ok(node) => {
                self.first = node;
                Some(Ok(()))
            }
            Err(Access::Null) => None,
            Err(other) => Some(Err(other)),
        }
    }
}

impl NodeList for SiblingNodeList {
    fn first(&self) -> AccessResult<NodeRef> {
        Ok(self.first.clone())
    }

    fn rest(&self) -> AccessResult<NodeListRef> {
        Self::after(self.first.next_sibling())
    }

    fn chunk_rest(&self) -> AccessResult<NodeListRef> {
        Self::after(self.first.next_chunk_sibling())
    }

    fn nth(&self, n: usize) -> AccessResult<NodeRef> {
        match n {
            0 => Ok(self.first.clone()),
            _ => self.first.follow_sibling_ref(n - 1),
        }
    }

    fn rest_in_place(&mut self) -> Option<AccessResult<()>> {
        self.advance(Step::NextSibling)
    }

    fn chunk_rest_in_place(&mut self) -> Option<AccessResult<()>> {
        self.advance(Step::NextChunkSibling)
    }
}

/// A materialized snapshot of nodes.
#[derive(Debug, Clone)]
pub struct VecNodeList {
    nodes: Arc<[NodeRef]>,
    start: usize,
}

impl VecNodeList {
    pub fn new(nodes: Vec<NodeRef>) -> Self {
        Self { nodes: Arc::from(nodes), start: 0 }
    }

    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NodeList for VecNodeList {
    fn first(&self) -> AccessResult<NodeRef> {
        self.nodes.get(self.start).cloned().ok_or(Access::Null)
    }

    fn rest(&self) -> AccessResult<NodeListRef> {
        if self.is_empty() {
            return Err(Access::Null);
        }
        Ok(Arc::new(VecNodeList { nodes: self.nodes.clone(), start: self.start + 1 }))
    }

    fn nth(&self, n: usize) -> AccessResult<NodeRef> {
        self.start.checked_add(n).and_then(|i| self.nodes.get(i)).cloned().ok_or(Access::Null)
    }

    fn rest_in_place(&mut self) -> Option<AccessResult<()>> {
        if self.is_empty() {
            return Some(Err(Access::Null));
        }
        self.start += 1;
        Some(Ok(()))
    }
}

// ============================================================================
// Named node lists
// ============================================================================

/// Attribute assignments of an element (or of an external data entity).
#[derive(Debug, Clone)]
pub(crate) struct AttributesList {
    grove: Arc<GroveImpl>,
    owner: AttributeOwner,
}

impl AttributesList {
    pub(crate) fn new(grove: Arc<GroveImpl>, owner: AttributeOwner) -> Self {
        Self { grove, owner }
    }
}

impl NamedNodeList for AttributesList {
    fn list_type(&self) -> NamedNodeListType {
        NamedNodeListType::Attributes
    }

    fn normalize(&self, name: &GroveString) -> GroveString {
        self.grove.read().general_fold(name)
    }

    fn named_node(&self, name: &GroveString) -> AccessResult<NodeRef> {
        let name = self.normalize(name);
        let index = self
            .owner
            .definer()
            .defs()
            .and_then(|defs| defs.position(&name))
            .ok_or(Access::Null)?;
        Ok(Arc::new(AttributeAsgnNode::new(self.grove.clone(), self.owner.clone(), index)))
    }

    fn node_list(&self) -> NodeListRef {
        if self.owner.len() == 0 {
            return Arc::new(EmptyNodeList);
        }
        let first = AttributeAsgnNode::new(self.grove.clone(), self.owner.clone(), 0);
        Arc::new(SiblingNodeList::new(Arc::new(first)))
    }
}

/// Elements by ID.
#[derive(Debug, Clone)]
pub(crate) struct ElementsNamedNodeList {
    grove: Arc<GroveImpl>,
}

impl ElementsNamedNodeList {
    pub(crate) fn new(grove: Arc<GroveImpl>) -> Self {
        Self { grove }
    }
}

impl NamedNodeList for ElementsNamedNodeList {
    fn list_type(&self) -> NamedNodeListType {
        NamedNodeListType::Elements
    }

    fn normalize(&self, name: &GroveString) -> GroveString {
        self.grove.read().general_fold(name)
    }

    fn named_node(&self, name: &GroveString) -> AccessResult<NodeRef> {
        let state = self.grove.read();
        let name = state.general_fold(name);
        match state.lookup_element(&name) {
            Some(id) => chunk_node(&self.grove, &state, id),
            None if state.is_complete() => Err(Access::Null),
            None => Err(Access::Timeout),
        }
    }

    /// The elements that have an ID so far, in document order.
    fn node_list(&self) -> NodeListRef {
        let state = self.grove.read();
        let nodes = state
            .elements_with_id()
            .into_iter()
            .filter_map(|id| chunk_node(&self.grove, &state, id).ok())
            .collect();
        Arc::new(VecNodeList::new(nodes))
    }
}

/// How a declaration list folds lookup names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fold {
    General,
    Entity,
}

/// A named list over declarations, snapshotted when it is created.
#[derive(Debug, Clone)]
pub(crate) struct DeclNamedNodeList {
    list_type: NamedNodeListType,
    members: Arc<[(GroveString, NodeRef)]>,
    syntax: Syntax,
    fold: Fold,
}

impl DeclNamedNodeList {
    pub(crate) fn build(
        state: &GroveState,
        list_type: NamedNodeListType,
        members: Vec<(GroveString, NodeRef)>,
    ) -> NamedNodeListRef {
        let syntax = state.instance_syntax().map(|s| (**s).clone()).unwrap_or_default();
        Arc::new(Self::with_syntax(list_type, members, syntax))
    }

    pub(crate) fn empty(list_type: NamedNodeListType) -> NamedNodeListRef {
        Arc::new(Self::with_syntax(list_type, Vec::new(), Syntax::default()))
    }

    fn with_syntax(
        list_type: NamedNodeListType,
        members: Vec<(GroveString, NodeRef)>,
        syntax: Syntax,
    ) -> Self {
        let fold = match list_type {
            NamedNodeListType::Entities => Fold::Entity,
            _ => Fold::General,
        };
        Self { list_type, members: Arc::from(members), syntax, fold }
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }
}

impl NamedNodeList for DeclNamedNodeList {
    fn list_type(&self) -> NamedNodeListType {
        self.list_type
    }

    fn normalize(&self, name: &GroveString) -> GroveString {
        match self.fold {
            Fold::General => self.syntax.general_fold(name),
            Fold::Entity => self.syntax.entity_fold(name),
        }
    }

    fn named_node(&self, name: &GroveString) -> AccessResult<NodeRef> {
        let name = self.normalize(name);
        self.members
            .iter()
            .find(|(member, _)| *member == name)
            .map(|(_, node)| node.clone())
            .ok_or(Access::Null)
    }

    fn node_list(&self) -> NodeListRef {
        if self.len() == 0 {
            return Arc::new(EmptyNodeList);
        }
        let nodes = self.members.iter().map(|(_, node)| node.clone()).collect();
        Arc::new(VecNodeList::new(nodes))
    }
}
