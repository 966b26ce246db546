//! Chunk-backed views: the document, elements, data and leaf references.

use std::sync::Arc;

use super::{
    chunk_hash, chunk_node, downcast, first_child_id, first_sibling_id, next_chunk_sibling_id, node_basics, origin_node, root_relation,
    AttributeOwner, DocumentTypeNode, ElementTypeNode, EntityNode, MessageNode, SgmlConstantsNode,
};
use crate::access::{or_null, Access, AccessResult};
use crate::arena::{ChunkId, ChunkKind};
use crate::class_def::NodeClass;
use crate::decl::{Dtd, Entity, Location};
use crate::grove::{GroveImpl, GroveState};
use crate::lists::{
    DeclNamedNodeList, AttributesList, ElementsNamedNodeList, EmptyNodeList, SiblingNodeList,
    VecNodeList,
};
use crate::names::ComponentName;
use crate::node::{NamedNodeListRef, NamedNodeListType, Node, NodeListRef, NodeRef, SdataMapper, Step};
use crate::string::{GroveChar, GroveString};

/// A sibling list starting at `first`, or the empty list on null.
fn list_from(first: AccessResult<NodeRef>) -> AccessResult<NodeListRef> {
    match first {
        Ok(node) => Ok(Arc::new(SiblingNodeList::new(node))),
        Err(Access::Null) => Ok(Arc::new(EmptyNodeList)),
        Err(other) => Err(other),
    }
}

/// Entity of a leaf reference chunk.
fn chunk_entity(state: &GroveState, id: ChunkId) -> Option<Arc<Entity>> {
    match state.chunk(id).map(|c| &c.kind) {
        Some(
            ChunkKind::PiEntity(e)
            | ChunkKind::Sdata(e)
            | ChunkKind::ExternalData(e)
            | ChunkKind::Subdocument(e),
        ) => Some(e.clone()),
        _ => None,
    }
}

fn navigate(
    grove: &Arc<GroveImpl>,
    chunk: ChunkId,
    step: fn(&GroveState, ChunkId) -> AccessResult<ChunkId>,
) -> AccessResult<NodeRef> {
    let state = grove.read();
    let target = step(&state, chunk)?;
    chunk_node(grove, &state, target)
}

// ============================================================================
// Document
// ============================================================================

/// The sgml-document node; one per grove.
#[derive(Debug, Clone)]
pub(crate) struct DocumentNode {
    grove: Arc<GroveImpl>,
}

impl DocumentNode {
    pub(crate) fn new(grove: Arc<GroveImpl>) -> Self {
        Self { grove }
    }

    /// Declaration lists answer timeout until the prolog has ended.
    fn with_dtd<T>(
        &self,
        f: impl FnOnce(&GroveState, &Arc<Dtd>) -> AccessResult<T>,
        none: impl FnOnce() -> T,
    ) -> AccessResult<T> {
        let state = self.grove.read();
        match state.dtd() {
            Some(dtd) => f(&state, dtd),
            None if state.prolog_open() => Err(Access::Timeout),
            None => Ok(none()),
        }
    }
}

impl Node for DocumentNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::SgmlDocument
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<DocumentNode>(other).is_some_and(|o| Arc::ptr_eq(&o.grove, &self.grove))
    }

    fn hash_code(&self) -> u64 {
        chunk_hash(self.grove.grove_index(), ChunkId::ROOT, 0)
    }

    fn location(&self) -> AccessResult<Location> {
        Ok(self.grove.read().location(ChunkId::ROOT, 0))
    }

    fn follow(&self) -> AccessResult<NodeListRef> {
        Err(Access::Null)
    }

    fn children(&self) -> AccessResult<NodeListRef> {
        list_from(self.document_element())
    }

    fn document_element(&self) -> AccessResult<NodeRef> {
        let state = self.grove.read();
        match state.arena().root().document_element {
            Some(id) => chunk_node(&self.grove, &state, id),
            None if state.is_complete() => Err(Access::Null),
            None => Err(Access::Timeout),
        }
    }

    fn prolog(&self) -> AccessResult<NodeListRef> {
        let state = self.grove.read();
        match state.arena().root().prolog {
            Some(id) => Ok(Arc::new(SiblingNodeList::new(chunk_node(&self.grove, &state, id)?))),
            None if state.prolog_open() => Err(Access::Timeout),
            None => Ok(Arc::new(EmptyNodeList)),
        }
    }

    fn epilog(&self) -> AccessResult<NodeListRef> {
        let state = self.grove.read();
        match state.arena().root().epilog {
            Some(id) => Ok(Arc::new(SiblingNodeList::new(chunk_node(&self.grove, &state, id)?))),
            None if state.is_complete() => Ok(Arc::new(EmptyNodeList)),
            None => Err(Access::Timeout),
        }
    }

    fn sgml_constants(&self) -> AccessResult<NodeRef> {
        Ok(Arc::new(SgmlConstantsNode::new(self.grove.clone())))
    }

    fn application_info(&self) -> AccessResult<GroveString> {
        self.grove.read().appinfo()
    }

    fn governing_doctype(&self) -> AccessResult<NodeRef> {
        let state = self.grove.read();
        match state.dtd() {
            Some(dtd) => Ok(Arc::new(DocumentTypeNode::new(self.grove.clone(), dtd.clone()))),
            None if state.prolog_open() => Err(Access::Timeout),
            None => Err(Access::Null),
        }
    }

    fn doctypes_and_linktypes(&self) -> AccessResult<NamedNodeListRef> {
        let grove = self.grove.clone();
        self.with_dtd(
            |state, dtd| {
                let node: NodeRef = Arc::new(DocumentTypeNode::new(grove.clone(), dtd.clone()));
                Ok(DeclNamedNodeList::build(
                    state,
                    NamedNodeListType::DoctypesAndLinktypes,
                    vec![(dtd.name.clone(), node)],
                ))
            },
            || DeclNamedNodeList::empty(NamedNodeListType::DoctypesAndLinktypes),
        )
    }

    fn elements(&self) -> AccessResult<NamedNodeListRef> {
        let state = self.grove.read();
        if state.arena().root().document_element.is_none() && !state.is_complete() {
            return Err(Access::Timeout);
        }
        Ok(Arc::new(ElementsNamedNodeList::new(self.grove.clone())))
    }

    fn entities(&self) -> AccessResult<NamedNodeListRef> {
        let grove = self.grove.clone();
        self.with_dtd(
            |state, dtd| {
                let members = dtd
                    .general_entities
                    .iter()
                    .chain(state.defaulted_entities())
                    .map(|e| {
                        let node: NodeRef = Arc::new(EntityNode::declared(grove.clone(), e.clone()));
                        (e.name.clone(), node)
                    })
                    .collect();
                Ok(DeclNamedNodeList::build(state, NamedNodeListType::Entities, members))
            },
            || DeclNamedNodeList::empty(NamedNodeListType::Entities),
        )
    }

    fn defaulted_entities(&self) -> AccessResult<NamedNodeListRef> {
        let state = self.grove.read();
        let members = state
            .defaulted_entities()
            .iter()
            .map(|e| {
                let node: NodeRef = Arc::new(EntityNode::defaulted(self.grove.clone(), e.clone()));
                (e.name.clone(), node)
            })
            .collect();
        Ok(DeclNamedNodeList::build(&state, NamedNodeListType::Entities, members))
    }

    fn messages(&self) -> AccessResult<NodeListRef> {
        let n = self.grove.read().messages().len();
        let nodes: Vec<NodeRef> =
            (0..n).map(|i| Arc::new(MessageNode::new(self.grove.clone(), i)) as NodeRef).collect();
        Ok(Arc::new(VecNodeList::new(nodes)))
    }
}

// ============================================================================
// Element
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct ElementNode {
    grove: Arc<GroveImpl>,
    chunk: ChunkId,
}

impl ElementNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, chunk: ChunkId) -> Self {
        Self { grove, chunk }
    }

    fn with_element<T>(&self, f: impl FnOnce(&crate::arena::ElementChunk) -> T) -> AccessResult<T> {
        let state = self.grove.read();
        let element = state.chunk(self.chunk).and_then(|c| c.element()).ok_or(Access::Null)?;
        Ok(f(element))
    }

    /// Retarget to `step`'s destination when that is another element.
    fn step_to(&mut self, step: fn(&GroveState, ChunkId) -> AccessResult<ChunkId>) -> Option<AccessResult<()>> {
        let state = self.grove.read();
        match step(&state, self.chunk) {
            Ok(target) if state.chunk(target).is_some_and(|c| c.kind.is_element()) => {
                self.chunk = target;
                Some(Ok(()))
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl Node for ElementNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::Element
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<ElementNode>(other)
            .is_some_and(|o| o.chunk == self.chunk && Arc::ptr_eq(&o.grove, &self.grove))
    }

    fn hash_code(&self) -> u64 {
        chunk_hash(self.grove.grove_index(), self.chunk, 0)
    }

    fn step_in_place(&mut self, step: Step) -> Option<AccessResult<()>> {
        match step {
            Step::FirstChild => self.step_to(first_child_id),
            Step::NextSibling | Step::NextChunkSibling => self.step_to(next_chunk_sibling_id),
        }
    }

    fn location(&self) -> AccessResult<Location> {
        Ok(self.grove.read().location(self.chunk, 0))
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn parent(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        let state = self.grove.read();
        match state.chunk(self.chunk).and_then(|c| c.origin) {
            Some(ChunkId::ROOT) => Ok(ComponentName::DocumentElement),
            Some(_) => Ok(ComponentName::Content),
            None => Err(Access::Null),
        }
    }

    fn children(&self) -> AccessResult<NodeListRef> {
        list_from(self.first_child())
    }

    fn content(&self) -> AccessResult<NodeListRef> {
        self.children()
    }

    fn first_child(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, first_child_id)
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        self.next_chunk_sibling()
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, next_chunk_sibling_id)
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, first_sibling_id)
    }

    fn element_index(&self) -> AccessResult<u32> {
        self.with_element(|e| e.element_index)
    }

    fn gi(&self) -> AccessResult<GroveString> {
        self.with_element(|e| e.element_type.name.clone())
    }

    fn has_gi(&self, gi: &GroveString) -> bool {
        self.with_element(|e| &e.element_type.name == gi).unwrap_or(false)
    }

    fn id(&self) -> AccessResult<GroveString> {
        self.with_element(|e| e.id.clone()).and_then(or_null)
    }

    fn attributes(&self) -> AccessResult<NamedNodeListRef> {
        let owner = self.with_element(|e| AttributeOwner::element(self.chunk, e))?;
        Ok(Arc::new(AttributesList::new(self.grove.clone(), owner)))
    }

    fn included(&self) -> AccessResult<bool> {
        self.with_element(|e| e.included)
    }

    fn must_omit_end_tag(&self) -> AccessResult<bool> {
        self.with_element(|e| e.must_omit_end_tag)
    }

    fn element_type(&self) -> AccessResult<NodeRef> {
        let ty = self.with_element(|e| e.element_type.clone())?;
        Ok(Arc::new(ElementTypeNode::new(self.grove.clone(), ty)))
    }
}

// ============================================================================
// Data
// ============================================================================

/// One character of a data chunk.
#[derive(Debug, Clone)]
pub(crate) struct DataNode {
    grove: Arc<GroveImpl>,
    chunk: ChunkId,
    index: u32,
}

impl DataNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, chunk: ChunkId, index: u32) -> Self {
        Self { grove, chunk, index }
    }

    fn text(&self) -> AccessResult<GroveString> {
        match self.grove.read().chunk(self.chunk).map(|c| &c.kind) {
            Some(ChunkKind::Data(text)) => Ok(text.clone()),
            _ => Err(Access::Null),
        }
    }
}

impl Node for DataNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::DataChar
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<DataNode>(other).is_some_and(|o| {
            o.chunk == self.chunk && o.index == self.index && Arc::ptr_eq(&o.grove, &self.grove)
        })
    }

    fn chunk_contains(&self, other: &dyn Node) -> bool {
        downcast::<DataNode>(other).is_some_and(|o| {
            o.chunk == self.chunk && o.index >= self.index && Arc::ptr_eq(&o.grove, &self.grove)
        })
    }

    fn hash_code(&self) -> u64 {
        chunk_hash(self.grove.grove_index(), self.chunk, self.index)
    }

    fn step_in_place(&mut self, step: Step) -> Option<AccessResult<()>> {
        if step == Step::FirstChild {
            return Some(Err(Access::NotInClass));
        }
        let state = self.grove.read();
        if step == Step::NextSibling {
            let len = match state.chunk(self.chunk).map(|c| &c.kind) {
                Some(ChunkKind::Data(text)) => text.len(),
                _ => 0,
            };
            if (self.index as usize) + 1 < len {
                self.index += 1;
                return Some(Ok(()));
            }
        }
        match next_chunk_sibling_id(&state, self.chunk) {
            Ok(target) if matches!(state.chunk(target).map(|c| &c.kind), Some(ChunkKind::Data(_))) => {
                self.chunk = target;
                self.index = 0;
                Some(Ok(()))
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        }
    }

    fn location(&self) -> AccessResult<Location> {
        Ok(self.grove.read().location(self.chunk, self.index))
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn parent(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::Content)
    }

    fn char_chunk(&self, _mapper: &dyn SdataMapper) -> AccessResult<GroveString> {
        Ok(self.text()?.skip(self.index as usize))
    }

    fn char(&self, _mapper: &dyn SdataMapper) -> AccessResult<GroveChar> {
        self.text()?.get(self.index as usize).ok_or(Access::Null)
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        let len = self.text()?.len();
        if (self.index as usize) + 1 < len {
            return Ok(Arc::new(DataNode::new(self.grove.clone(), self.chunk, self.index + 1)));
        }
        self.next_chunk_sibling()
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, next_chunk_sibling_id)
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, first_sibling_id)
    }

    fn follow_sibling_ref(&self, n: usize) -> AccessResult<NodeRef> {
        // Skip within the chunk first.
        let len = self.text()?.len();
        let target = (self.index as usize + 1).checked_add(n).ok_or(Access::Null)?;
        if target < len {
            return Ok(Arc::new(DataNode::new(self.grove.clone(), self.chunk, target as u32)));
        }
        let mut node = self.next_chunk_sibling()?;
        for _ in 0..(target - len) {
            node = node.next_sibling()?;
        }
        Ok(node)
    }
}

// ============================================================================
// Processing instructions
// ============================================================================

/// An inline processing instruction or a PI entity reference.
#[derive(Debug, Clone)]
pub(crate) struct PiNode {
    grove: Arc<GroveImpl>,
    chunk: ChunkId,
}

impl PiNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, chunk: ChunkId) -> Self {
        Self { grove, chunk }
    }
}

impl Node for PiNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::Pi
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<PiNode>(other).is_some_and(|o| o.chunk == self.chunk && Arc::ptr_eq(&o.grove, &self.grove))
    }

    fn hash_code(&self) -> u64 {
        chunk_hash(self.grove.grove_index(), self.chunk, 0)
    }

    fn location(&self) -> AccessResult<Location> {
        Ok(self.grove.read().location(self.chunk, 0))
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn parent(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        let state = self.grove.read();
        match state.chunk(self.chunk).and_then(|c| c.origin) {
            Some(ChunkId::ROOT) => Ok(root_relation(&state, self.chunk)),
            Some(_) => Ok(ComponentName::Content),
            None => Err(Access::Null),
        }
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        self.next_chunk_sibling()
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, next_chunk_sibling_id)
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, first_sibling_id)
    }

    fn system_data(&self) -> AccessResult<GroveString> {
        match self.grove.read().chunk(self.chunk).map(|c| &c.kind) {
            Some(ChunkKind::Pi(text)) => Ok(text.clone()),
            Some(ChunkKind::PiEntity(entity)) => or_null(entity.text.clone()),
            _ => Err(Access::Null),
        }
    }

    fn entity_name(&self) -> AccessResult<GroveString> {
        let entity = or_null(chunk_entity(&self.grove.read(), self.chunk))?;
        Ok(entity.name.clone())
    }

    fn entity(&self) -> AccessResult<NodeRef> {
        let entity = or_null(chunk_entity(&self.grove.read(), self.chunk))?;
        Ok(Arc::new(EntityNode::declared(self.grove.clone(), entity)))
    }
}

// ============================================================================
// Entity references
// ============================================================================

/// An sdata, external-data or subdocument entity reference.
#[derive(Debug, Clone)]
pub(crate) struct EntityRefNode {
    grove: Arc<GroveImpl>,
    chunk: ChunkId,
    class: NodeClass,
}

impl EntityRefNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, chunk: ChunkId, class: NodeClass) -> Self {
        Self { grove, chunk, class }
    }

    fn entity_ref(&self) -> AccessResult<Arc<Entity>> {
        or_null(chunk_entity(&self.grove.read(), self.chunk))
    }
}

impl Node for EntityRefNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        self.class
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<EntityRefNode>(other)
            .is_some_and(|o| o.chunk == self.chunk && Arc::ptr_eq(&o.grove, &self.grove))
    }

    fn hash_code(&self) -> u64 {
        chunk_hash(self.grove.grove_index(), self.chunk, 0)
    }

    fn location(&self) -> AccessResult<Location> {
        Ok(self.grove.read().location(self.chunk, 0))
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn parent(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::Content)
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        self.next_chunk_sibling()
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, next_chunk_sibling_id)
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, first_sibling_id)
    }

    fn entity_name(&self) -> AccessResult<GroveString> {
        Ok(self.entity_ref()?.name.clone())
    }

    fn entity(&self) -> AccessResult<NodeRef> {
        Ok(Arc::new(EntityNode::declared(self.grove.clone(), self.entity_ref()?)))
    }

    fn system_data(&self) -> AccessResult<GroveString> {
        if self.class != NodeClass::Sdata {
            return Err(Access::NotInClass);
        }
        or_null(self.entity_ref()?.text.clone())
    }

    fn char(&self, mapper: &dyn SdataMapper) -> AccessResult<GroveChar> {
        if self.class != NodeClass::Sdata {
            return Err(Access::NotInClass);
        }
        let entity = self.entity_ref()?;
        let text = entity.text.clone().unwrap_or_default();
        mapper.sdata_map(&entity.name, &text).ok_or(Access::Null)
    }

    fn char_chunk(&self, mapper: &dyn SdataMapper) -> AccessResult<GroveString> {
        self.char(mapper).map(GroveString::from_char)
    }
}

// ============================================================================
// Non-SGML characters
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct NonSgmlNode {
    grove: Arc<GroveImpl>,
    chunk: ChunkId,
}

impl NonSgmlNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, chunk: ChunkId) -> Self {
        Self { grove, chunk }
    }
}

impl Node for NonSgmlNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::NonSgml
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<NonSgmlNode>(other)
            .is_some_and(|o| o.chunk == self.chunk && Arc::ptr_eq(&o.grove, &self.grove))
    }

    fn hash_code(&self) -> u64 {
        chunk_hash(self.grove.grove_index(), self.chunk, 0)
    }

    fn location(&self) -> AccessResult<Location> {
        Ok(self.grove.read().location(self.chunk, 0))
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn parent(&self) -> AccessResult<NodeRef> {
        origin_node(&self.grove, self.chunk)
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::Content)
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        self.next_chunk_sibling()
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, next_chunk_sibling_id)
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        navigate(&self.grove, self.chunk, first_sibling_id)
    }

    fn char(&self, _mapper: &dyn SdataMapper) -> AccessResult<GroveChar> {
        match self.grove.read().chunk(self.chunk).map(|c| &c.kind) {
            Some(ChunkKind::NonSgml(c)) => Ok(*c),
            _ => Err(Access::Null),
        }
    }

    fn char_chunk(&self, mapper: &dyn SdataMapper) -> AccessResult<GroveString> {
        self.char(mapper).map(GroveString::from_char)
    }
}
