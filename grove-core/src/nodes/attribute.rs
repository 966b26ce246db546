//! Attribute assignments and their value nodes.

use std::sync::Arc;

use super::{chunk_hash, chunk_node_locked, downcast, node_basics, AttributeDefNode, DefinitionOwner, EntityNode, NotationNode};
use crate::access::{or_null, Access, AccessResult};
use crate::arena::{ChunkId, ElementChunk};
use crate::class_def::NodeClass;
use crate::decl::{AttributeDefinition, AttributeValue, DeclValueType, Entity};
use crate::grove::GroveImpl;
use crate::lists::{EmptyNodeList, SiblingNodeList, VecNodeList};
use crate::names::ComponentName;
use crate::node::{Node, NodeListRef, NodeRef, SdataMapper};
use crate::string::{GroveChar, GroveString};

#[derive(Debug, Clone)]
enum Holder {
    Element(ChunkId),
    Entity(Arc<Entity>),
}

/// Where an attribute list lives: the holder node plus its definitions
/// and resolved values, one slot per definition.
#[derive(Debug, Clone)]
pub(crate) struct AttributeOwner {
    holder: Holder,
    definer: DefinitionOwner,
    values: Arc<[Option<AttributeValue>]>,
}

impl AttributeOwner {
    pub(crate) fn element(chunk: ChunkId, element: &ElementChunk) -> Self {
        Self {
            holder: Holder::Element(chunk),
            definer: DefinitionOwner::ElementType(element.element_type.clone()),
            values: element.attributes.clone(),
        }
    }

    /// Data attributes of an external data entity, taken from its
    /// notation's defaults.
    pub(crate) fn entity(entity: Arc<Entity>) -> Option<Self> {
        let notation = entity.notation.clone()?;
        let defs = notation.attribute_defs.clone()?;
        let values: Vec<Option<AttributeValue>> =
            defs.defs.iter().map(|d| d.default.value().cloned()).collect();
        Some(Self {
            holder: Holder::Entity(entity),
            definer: DefinitionOwner::Notation(notation),
            values: Arc::from(values),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn definer(&self) -> &DefinitionOwner {
        &self.definer
    }

    fn def(&self, index: usize) -> AccessResult<&AttributeDefinition> {
        or_null(self.definer.defs().and_then(|defs| defs.defs.get(index)))
    }

    fn value(&self, index: usize) -> Option<&AttributeValue> {
        self.values.get(index).and_then(Option::as_ref)
    }

    fn node(&self, grove: &Arc<GroveImpl>) -> AccessResult<NodeRef> {
        match &self.holder {
            Holder::Element(chunk) => chunk_node_locked(grove, *chunk),
            Holder::Entity(entity) => Ok(Arc::new(EntityNode::declared(grove.clone(), entity.clone()))),
        }
    }

    fn same(&self, other: &AttributeOwner) -> bool {
        match (&self.holder, &other.holder) {
            (Holder::Element(a), Holder::Element(b)) => a == b,
            (Holder::Entity(a), Holder::Entity(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn hash_key(&self) -> ChunkId {
        match self.holder {
            Holder::Element(chunk) => chunk,
            Holder::Entity(_) => ChunkId::ROOT,
        }
    }
}

/// Split a normalized token list on `space`.
pub(crate) fn split_tokens(text: &GroveString, space: GroveChar) -> Vec<GroveString> {
    let chars = text.as_chars();
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, &c) in chars.iter().enumerate() {
        if c == space {
            if i > start {
                tokens.push(text.slice(start, i));
            }
            start = i + 1;
        }
    }
    if start < chars.len() {
        tokens.push(text.slice(start, chars.len()));
    }
    tokens
}

/// Value nodes for `value`: one data character node per code point for
/// character data, one token node per token otherwise.
pub(crate) fn value_list(
    grove: &Arc<GroveImpl>,
    origin: NodeRef,
    decl_value: DeclValueType,
    value: &AttributeValue,
) -> NodeListRef {
    match value {
        AttributeValue::Cdata(text) if text.is_empty() => Arc::new(EmptyNodeList),
        AttributeValue::Cdata(text) => {
            let first = CdataValueNode { grove: grove.clone(), origin, text: text.clone(), index: 0 };
            Arc::new(SiblingNodeList::new(Arc::new(first)))
        }
        AttributeValue::Tokens(text) => {
            let space = grove.read().space();
            let tokens: Arc<[GroveString]> = Arc::from(split_tokens(text, space));
            let nodes = (0..tokens.len())
                .map(|index| {
                    Arc::new(AttributeValueTokenNode {
                        grove: grove.clone(),
                        origin: origin.clone(),
                        decl_value,
                        tokens: tokens.clone(),
                        index,
                    }) as NodeRef
                })
                .collect();
            Arc::new(VecNodeList::new(nodes))
        }
    }
}

// ============================================================================
// Attribute assignment
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct AttributeAsgnNode {
    grove: Arc<GroveImpl>,
    owner: AttributeOwner,
    index: usize,
}

impl AttributeAsgnNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, owner: AttributeOwner, index: usize) -> Self {
        Self { grove, owner, index }
    }
}

impl Node for AttributeAsgnNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::AttributeAssignment
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<AttributeAsgnNode>(other).is_some_and(|o| {
            o.index == self.index && o.owner.same(&self.owner) && Arc::ptr_eq(&o.grove, &self.grove)
        })
    }

    fn hash_code(&self) -> u64 {
        chunk_hash(self.grove.grove_index(), self.owner.hash_key(), self.index as u32) ^ 0xa5
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        self.owner.node(&self.grove)
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::Attributes)
    }

    fn children(&self) -> AccessResult<NodeListRef> {
        self.value()
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        if self.index + 1 < self.owner.len() {
            Ok(Arc::new(Self::new(self.grove.clone(), self.owner.clone(), self.index + 1)))
        } else {
            Err(Access::Null)
        }
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        self.next_sibling()
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        Ok(Arc::new(Self::new(self.grove.clone(), self.owner.clone(), 0)))
    }

    fn siblings_index(&self) -> AccessResult<usize> {
        Ok(self.index)
    }

    fn name(&self) -> AccessResult<GroveString> {
        Ok(self.owner.def(self.index)?.name.clone())
    }

    fn attribute_def(&self) -> AccessResult<NodeRef> {
        Ok(Arc::new(AttributeDefNode::new(
            self.grove.clone(),
            self.owner.definer().clone(),
            self.index,
        )))
    }

    fn implied(&self) -> AccessResult<bool> {
        Ok(self.owner.value(self.index).is_none())
    }

    fn value(&self) -> AccessResult<NodeListRef> {
        let value = or_null(self.owner.value(self.index))?;
        let decl_value = self.owner.def(self.index)?.decl_value;
        Ok(value_list(&self.grove, self.clone_node(), decl_value, value))
    }

    fn token_sep(&self) -> AccessResult<GroveChar> {
        Ok(self.grove.read().space())
    }

    fn tokens(&self) -> AccessResult<GroveString> {
        match or_null(self.owner.value(self.index))? {
            AttributeValue::Tokens(text) => Ok(text.clone()),
            AttributeValue::Cdata(_) => Err(Access::NotInClass),
        }
    }
}

// ============================================================================
// Value nodes
// ============================================================================

/// A character of a CDATA attribute value.
#[derive(Debug, Clone)]
pub(crate) struct CdataValueNode {
    grove: Arc<GroveImpl>,
    origin: NodeRef,
    text: GroveString,
    index: usize,
}

impl Node for CdataValueNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::DataChar
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<CdataValueNode>(other)
            .is_some_and(|o| o.index == self.index && o.origin.same(self.origin.as_node()))
    }

    fn chunk_contains(&self, other: &dyn Node) -> bool {
        downcast::<CdataValueNode>(other)
            .is_some_and(|o| o.index >= self.index && o.origin.same(self.origin.as_node()))
    }

    fn hash_code(&self) -> u64 {
        self.origin.hash_code().rotate_left(7) ^ self.index as u64
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        Ok(self.origin.clone())
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(match self.origin.class() {
            NodeClass::AttributeDef => ComponentName::DefaultValue,
            _ => ComponentName::Value,
        })
    }

    fn char_chunk(&self, _mapper: &dyn SdataMapper) -> AccessResult<GroveString> {
        Ok(self.text.skip(self.index))
    }

    fn char(&self, _mapper: &dyn SdataMapper) -> AccessResult<GroveChar> {
        or_null(self.text.get(self.index))
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        if self.index + 1 < self.text.len() {
            let mut next = self.clone();
            next.index += 1;
            Ok(Arc::new(next))
        } else {
            Err(Access::Null)
        }
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        Err(Access::Null)
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        let mut first = self.clone();
        first.index = 0;
        Ok(Arc::new(first))
    }

    fn siblings_index(&self) -> AccessResult<usize> {
        Ok(self.index)
    }
}

/// One token of a tokenized attribute value.
#[derive(Debug, Clone)]
pub(crate) struct AttributeValueTokenNode {
    grove: Arc<GroveImpl>,
    origin: NodeRef,
    decl_value: DeclValueType,
    tokens: Arc<[GroveString]>,
    index: usize,
}

impl AttributeValueTokenNode {
    fn current(&self) -> AccessResult<&GroveString> {
        or_null(self.tokens.get(self.index))
    }

    fn at(&self, index: usize) -> NodeRef {
        let mut node = self.clone();
        node.index = index;
        Arc::new(node)
    }
}

impl Node for AttributeValueTokenNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::AttributeValueToken
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<AttributeValueTokenNode>(other)
            .is_some_and(|o| o.index == self.index && o.origin.same(self.origin.as_node()))
    }

    fn hash_code(&self) -> u64 {
        self.origin.hash_code().rotate_left(11) ^ self.index as u64
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        Ok(self.origin.clone())
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(match self.origin.class() {
            NodeClass::AttributeDef => ComponentName::DefaultValue,
            _ => ComponentName::Value,
        })
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        if self.index + 1 < self.tokens.len() {
            Ok(self.at(self.index + 1))
        } else {
            Err(Access::Null)
        }
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        self.next_sibling()
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        Ok(self.at(0))
    }

    fn siblings_index(&self) -> AccessResult<usize> {
        Ok(self.index)
    }

    fn token(&self) -> AccessResult<GroveString> {
        self.current().cloned()
    }

    fn entity(&self) -> AccessResult<NodeRef> {
        if !matches!(self.decl_value, DeclValueType::Entity | DeclValueType::Entities) {
            return Err(Access::Null);
        }
        let name = self.current()?;
        let state = self.grove.read();
        let entity = state
            .dtd()
            .and_then(|dtd| dtd.general_entity(name))
            .or_else(|| state.lookup_defaulted_entity(name))
            .cloned();
        match entity {
            Some(entity) => Ok(Arc::new(EntityNode::declared(self.grove.clone(), entity))),
            None if state.has_default_entity() && !state.is_complete() => Err(Access::Timeout),
            None => Err(Access::Null),
        }
    }

    fn notation(&self) -> AccessResult<NodeRef> {
        if self.decl_value != DeclValueType::Notation {
            return Err(Access::Null);
        }
        let name = self.current()?;
        let notation = self.grove.read().dtd().and_then(|dtd| dtd.notation(name)).cloned();
        Ok(Arc::new(NotationNode::new(self.grove.clone(), or_null(notation)?)))
    }

    fn referent(&self) -> AccessResult<NodeRef> {
        if !matches!(self.decl_value, DeclValueType::Idref | DeclValueType::Idrefs) {
            return Err(Access::Null);
        }
        let name = self.current()?;
        let state = self.grove.read();
        match state.lookup_element(name) {
            Some(chunk) => super::chunk_node(&self.grove, &state, chunk),
            None if state.is_complete() => Err(Access::Null),
            None => Err(Access::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tokens_skips_empty_runs() {
        let text = GroveString::from("A  BB C");
        let tokens = split_tokens(&text, ' ' as GroveChar);
        let words: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(words, vec!["A", "BB", "C"]);
        assert!(tokens[1].shares_buffer(&text));
    }

    #[test]
    fn test_split_tokens_empty() {
        assert!(split_tokens(&GroveString::new(), ' ' as GroveChar).is_empty());
    }
}
