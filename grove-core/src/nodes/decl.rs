//! Views over the declarations: document type, entities, notations,
//! element types, attribute definitions and content models.

use std::sync::Arc;

use super::attribute::value_list;
use super::{document_node, downcast, node_basics, AttributeOwner};
use crate::access::{or_null, Access, AccessResult};
use crate::class_def::NodeClass;
use crate::decl::{
    AttributeDefinition, AttributeDefinitionList, Connector, ContentToken, ContentType,
    DeclValueType, DefaultValueType, Dtd, ElementType, Entity, EntityType, ExternalId, ModelGroup,
    Notation, OccurIndicator,
};
use crate::grove::GroveImpl;
use crate::lists::{DeclNamedNodeList, EmptyNodeList, VecNodeList};
use crate::names::ComponentName;
use crate::node::{NamedNodeListRef, NamedNodeListType, Node, NodeListRef, NodeRef};
use crate::string::{GroveString, GroveStringList};

/// The governing doctype node, if the prolog has ended.
fn doctype_node(grove: &Arc<GroveImpl>) -> AccessResult<NodeRef> {
    let dtd = grove.read().dtd().cloned();
    match dtd {
        Some(dtd) => Ok(Arc::new(DocumentTypeNode::new(grove.clone(), dtd))),
        None => Err(Access::Null),
    }
}

/// Stable hash for a declaration, keyed on its address.
fn decl_hash<T>(grove: &Arc<GroveImpl>, decl: &Arc<T>, salt: u64) -> u64 {
    ((grove.grove_index() as u64) << 48) ^ (Arc::as_ptr(decl) as *const u8 as u64) ^ salt
}

// ============================================================================
// SGML constants
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct SgmlConstantsNode {
    grove: Arc<GroveImpl>,
}

impl SgmlConstantsNode {
    pub(crate) fn new(grove: Arc<GroveImpl>) -> Self {
        Self { grove }
    }
}

impl Node for SgmlConstantsNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::SgmlConstants
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<SgmlConstantsNode>(other).is_some_and(|o| Arc::ptr_eq(&o.grove, &self.grove))
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        Ok(document_node(&self.grove))
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::SgmlConstants)
    }
}

// ============================================================================
// Document type
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct DocumentTypeNode {
    grove: Arc<GroveImpl>,
    dtd: Arc<Dtd>,
}

impl DocumentTypeNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, dtd: Arc<Dtd>) -> Self {
        Self { grove, dtd }
    }

    fn entity_list(&self, entities: &[Arc<Entity>], role: EntityRole) -> NamedNodeListRef {
        let members = entities
            .iter()
            .map(|e| {
                let node: NodeRef = Arc::new(EntityNode::new(self.grove.clone(), e.clone(), role));
                (e.name.clone(), node)
            })
            .collect();
        DeclNamedNodeList::build(&self.grove.read(), NamedNodeListType::Entities, members)
    }
}

impl Node for DocumentTypeNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::DocumentType
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<DocumentTypeNode>(other).is_some_and(|o| Arc::ptr_eq(&o.dtd, &self.dtd))
    }

    fn hash_code(&self) -> u64 {
        decl_hash(&self.grove, &self.dtd, 1)
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        Ok(document_node(&self.grove))
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::DoctypesAndLinktypes)
    }

    fn name(&self) -> AccessResult<GroveString> {
        Ok(self.dtd.name.clone())
    }

    fn governing(&self) -> AccessResult<bool> {
        Ok(true)
    }

    fn general_entities(&self) -> AccessResult<NamedNodeListRef> {
        Ok(self.entity_list(&self.dtd.general_entities, EntityRole::General))
    }

    fn parameter_entities(&self) -> AccessResult<NamedNodeListRef> {
        Ok(self.entity_list(&self.dtd.parameter_entities, EntityRole::Parameter))
    }

    fn notations(&self) -> AccessResult<NamedNodeListRef> {
        let members = self
            .dtd
            .notations
            .iter()
            .map(|n| {
                let node: NodeRef = Arc::new(NotationNode::new(self.grove.clone(), n.clone()));
                (n.name.clone(), node)
            })
            .collect();
        Ok(DeclNamedNodeList::build(&self.grove.read(), NamedNodeListType::Notations, members))
    }

    fn element_types(&self) -> AccessResult<NamedNodeListRef> {
        let members = self
            .dtd
            .element_types
            .iter()
            .map(|t| {
                let node: NodeRef = Arc::new(ElementTypeNode::new(self.grove.clone(), t.clone()));
                (t.name.clone(), node)
            })
            .collect();
        Ok(DeclNamedNodeList::build(&self.grove.read(), NamedNodeListType::ElementTypes, members))
    }

    fn default_entity(&self) -> AccessResult<NodeRef> {
        let entity = or_null(self.dtd.default_entity.clone())?;
        Ok(Arc::new(EntityNode::new(self.grove.clone(), entity, EntityRole::Default)))
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Which list an entity view was reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityRole {
    General,
    Parameter,
    Default,
    Defaulted,
}

#[derive(Debug, Clone)]
pub(crate) struct EntityNode {
    grove: Arc<GroveImpl>,
    entity: Arc<Entity>,
    role: EntityRole,
}

impl EntityNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, entity: Arc<Entity>, role: EntityRole) -> Self {
        Self { grove, entity, role }
    }

    /// A general entity as declared in the document type.
    pub(crate) fn declared(grove: Arc<GroveImpl>, entity: Arc<Entity>) -> Self {
        Self::new(grove, entity, EntityRole::General)
    }

    /// An entity created from the default entity.
    pub(crate) fn defaulted(grove: Arc<GroveImpl>, entity: Arc<Entity>) -> Self {
        Self::new(grove, entity, EntityRole::Defaulted)
    }
}

impl Node for EntityNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        match self.role {
            EntityRole::Default => NodeClass::DefaultEntity,
            _ => NodeClass::Entity,
        }
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<EntityNode>(other)
            .is_some_and(|o| Arc::ptr_eq(&o.entity, &self.entity) && o.class() == self.class())
    }

    fn hash_code(&self) -> u64 {
        decl_hash(&self.grove, &self.entity, 2)
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        match self.role {
            EntityRole::Defaulted => Ok(document_node(&self.grove)),
            _ => doctype_node(&self.grove),
        }
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(match self.role {
            EntityRole::General => ComponentName::GeneralEntities,
            EntityRole::Parameter => ComponentName::ParameterEntities,
            EntityRole::Default => ComponentName::DefaultEntity,
            EntityRole::Defaulted => ComponentName::DefaultedEntities,
        })
    }

    fn name(&self) -> AccessResult<GroveString> {
        Ok(self.entity.name.clone())
    }

    fn entity_type(&self) -> AccessResult<EntityType> {
        Ok(self.entity.entity_type)
    }

    fn text(&self) -> AccessResult<GroveString> {
        or_null(self.entity.text.clone())
    }

    fn external_id(&self) -> AccessResult<NodeRef> {
        let external_id = or_null(self.entity.external_id.clone())?;
        Ok(Arc::new(ExternalIdNode::new(self.grove.clone(), self.clone_node(), external_id)))
    }

    fn attributes(&self) -> AccessResult<NamedNodeListRef> {
        let owner = or_null(AttributeOwner::entity(self.entity.clone()))?;
        Ok(Arc::new(crate::lists::AttributesList::new(self.grove.clone(), owner)))
    }

    fn notation_name(&self) -> AccessResult<GroveString> {
        Ok(or_null(self.entity.notation.as_ref())?.name.clone())
    }

    fn notation(&self) -> AccessResult<NodeRef> {
        let notation = or_null(self.entity.notation.clone())?;
        Ok(Arc::new(NotationNode::new(self.grove.clone(), notation)))
    }

    fn defaulted(&self) -> AccessResult<bool> {
        match self.role {
            EntityRole::Default => Err(Access::NotInClass),
            _ => Ok(self.entity.defaulted),
        }
    }
}

// ============================================================================
// Notations and external identifiers
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct NotationNode {
    grove: Arc<GroveImpl>,
    notation: Arc<Notation>,
}

impl NotationNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, notation: Arc<Notation>) -> Self {
        Self { grove, notation }
    }
}

impl Node for NotationNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::Notation
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<NotationNode>(other).is_some_and(|o| Arc::ptr_eq(&o.notation, &self.notation))
    }

    fn hash_code(&self) -> u64 {
        decl_hash(&self.grove, &self.notation, 3)
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        doctype_node(&self.grove)
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::Notations)
    }

    fn name(&self) -> AccessResult<GroveString> {
        Ok(self.notation.name.clone())
    }

    fn external_id(&self) -> AccessResult<NodeRef> {
        let external_id = or_null(self.notation.external_id.clone())?;
        Ok(Arc::new(ExternalIdNode::new(self.grove.clone(), self.clone_node(), external_id)))
    }

    fn attribute_defs(&self) -> AccessResult<NamedNodeListRef> {
        let owner = DefinitionOwner::Notation(self.notation.clone());
        Ok(owner.def_list(&self.grove))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ExternalIdNode {
    grove: Arc<GroveImpl>,
    owner: NodeRef,
    external_id: ExternalId,
}

impl ExternalIdNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, owner: NodeRef, external_id: ExternalId) -> Self {
        Self { grove, owner, external_id }
    }
}

impl Node for ExternalIdNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::ExternalId
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<ExternalIdNode>(other).is_some_and(|o| o.owner.same(self.owner.as_node()))
    }

    fn hash_code(&self) -> u64 {
        self.owner.hash_code() ^ 0x1d
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        Ok(self.owner.clone())
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::ExternalId)
    }

    fn public_id(&self) -> AccessResult<GroveString> {
        or_null(self.external_id.public_id.clone())
    }

    fn system_id(&self) -> AccessResult<GroveString> {
        or_null(self.external_id.system_id.clone())
    }

    fn generated_system_id(&self) -> AccessResult<GroveString> {
        or_null(self.external_id.generated_system_id.clone())
    }
}

// ============================================================================
// Element types and attribute definitions
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct ElementTypeNode {
    grove: Arc<GroveImpl>,
    element_type: Arc<ElementType>,
}

impl ElementTypeNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, element_type: Arc<ElementType>) -> Self {
        Self { grove, element_type }
    }
}

impl Node for ElementTypeNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::ElementType
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<ElementTypeNode>(other)
            .is_some_and(|o| Arc::ptr_eq(&o.element_type, &self.element_type))
    }

    fn hash_code(&self) -> u64 {
        decl_hash(&self.grove, &self.element_type, 4)
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        doctype_node(&self.grove)
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::ElementTypes)
    }

    fn gi(&self) -> AccessResult<GroveString> {
        Ok(self.element_type.name.clone())
    }

    fn attribute_defs(&self) -> AccessResult<NamedNodeListRef> {
        let owner = DefinitionOwner::ElementType(self.element_type.clone());
        Ok(owner.def_list(&self.grove))
    }

    fn content_type(&self) -> AccessResult<ContentType> {
        Ok(self.element_type.content_type)
    }

    fn exclusions(&self) -> AccessResult<GroveStringList> {
        Ok(GroveStringList::new(self.element_type.exclusions.clone()))
    }

    fn inclusions(&self) -> AccessResult<GroveStringList> {
        Ok(GroveStringList::new(self.element_type.inclusions.clone()))
    }

    fn model_group(&self) -> AccessResult<NodeRef> {
        if self.element_type.content_type != ContentType::ModelGroup {
            return Err(Access::Null);
        }
        or_null(self.element_type.model_group.as_ref())?;
        Ok(Arc::new(ModelGroupNode::new(self.grove.clone(), self.element_type.clone(), Arc::from(Vec::new()))))
    }

    fn omit_end_tag(&self) -> AccessResult<bool> {
        Ok(self.element_type.omit_end_tag)
    }

    fn omit_start_tag(&self) -> AccessResult<bool> {
        Ok(self.element_type.omit_start_tag)
    }
}

/// The declaration an attribute definition belongs to.
#[derive(Debug, Clone)]
pub(crate) enum DefinitionOwner {
    ElementType(Arc<ElementType>),
    Notation(Arc<Notation>),
}

impl DefinitionOwner {
    pub(crate) fn defs(&self) -> Option<&Arc<AttributeDefinitionList>> {
        match self {
            DefinitionOwner::ElementType(ty) => Some(&ty.attribute_defs),
            DefinitionOwner::Notation(n) => n.attribute_defs.as_ref(),
        }
    }

    fn node(&self, grove: &Arc<GroveImpl>) -> NodeRef {
        match self {
            DefinitionOwner::ElementType(ty) => Arc::new(ElementTypeNode::new(grove.clone(), ty.clone())),
            DefinitionOwner::Notation(n) => Arc::new(NotationNode::new(grove.clone(), n.clone())),
        }
    }

    fn same(&self, other: &DefinitionOwner) -> bool {
        match (self, other) {
            (DefinitionOwner::ElementType(a), DefinitionOwner::ElementType(b)) => Arc::ptr_eq(a, b),
            (DefinitionOwner::Notation(a), DefinitionOwner::Notation(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn def_list(&self, grove: &Arc<GroveImpl>) -> NamedNodeListRef {
        let members = self
            .defs()
            .map(|defs| {
                defs.defs
                    .iter()
                    .enumerate()
                    .map(|(i, def)| {
                        let node: NodeRef = Arc::new(AttributeDefNode::new(grove.clone(), self.clone(), i));
                        (def.name.clone(), node)
                    })
                    .collect()
            })
            .unwrap_or_default();
        DeclNamedNodeList::build(&grove.read(), NamedNodeListType::AttributeDefs, members)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AttributeDefNode {
    grove: Arc<GroveImpl>,
    owner: DefinitionOwner,
    index: usize,
}

impl AttributeDefNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, owner: DefinitionOwner, index: usize) -> Self {
        Self { grove, owner, index }
    }

    fn def(&self) -> AccessResult<&AttributeDefinition> {
        or_null(self.owner.defs().and_then(|defs| defs.defs.get(self.index)))
    }

    fn sibling(&self, index: usize) -> AccessResult<NodeRef> {
        let len = self.owner.defs().map_or(0, |defs| defs.len());
        if index < len {
            Ok(Arc::new(Self::new(self.grove.clone(), self.owner.clone(), index)))
        } else {
            Err(Access::Null)
        }
    }
}

impl Node for AttributeDefNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::AttributeDef
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<AttributeDefNode>(other)
            .is_some_and(|o| o.index == self.index && o.owner.same(&self.owner))
    }

    fn hash_code(&self) -> u64 {
        let base = match &self.owner {
            DefinitionOwner::ElementType(ty) => decl_hash(&self.grove, ty, 5),
            DefinitionOwner::Notation(n) => decl_hash(&self.grove, n, 6),
        };
        base.rotate_left(5) ^ self.index as u64
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        Ok(self.owner.node(&self.grove))
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::AttributeDefs)
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        self.sibling(self.index + 1)
    }

    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        self.next_sibling()
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        self.sibling(0)
    }

    fn siblings_index(&self) -> AccessResult<usize> {
        Ok(self.index)
    }

    fn name(&self) -> AccessResult<GroveString> {
        Ok(self.def()?.name.clone())
    }

    fn decl_value_type(&self) -> AccessResult<DeclValueType> {
        Ok(self.def()?.decl_value)
    }

    fn default_value_type(&self) -> AccessResult<DefaultValueType> {
        Ok(self.def()?.default.value_type())
    }

    fn default_value(&self) -> AccessResult<NodeListRef> {
        let def = self.def()?;
        let value = or_null(def.default.value())?;
        Ok(value_list(&self.grove, self.clone_node(), def.decl_value, value))
    }

    fn allowed_tokens(&self) -> AccessResult<GroveStringList> {
        let def = self.def()?;
        match def.decl_value {
            DeclValueType::NameTokenGroup | DeclValueType::Notation => {
                Ok(GroveStringList::new(def.allowed_tokens.clone()))
            }
            _ => Err(Access::Null),
        }
    }

    fn current_attribute_index(&self) -> AccessResult<i64> {
        let def = self.def()?;
        match (def.default.value_type(), def.current_index) {
            (DefaultValueType::Current, Some(index)) => Ok(index as i64),
            _ => Err(Access::Null),
        }
    }

    /// Every attribute definition in the document type sharing this
    /// definition's #CURRENT slot.
    fn current_group(&self) -> AccessResult<NodeListRef> {
        let def = self.def()?;
        let Some(slot) = def.current_index.filter(|_| def.default.value_type() == DefaultValueType::Current)
        else {
            return Err(Access::Null);
        };
        let dtd = or_null(self.grove.read().dtd().cloned())?;
        let mut nodes: Vec<NodeRef> = Vec::new();
        for ty in &dtd.element_types {
            for (i, other) in ty.attribute_defs.defs.iter().enumerate() {
                if other.current_index == Some(slot) && other.default.value_type() == DefaultValueType::Current {
                    let owner = DefinitionOwner::ElementType(ty.clone());
                    nodes.push(Arc::new(AttributeDefNode::new(self.grove.clone(), owner, i)));
                }
            }
        }
        Ok(Arc::new(VecNodeList::new(nodes)))
    }
}

// ============================================================================
// Content models
// ============================================================================

/// Follow `path` from an element type's model group into nested groups.
fn resolve_group<'a>(element_type: &'a ElementType, path: &[usize]) -> AccessResult<&'a ModelGroup> {
    let mut group = or_null(element_type.model_group.as_deref())?;
    for &i in path {
        match group.tokens.get(i) {
            Some(ContentToken::Group(inner)) => group = inner,
            _ => return Err(Access::Null),
        }
    }
    Ok(group)
}

/// The node for token `index` of the group at `group_path`.
fn token_node(
    grove: &Arc<GroveImpl>,
    element_type: &Arc<ElementType>,
    group_path: &Arc<[usize]>,
    index: usize,
) -> AccessResult<NodeRef> {
    let group = resolve_group(element_type, group_path)?;
    match or_null(group.tokens.get(index))? {
        ContentToken::Group(_) => {
            let path: Vec<usize> = group_path.iter().copied().chain([index]).collect();
            Ok(Arc::new(ModelGroupNode::new(grove.clone(), element_type.clone(), Arc::from(path))))
        }
        _ => Ok(Arc::new(ContentTokenNode {
            grove: grove.clone(),
            element_type: element_type.clone(),
            group: group_path.clone(),
            index,
        })),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ModelGroupNode {
    grove: Arc<GroveImpl>,
    element_type: Arc<ElementType>,
    /// Token indices from the outermost group; empty for the outermost.
    path: Arc<[usize]>,
}

impl ModelGroupNode {
    fn new(grove: Arc<GroveImpl>, element_type: Arc<ElementType>, path: Arc<[usize]>) -> Self {
        Self { grove, element_type, path }
    }

    fn group(&self) -> AccessResult<&ModelGroup> {
        resolve_group(&self.element_type, &self.path)
    }

    fn parent_path(&self) -> Option<(Arc<[usize]>, usize)> {
        let (&last, rest) = self.path.split_last()?;
        Some((Arc::from(rest), last))
    }
}

impl Node for ModelGroupNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::ModelGroup
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<ModelGroupNode>(other)
            .is_some_and(|o| Arc::ptr_eq(&o.element_type, &self.element_type) && o.path == self.path)
    }

    fn hash_code(&self) -> u64 {
        self.path.iter().fold(decl_hash(&self.grove, &self.element_type, 7), |h, &i| {
            h.rotate_left(3) ^ i as u64
        })
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        match self.parent_path() {
            None => Ok(Arc::new(ElementTypeNode::new(self.grove.clone(), self.element_type.clone()))),
            Some((parent, _)) => {
                Ok(Arc::new(ModelGroupNode::new(self.grove.clone(), self.element_type.clone(), parent)))
            }
        }
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(if self.path.is_empty() { ComponentName::ModelGroup } else { ComponentName::ContentTokens })
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        let (parent, last) = or_null(self.parent_path())?;
        token_node(&self.grove, &self.element_type, &parent, last + 1)
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        let (parent, _) = or_null(self.parent_path())?;
        token_node(&self.grove, &self.element_type, &parent, 0)
    }

    fn children(&self) -> AccessResult<NodeListRef> {
        self.content_tokens()
    }

    fn connector(&self) -> AccessResult<Connector> {
        Ok(self.group()?.connector)
    }

    fn occur_indicator(&self) -> AccessResult<OccurIndicator> {
        or_null(self.group()?.occur)
    }

    fn content_tokens(&self) -> AccessResult<NodeListRef> {
        let n = self.group()?.tokens.len();
        if n == 0 {
            return Ok(Arc::new(EmptyNodeList));
        }
        let nodes = (0..n)
            .map(|i| token_node(&self.grove, &self.element_type, &self.path, i))
            .collect::<AccessResult<Vec<NodeRef>>>()?;
        Ok(Arc::new(VecNodeList::new(nodes)))
    }
}

/// A `#PCDATA` or element token of a model group.
#[derive(Debug, Clone)]
pub(crate) struct ContentTokenNode {
    grove: Arc<GroveImpl>,
    element_type: Arc<ElementType>,
    group: Arc<[usize]>,
    index: usize,
}

impl ContentTokenNode {
    fn token(&self) -> AccessResult<&ContentToken> {
        or_null(resolve_group(&self.element_type, &self.group)?.tokens.get(self.index))
    }
}

impl Node for ContentTokenNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        match self.token() {
            Ok(ContentToken::Pcdata) => NodeClass::PcdataToken,
            _ => NodeClass::ElementToken,
        }
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<ContentTokenNode>(other).is_some_and(|o| {
            Arc::ptr_eq(&o.element_type, &self.element_type) && o.group == self.group && o.index == self.index
        })
    }

    fn hash_code(&self) -> u64 {
        self.group.iter().fold(decl_hash(&self.grove, &self.element_type, 8), |h, &i| {
            h.rotate_left(3) ^ i as u64
        }) ^ ((self.index as u64) << 32)
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        Ok(Arc::new(ModelGroupNode::new(self.grove.clone(), self.element_type.clone(), self.group.clone())))
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Ok(ComponentName::ContentTokens)
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        token_node(&self.grove, &self.element_type, &self.group, self.index + 1)
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        token_node(&self.grove, &self.element_type, &self.group, 0)
    }

    fn siblings_index(&self) -> AccessResult<usize> {
        Ok(self.index)
    }

    fn gi(&self) -> AccessResult<GroveString> {
        match self.token()? {
            ContentToken::Element { gi, .. } => Ok(gi.clone()),
            _ => Err(Access::NotInClass),
        }
    }

    fn occur_indicator(&self) -> AccessResult<OccurIndicator> {
        match self.token()? {
            ContentToken::Element { occur, .. } => or_null(*occur),
            _ => Err(Access::NotInClass),
        }
    }
}
