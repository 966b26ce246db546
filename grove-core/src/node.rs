//! The node, node-list and named-node-list protocols.
//!
//! Every node variant implements [`Node`]. Nearly every accessor has a
//! default that answers [`Access::NotInClass`], so a variant only
//! overrides the properties its class defines. The intrinsic properties
//! (class name, property-name lists, tree root, ...) are answered once
//! here from the variant's [`ClassDef`].
//!
//! [`Node::property`] is the reflective entry point: it maps a
//! [`ComponentName`] to the matching accessor and wraps the answer in a
//! [`PropertyValue`].

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::access::{Access, AccessResult};
use crate::class_def::{ClassDef, NodeClass};
use crate::decl::{
    Connector, ContentType, DeclValueType, DefaultValueType, EntityType, Location, OccurIndicator,
    Severity,
};
use crate::lists::{EmptyNodeList, SiblingNodeList};
use crate::names::ComponentName;
use crate::string::{GroveChar, GroveString, GroveStringList};
use crate::value::PropertyValue;

/// Shared node view.
pub type NodeRef = Arc<dyn Node>;
/// Shared node list.
pub type NodeListRef = Arc<dyn NodeList>;
/// Shared named node list.
pub type NamedNodeListRef = Arc<dyn NamedNodeList>;

/// Maps SDATA entities to characters.
pub trait SdataMapper {
    /// Character for the SDATA entity `name` with replacement `text`.
    fn sdata_map(&self, _name: &GroveString, _text: &GroveString) -> Option<GroveChar> {
        None
    }
}

/// Mapper that maps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSdataMapper;

impl SdataMapper for NoSdataMapper {}

/// A navigation step that a uniquely held view may perform on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FirstChild,
    NextSibling,
    NextChunkSibling,
}

/// A view of one grove node.
pub trait Node: Send + Sync + Debug + 'static {
    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    fn class(&self) -> NodeClass;

    fn class_def(&self) -> &'static ClassDef {
        self.class().class_def()
    }

    /// A fresh shared handle on an equal view.
    fn clone_node(&self) -> NodeRef;

    fn as_any(&self) -> &dyn Any;

    /// Structural equality: same grove, same backing chunk or declaration.
    fn same(&self, other: &dyn Node) -> bool;

    /// Whether `other` lies within the same chunk at or after this node.
    fn chunk_contains(&self, other: &dyn Node) -> bool {
        self.same(other)
    }

    fn grove_index(&self) -> u32;

    fn same_grove(&self, other: &dyn Node) -> bool {
        self.grove_index() == other.grove_index()
    }

    /// Hash consistent with [`Node::same`].
    fn hash_code(&self) -> u64 {
        0
    }

    /// Retarget this view in place when the step lands on the same kind
    /// of view. `None` means the caller must materialize a new node.
    fn step_in_place(&mut self, _step: Step) -> Option<AccessResult<()>> {
        None
    }

    /// Block until the grove this node belongs to grows, completes, or
    /// `timeout` elapses. Returns false when waiting cannot help.
    fn wait_for_more_nodes(&self, _timeout: Duration) -> bool {
        false
    }

    fn location(&self) -> AccessResult<Location> {
        Err(Access::NotInClass)
    }

    // ------------------------------------------------------------------
    // Intrinsic properties
    // ------------------------------------------------------------------

    fn origin(&self) -> AccessResult<NodeRef> {
        Err(Access::Null)
    }

    fn parent(&self) -> AccessResult<NodeRef> {
        Err(Access::Null)
    }

    fn grove_root(&self) -> AccessResult<NodeRef> {
        Err(Access::Null)
    }

    /// Follow `parent` until it stops.
    fn tree_root(&self) -> AccessResult<NodeRef> {
        let mut node = self.clone_node();
        loop {
            match node.parent() {
                Ok(parent) => node = parent,
                Err(Access::Timeout) => return Err(Access::Timeout),
                Err(_) => return Ok(node),
            }
        }
    }

    fn origin_to_subnode_rel_property_name(&self) -> AccessResult<ComponentName> {
        Err(Access::Null)
    }

    fn class_name(&self) -> AccessResult<ComponentName> {
        Ok(self.class_def().class_name)
    }

    fn children_property_name(&self) -> AccessResult<ComponentName> {
        self.class_def().children_property_name.ok_or(Access::Null)
    }

    fn data_property_name(&self) -> AccessResult<ComponentName> {
        self.class_def().data_property_name.ok_or(Access::Null)
    }

    fn data_sep_property_name(&self) -> AccessResult<ComponentName> {
        self.class_def().data_sep_property_name.ok_or(Access::Null)
    }

    fn subnode_property_names(&self) -> AccessResult<&'static [ComponentName]> {
        Ok(self.class_def().subnode_property_names)
    }

    fn all_property_names(&self) -> AccessResult<&'static [ComponentName]> {
        Ok(self.class_def().all_property_names)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn children(&self) -> AccessResult<NodeListRef> {
        Ok(Arc::new(EmptyNodeList))
    }

    /// Siblings after this node, in order.
    fn follow(&self) -> AccessResult<NodeListRef> {
        match self.next_sibling() {
            Ok(next) => Ok(Arc::new(SiblingNodeList::new(next))),
            Err(Access::Null) => Ok(Arc::new(EmptyNodeList)),
            Err(other) => Err(other),
        }
    }

    fn first_child(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    /// Like `next_sibling`, but skips the rest of the current chunk.
    fn next_chunk_sibling(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    /// The next chunk in document order: first child, else next chunk
    /// sibling, else the nearest ancestor's next chunk sibling.
    fn next_chunk_after(&self) -> AccessResult<NodeRef> {
        match self.first_child() {
            Ok(child) => return Ok(child),
            Err(Access::Timeout) => return Err(Access::Timeout),
            Err(_) => {}
        }
        match self.next_chunk_sibling() {
            Ok(next) => return Ok(next),
            Err(Access::Timeout) => return Err(Access::Timeout),
            Err(_) => {}
        }
        let mut node = self.parent()?;
        loop {
            match node.next_chunk_sibling() {
                Ok(next) => return Ok(next),
                Err(Access::Timeout) => return Err(Access::Timeout),
                Err(_) => {}
            }
            node = node.parent()?;
        }
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    /// Zero-based position among siblings.
    fn siblings_index(&self) -> AccessResult<usize> {
        let mut node = self.first_sibling()?;
        let mut index = 0;
        while !node.same(self.as_node()) {
            node = node.next_sibling()?;
            index += 1;
        }
        Ok(index)
    }

    /// `self` as a trait object, for passing to [`Node::same`].
    fn as_node(&self) -> &dyn Node;

    /// The `n`th sibling after this one (0 is the next sibling).
    fn follow_sibling_ref(&self, n: usize) -> AccessResult<NodeRef> {
        let mut node = self.next_sibling()?;
        for _ in 0..n {
            node = node.next_sibling()?;
        }
        Ok(node)
    }

    fn attribute_ref(&self, n: usize) -> AccessResult<NodeRef> {
        self.attributes()?.node_list().nth(n)
    }

    /// The code points from this node to the end of its chunk.
    fn char_chunk(&self, _mapper: &dyn SdataMapper) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    /// Whole token text of a tokenized attribute value.
    fn tokens(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn element_index(&self) -> AccessResult<u32> {
        Err(Access::NotInClass)
    }

    fn messages(&self) -> AccessResult<NodeListRef> {
        Err(Access::NotInClass)
    }

    fn severity(&self) -> AccessResult<Severity> {
        Err(Access::NotInClass)
    }

    fn has_gi(&self, gi: &GroveString) -> bool {
        self.gi().map(|own| &own == gi).unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Class properties
    // ------------------------------------------------------------------

    fn char(&self, mapper: &dyn SdataMapper) -> AccessResult<GroveChar> {
        let chunk = self.char_chunk(mapper)?;
        chunk.get(0).ok_or(Access::Null)
    }

    fn attributes(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn name(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn system_data(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn entity(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn entity_name(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn external_id(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn notation(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn gi(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn occur_indicator(&self) -> AccessResult<OccurIndicator> {
        Err(Access::NotInClass)
    }

    fn attribute_defs(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn text(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn notation_name(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn entity_type(&self) -> AccessResult<EntityType> {
        Err(Access::NotInClass)
    }

    fn defaulted(&self) -> AccessResult<bool> {
        Err(Access::NotInClass)
    }

    fn public_id(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn system_id(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn generated_system_id(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn value(&self) -> AccessResult<NodeListRef> {
        Err(Access::NotInClass)
    }

    fn token_sep(&self) -> AccessResult<GroveChar> {
        Err(Access::NotInClass)
    }

    fn implied(&self) -> AccessResult<bool> {
        Err(Access::NotInClass)
    }

    fn attribute_def(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn current_attribute_index(&self) -> AccessResult<i64> {
        Err(Access::NotInClass)
    }

    fn current_group(&self) -> AccessResult<NodeListRef> {
        Err(Access::NotInClass)
    }

    fn decl_value_type(&self) -> AccessResult<DeclValueType> {
        Err(Access::NotInClass)
    }

    fn default_value_type(&self) -> AccessResult<DefaultValueType> {
        Err(Access::NotInClass)
    }

    fn default_value(&self) -> AccessResult<NodeListRef> {
        Err(Access::NotInClass)
    }

    /// Allowed tokens of an attribute definition.
    fn allowed_tokens(&self) -> AccessResult<GroveStringList> {
        Err(Access::NotInClass)
    }

    fn id(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn content(&self) -> AccessResult<NodeListRef> {
        Err(Access::NotInClass)
    }

    fn included(&self) -> AccessResult<bool> {
        Err(Access::NotInClass)
    }

    fn must_omit_end_tag(&self) -> AccessResult<bool> {
        Err(Access::NotInClass)
    }

    fn element_type(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn content_type(&self) -> AccessResult<ContentType> {
        Err(Access::NotInClass)
    }

    fn exclusions(&self) -> AccessResult<GroveStringList> {
        Err(Access::NotInClass)
    }

    fn inclusions(&self) -> AccessResult<GroveStringList> {
        Err(Access::NotInClass)
    }

    fn model_group(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn omit_end_tag(&self) -> AccessResult<bool> {
        Err(Access::NotInClass)
    }

    fn omit_start_tag(&self) -> AccessResult<bool> {
        Err(Access::NotInClass)
    }

    fn connector(&self) -> AccessResult<Connector> {
        Err(Access::NotInClass)
    }

    fn content_tokens(&self) -> AccessResult<NodeListRef> {
        Err(Access::NotInClass)
    }

    fn token(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn referent(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn governing(&self) -> AccessResult<bool> {
        Err(Access::NotInClass)
    }

    fn general_entities(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn notations(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn element_types(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn default_entity(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn parameter_entities(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn sgml_constants(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn application_info(&self) -> AccessResult<GroveString> {
        Err(Access::NotInClass)
    }

    fn prolog(&self) -> AccessResult<NodeListRef> {
        Err(Access::NotInClass)
    }

    fn epilog(&self) -> AccessResult<NodeListRef> {
        Err(Access::NotInClass)
    }

    fn document_element(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn elements(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn entities(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn defaulted_entities(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    fn governing_doctype(&self) -> AccessResult<NodeRef> {
        Err(Access::NotInClass)
    }

    fn doctypes_and_linktypes(&self) -> AccessResult<NamedNodeListRef> {
        Err(Access::NotInClass)
    }

    // ------------------------------------------------------------------
    // Generic dispatch
    // ------------------------------------------------------------------

    /// Answer the property named `id`.
    fn property(&self, id: ComponentName, mapper: &dyn SdataMapper) -> AccessResult<PropertyValue> {
        use ComponentName as C;
        use PropertyValue as V;

        match id {
            // Intrinsic
            C::ClassName => self.class_name().map(V::ComponentName),
            C::GroveRoot => self.grove_root().map(V::Node),
            C::SubnodePropertyNames => self.subnode_property_names().map(V::ComponentNameList),
            C::AllPropertyNames => self.all_property_names().map(V::ComponentNameList),
            C::ChildrenPropertyName => self.children_property_name().map(V::ComponentName),
            C::DataPropertyName => self.data_property_name().map(V::ComponentName),
            C::DataSepPropertyName => self.data_sep_property_name().map(V::ComponentName),
            C::Parent => self.parent().map(V::Node),
            C::TreeRoot => self.tree_root().map(V::Node),
            C::Origin => self.origin().map(V::Node),
            C::OriginToSubnodeRelPropertyName => {
                self.origin_to_subnode_rel_property_name().map(V::ComponentName)
            }

            // Enumerations, reported by their catalog names
            C::EntityType => self.entity_type().map(|t| V::ComponentName(t.component_name())),
            C::DeclValueType => self.decl_value_type().map(|t| V::ComponentName(t.component_name())),
            C::DefaultValueType => {
                self.default_value_type().map(|t| V::ComponentName(t.component_name()))
            }
            C::ContentType => self.content_type().map(|t| V::ComponentName(t.component_name())),
            C::Connector => self.connector().map(|t| V::ComponentName(t.component_name())),
            C::OccurenceIndicator => {
                self.occur_indicator().map(|t| V::ComponentName(t.component_name()))
            }

            // Characters
            C::Char => self.char(mapper).map(V::Char),
            C::TokenSep => self.token_sep().map(V::Char),

            // Booleans
            C::Defaulted => self.defaulted().map(V::Boolean),
            C::Governing => self.governing().map(V::Boolean),
            C::Implied => self.implied().map(V::Boolean),
            C::Included => self.included().map(V::Boolean),
            C::MustOmitEndTag => self.must_omit_end_tag().map(V::Boolean),
            C::OmitEndTag => self.omit_end_tag().map(V::Boolean),
            C::OmitStartTag => self.omit_start_tag().map(V::Boolean),

            // Named node lists
            C::Attributes => self.attributes().map(V::NamedNodeList),
            C::DefaultedEntities => self.defaulted_entities().map(V::NamedNodeList),
            C::DoctypesAndLinktypes => self.doctypes_and_linktypes().map(V::NamedNodeList),
            C::Elements => self.elements().map(V::NamedNodeList),
            C::Entities => self.entities().map(V::NamedNodeList),
            C::GeneralEntities => self.general_entities().map(V::NamedNodeList),
            C::Notations => self.notations().map(V::NamedNodeList),
            C::AttributeDefs => self.attribute_defs().map(V::NamedNodeList),
            C::ElementTypes => self.element_types().map(V::NamedNodeList),
            C::ParameterEntities => self.parameter_entities().map(V::NamedNodeList),

            // Nodes
            C::DocumentElement => self.document_element().map(V::Node),
            C::Entity => self.entity().map(V::Node),
            C::ExternalId => self.external_id().map(V::Node),
            C::GoverningDoctype => self.governing_doctype().map(V::Node),
            C::Notation => self.notation().map(V::Node),
            C::Referent => self.referent().map(V::Node),
            C::SgmlConstants => self.sgml_constants().map(V::Node),
            C::ModelGroup => self.model_group().map(V::Node),
            C::DefaultEntity => self.default_entity().map(V::Node),
            C::ElementType => self.element_type().map(V::Node),
            C::AttributeDef => self.attribute_def().map(V::Node),

            // Node lists
            C::Content => self.content().map(V::NodeList),
            C::Epilog => self.epilog().map(V::NodeList),
            C::Prolog => self.prolog().map(V::NodeList),
            C::Value => self.value().map(V::NodeList),
            C::ContentTokens => self.content_tokens().map(V::NodeList),
            C::DefaultValue => self.default_value().map(V::NodeList),
            C::CurrentGroup => self.current_group().map(V::NodeList),

            // Strings
            C::ApplicationInfo => self.application_info().map(V::String),
            C::EntityName => self.entity_name().map(V::String),
            C::GeneratedSystemId => self.generated_system_id().map(V::String),
            C::Gi => self.gi().map(V::String),
            C::Id => self.id().map(V::String),
            C::Name => self.name().map(V::String),
            C::NotationName => self.notation_name().map(V::String),
            C::PublicId => self.public_id().map(V::String),
            C::SystemData => self.system_data().map(V::String),
            C::SystemId => self.system_id().map(V::String),
            C::Text => self.text().map(V::String),
            C::Token => self.token().map(V::String),

            // String lists
            C::Exclusions => self.exclusions().map(V::StringList),
            C::Inclusions => self.inclusions().map(V::StringList),
            C::Tokens => self.allowed_tokens().map(V::StringList),

            C::CurrentAttributeIndex => self.current_attribute_index().map(V::Integer),

            _ => Err(Access::NotInClass),
        }
    }

    /// Dispatch on a raw catalog position; unknown positions are not in
    /// any class.
    fn property_at(&self, index: usize, mapper: &dyn SdataMapper) -> AccessResult<PropertyValue> {
        match ComponentName::from_index(index) {
            Some(id) => self.property(id, mapper),
            None => Err(Access::NotInClass),
        }
    }
}

/// A cons-style list of nodes.
pub trait NodeList: Send + Sync + Debug + 'static {
    fn first(&self) -> AccessResult<NodeRef>;

    fn rest(&self) -> AccessResult<NodeListRef>;

    /// Like `rest`, but skips the remainder of the first node's chunk.
    fn chunk_rest(&self) -> AccessResult<NodeListRef> {
        self.rest()
    }

    /// Zero-based random access, O(n) unless overridden.
    fn nth(&self, n: usize) -> AccessResult<NodeRef> {
        if n == 0 {
            return self.first();
        }
        let mut list = self.rest()?;
        for _ in 1..n {
            list = list.rest()?;
        }
        list.first()
    }

    /// Advance in place when uniquely held. `None` means the caller must
    /// fall back to `rest`.
    fn rest_in_place(&mut self) -> Option<AccessResult<()>> {
        None
    }

    fn chunk_rest_in_place(&mut self) -> Option<AccessResult<()>> {
        None
    }
}

/// Category of a named node list; decides how member names are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedNodeListType {
    Elements,
    Attributes,
    Entities,
    Notations,
    DoctypesAndLinktypes,
    ElementTypes,
    AttributeDefs,
}

/// A node list whose members can be looked up by name.
pub trait NamedNodeList: Send + Sync + Debug + 'static {
    fn list_type(&self) -> NamedNodeListType;

    /// Look up a member; `name` is normalized first.
    fn named_node(&self, name: &GroveString) -> AccessResult<NodeRef>;

    /// Apply the list's name folding.
    fn normalize(&self, name: &GroveString) -> GroveString {
        name.clone()
    }

    fn node_list(&self) -> NodeListRef;

    /// Members in unspecified order, when that is cheaper.
    fn node_list_no_order(&self) -> NodeListRef {
        self.node_list()
    }

    /// The name under which `node` is a member of this list.
    fn node_name(&self, node: &dyn Node) -> AccessResult<GroveString> {
        member_name(self.list_type(), node)
    }
}

/// Name of `node` as seen by a named list of category `list_type`.
pub fn member_name(list_type: NamedNodeListType, node: &dyn Node) -> AccessResult<GroveString> {
    use NamedNodeListType as T;
    match (list_type, node.class()) {
        (T::Elements, NodeClass::Element) => node.id(),
        (T::Attributes, NodeClass::AttributeAssignment) => node.name(),
        (T::DoctypesAndLinktypes, NodeClass::DocumentType) => node.name(),
        (T::Entities, NodeClass::Entity | NodeClass::DefaultEntity) => node.name(),
        (T::Notations, NodeClass::Notation) => node.name(),
        (T::ElementTypes, NodeClass::ElementType) => node.gi(),
        (T::AttributeDefs, NodeClass::AttributeDef) => node.name(),
        _ => Err(Access::NotInClass),
    }
}
