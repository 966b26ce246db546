//! Declarations the parser hands to the builder.
//!
//! The parser owns DTD processing; the grove only needs a read-only model
//! of what it declared so that element, entity, notation and attribute
//! nodes can answer their properties. Everything here is immutable once
//! built and shared through `Arc`.

use std::sync::Arc;

use crate::names::ComponentName;
use crate::string::{GroveChar, GroveString};

// ============================================================================
// Enumerated property values
// ============================================================================

/// Data type of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Text,
    Cdata,
    Sdata,
    Ndata,
    Subdocument,
    Pi,
}

/// Declared value of an attribute definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclValueType {
    Cdata,
    Entity,
    Entities,
    Id,
    Idref,
    Idrefs,
    Name,
    Names,
    Nmtoken,
    Nmtokens,
    Number,
    Numbers,
    Nutoken,
    Nutokens,
    Notation,
    NameTokenGroup,
}

/// Default-value keyword of an attribute definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValueType {
    Value,
    Fixed,
    Required,
    Current,
    Conref,
    Implied,
}

/// Declared content of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Cdata,
    Rcdata,
    Empty,
    Any,
    ModelGroup,
}

/// Model-group connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
    Seq,
}

/// Occurrence indicator on a content token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurIndicator {
    Opt,
    Plus,
    Rep,
}

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl EntityType {
    pub fn component_name(self) -> ComponentName {
        match self {
            EntityType::Text => ComponentName::Text,
            EntityType::Cdata => ComponentName::Cdata,
            EntityType::Sdata => ComponentName::Sdata,
            EntityType::Ndata => ComponentName::Ndata,
            EntityType::Subdocument => ComponentName::Subdocument,
            EntityType::Pi => ComponentName::Pi,
        }
    }
}

impl DeclValueType {
    pub fn component_name(self) -> ComponentName {
        match self {
            DeclValueType::Cdata => ComponentName::Cdata,
            DeclValueType::Entity => ComponentName::Entity,
            DeclValueType::Entities => ComponentName::Entities,
            DeclValueType::Id => ComponentName::Id,
            DeclValueType::Idref => ComponentName::Idref,
            DeclValueType::Idrefs => ComponentName::Idrefs,
            DeclValueType::Name => ComponentName::Name,
            DeclValueType::Names => ComponentName::Names,
            DeclValueType::Nmtoken => ComponentName::Nmtoken,
            DeclValueType::Nmtokens => ComponentName::Nmtokens,
            DeclValueType::Number => ComponentName::Number,
            DeclValueType::Numbers => ComponentName::Numbers,
            DeclValueType::Nutoken => ComponentName::Nutoken,
            DeclValueType::Nutokens => ComponentName::Nutokens,
            DeclValueType::Notation => ComponentName::Notation,
            DeclValueType::NameTokenGroup => ComponentName::Nmtkgrp,
        }
    }

    /// Whether values of this type are token lists rather than character data.
    pub fn is_tokenized(self) -> bool {
        self != DeclValueType::Cdata
    }
}

impl DefaultValueType {
    pub fn component_name(self) -> ComponentName {
        match self {
            DefaultValueType::Value => ComponentName::Value,
            DefaultValueType::Fixed => ComponentName::Fixed,
            DefaultValueType::Required => ComponentName::Required,
            DefaultValueType::Current => ComponentName::Current,
            DefaultValueType::Conref => ComponentName::Conref,
            DefaultValueType::Implied => ComponentName::Implied,
        }
    }
}

impl ContentType {
    pub fn component_name(self) -> ComponentName {
        match self {
            ContentType::Cdata => ComponentName::Cdata,
            ContentType::Rcdata => ComponentName::Rcdata,
            ContentType::Empty => ComponentName::Empty,
            ContentType::Any => ComponentName::Any,
            ContentType::ModelGroup => ComponentName::ModelGroup,
        }
    }
}

impl Connector {
    pub fn component_name(self) -> ComponentName {
        match self {
            Connector::And => ComponentName::And,
            Connector::Or => ComponentName::Or,
            Connector::Seq => ComponentName::Seq,
        }
    }
}

impl OccurIndicator {
    pub fn component_name(self) -> ComponentName {
        match self {
            OccurIndicator::Opt => ComponentName::Opt,
            OccurIndicator::Plus => ComponentName::Plus,
            OccurIndicator::Rep => ComponentName::Rep,
        }
    }
}

// ============================================================================
// Locations
// ============================================================================

/// Where a run of source text came from (an entity or file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOrigin {
    pub name: GroveString,
}

impl SourceOrigin {
    pub fn new(name: impl Into<GroveString>) -> Arc<Self> {
        Arc::new(SourceOrigin { name: name.into() })
    }
}

/// A position in the source: an origin plus a character index into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub origin: Option<Arc<SourceOrigin>>,
    pub index: u32,
}

impl Location {
    pub fn new(origin: &Arc<SourceOrigin>, index: u32) -> Self {
        Location { origin: Some(origin.clone()), index }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Public and system identifiers of an external entity or notation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalId {
    pub public_id: Option<GroveString>,
    pub system_id: Option<GroveString>,
    pub generated_system_id: Option<GroveString>,
}

/// A notation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notation {
    pub name: GroveString,
    pub external_id: Option<ExternalId>,
    pub attribute_defs: Option<Arc<AttributeDefinitionList>>,
}

/// An entity declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: GroveString,
    pub entity_type: EntityType,
    /// Replacement text of an internal entity.
    pub text: Option<GroveString>,
    pub external_id: Option<ExternalId>,
    pub notation: Option<Arc<Notation>>,
    /// True when the entity was created from the default entity.
    pub defaulted: bool,
}

impl Entity {
    /// An internal entity with replacement text.
    pub fn internal(name: impl Into<GroveString>, entity_type: EntityType, text: impl Into<GroveString>) -> Self {
        Entity {
            name: name.into(),
            entity_type,
            text: Some(text.into()),
            external_id: None,
            notation: None,
            defaulted: false,
        }
    }

    /// An external entity.
    pub fn external(name: impl Into<GroveString>, entity_type: EntityType, external_id: ExternalId) -> Self {
        Entity {
            name: name.into(),
            entity_type,
            text: None,
            external_id: Some(external_id),
            notation: None,
            defaulted: false,
        }
    }
}

/// A specified or defaulted attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Character data (CDATA declared value).
    Cdata(GroveString),
    /// Normalized token list, tokens separated by single spaces.
    Tokens(GroveString),
}

impl AttributeValue {
    pub fn text(&self) -> &GroveString {
        match self {
            AttributeValue::Cdata(text) | AttributeValue::Tokens(text) => text,
        }
    }
}

/// Default value of an attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Value(AttributeValue),
    Fixed(AttributeValue),
    Required,
    Current,
    Conref,
    Implied,
}

impl DefaultValue {
    pub fn value_type(&self) -> DefaultValueType {
        match self {
            DefaultValue::Value(_) => DefaultValueType::Value,
            DefaultValue::Fixed(_) => DefaultValueType::Fixed,
            DefaultValue::Required => DefaultValueType::Required,
            DefaultValue::Current => DefaultValueType::Current,
            DefaultValue::Conref => DefaultValueType::Conref,
            DefaultValue::Implied => DefaultValueType::Implied,
        }
    }

    pub fn value(&self) -> Option<&AttributeValue> {
        match self {
            DefaultValue::Value(v) | DefaultValue::Fixed(v) => Some(v),
            _ => None,
        }
    }
}

/// One attribute definition from an attribute-list declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: GroveString,
    pub decl_value: DeclValueType,
    /// Allowed tokens for name-token groups and NOTATION attributes.
    pub allowed_tokens: Vec<GroveString>,
    pub default: DefaultValue,
    /// Index into the document's table of #CURRENT values.
    pub current_index: Option<u32>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<GroveString>, decl_value: DeclValueType, default: DefaultValue) -> Self {
        AttributeDefinition {
            name: name.into(),
            decl_value,
            allowed_tokens: Vec::new(),
            default,
            current_index: None,
        }
    }
}

/// The attribute definitions of an element type or notation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDefinitionList {
    pub defs: Vec<AttributeDefinition>,
}

impl AttributeDefinitionList {
    pub fn new(defs: Vec<AttributeDefinition>) -> Arc<Self> {
        Arc::new(AttributeDefinitionList { defs })
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Position of the ID attribute, if declared.
    pub fn id_index(&self) -> Option<usize> {
        self.defs.iter().position(|d| d.decl_value == DeclValueType::Id)
    }

    /// Position of the definition with the given (already folded) name.
    pub fn position(&self, name: &GroveString) -> Option<usize> {
        self.defs.iter().position(|d| &d.name == name)
    }
}

/// A token in a content model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentToken {
    Pcdata,
    Element {
        gi: GroveString,
        occur: Option<OccurIndicator>,
    },
    Group(ModelGroup),
}

/// A parenthesized model group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelGroup {
    pub connector: Connector,
    pub occur: Option<OccurIndicator>,
    pub tokens: Vec<ContentToken>,
}

/// An element type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementType {
    pub name: GroveString,
    pub content_type: ContentType,
    pub model_group: Option<Arc<ModelGroup>>,
    pub omit_start_tag: bool,
    pub omit_end_tag: bool,
    pub inclusions: Vec<GroveString>,
    pub exclusions: Vec<GroveString>,
    pub attribute_defs: Arc<AttributeDefinitionList>,
}

impl ElementType {
    /// An element type with `ANY` content and no attributes.
    pub fn new(name: impl Into<GroveString>) -> Self {
        ElementType {
            name: name.into(),
            content_type: ContentType::Any,
            model_group: None,
            omit_start_tag: false,
            omit_end_tag: false,
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            attribute_defs: Arc::new(AttributeDefinitionList::default()),
        }
    }

    pub fn with_attributes(mut self, defs: Vec<AttributeDefinition>) -> Self {
        self.attribute_defs = AttributeDefinitionList::new(defs);
        self
    }

    pub fn with_content(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }
}

/// A document type declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dtd {
    pub name: GroveString,
    pub general_entities: Vec<Arc<Entity>>,
    pub parameter_entities: Vec<Arc<Entity>>,
    pub notations: Vec<Arc<Notation>>,
    pub element_types: Vec<Arc<ElementType>>,
    pub default_entity: Option<Arc<Entity>>,
}

impl Dtd {
    pub fn new(name: impl Into<GroveString>) -> Self {
        Dtd { name: name.into(), ..Dtd::default() }
    }

    pub fn general_entity(&self, name: &GroveString) -> Option<&Arc<Entity>> {
        self.general_entities.iter().find(|e| &e.name == name)
    }

    pub fn element_type(&self, name: &GroveString) -> Option<&Arc<ElementType>> {
        self.element_types.iter().find(|e| &e.name == name)
    }

    pub fn notation(&self, name: &GroveString) -> Option<&Arc<Notation>> {
        self.notations.iter().find(|n| &n.name == name)
    }
}

/// Concrete-syntax facts the grove needs: name folding and separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    /// NAMECASE GENERAL: fold element, attribute and id names to upper case.
    pub namecase_general: bool,
    /// NAMECASE ENTITY: fold entity names to upper case.
    pub namecase_entity: bool,
    /// The SPACE character, used as the token separator.
    pub space: GroveChar,
}

impl Default for Syntax {
    /// The reference concrete syntax.
    fn default() -> Self {
        Syntax { namecase_general: true, namecase_entity: false, space: ' ' as GroveChar }
    }
}

impl Syntax {
    pub fn general_fold(&self, name: &GroveString) -> GroveString {
        if self.namecase_general {
            name.to_ascii_uppercase()
        } else {
            name.clone()
        }
    }

    pub fn entity_fold(&self, name: &GroveString) -> GroveString {
        if self.namecase_entity {
            name.to_ascii_uppercase()
        } else {
            name.clone()
        }
    }
}

/// The SGML declaration in effect for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SgmlDeclaration {
    /// Public identifier of the declaration, when it was referenced by one.
    pub public_id: Option<GroveString>,
}

/// A diagnostic recorded during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: GroveString,
    pub location: Location,
}
