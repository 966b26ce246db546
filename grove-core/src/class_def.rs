//! Per-class property metadata.
//!
//! Each node class has one constant [`ClassDef`]: its class name, every
//! property it may expose (always starting with the intrinsic
//! properties), the child-bearing subset, and which properties act as
//! children, data and data separator for generic tree walks. The tables
//! are `const` and keyed by [`NodeClass`].

use crate::names::ComponentName;

/// Node class tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    SgmlDocument,
    SgmlConstants,
    DataChar,
    Element,
    AttributeAssignment,
    AttributeDef,
    AttributeValueToken,
    Pi,
    Sdata,
    DocumentType,
    Entity,
    DefaultEntity,
    Notation,
    ExternalId,
    ExternalData,
    Subdocument,
    NonSgml,
    Message,
    ElementType,
    ModelGroup,
    ElementToken,
    PcdataToken,
}

/// Static description of a node class's property surface.
#[derive(Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub class_name: ComponentName,
    pub all_property_names: &'static [ComponentName],
    pub subnode_property_names: &'static [ComponentName],
    pub children_property_name: Option<ComponentName>,
    pub data_property_name: Option<ComponentName>,
    pub data_sep_property_name: Option<ComponentName>,
}

/// Properties every class exposes, in order.
pub const INTRINSIC_PROPERTIES: &[ComponentName] = &[
    ComponentName::ClassName,
    ComponentName::GroveRoot,
    ComponentName::SubnodePropertyNames,
    ComponentName::AllPropertyNames,
    ComponentName::ChildrenPropertyName,
    ComponentName::DataPropertyName,
    ComponentName::DataSepPropertyName,
    ComponentName::Parent,
    ComponentName::TreeRoot,
    ComponentName::Origin,
    ComponentName::OriginToSubnodeRelPropertyName,
];

// Expands to a `&'static` slice with the intrinsic properties first.
macro_rules! props {
    ($($p:ident),* $(,)?) => {
        &[
            ComponentName::ClassName,
            ComponentName::GroveRoot,
            ComponentName::SubnodePropertyNames,
            ComponentName::AllPropertyNames,
            ComponentName::ChildrenPropertyName,
            ComponentName::DataPropertyName,
            ComponentName::DataSepPropertyName,
            ComponentName::Parent,
            ComponentName::TreeRoot,
            ComponentName::Origin,
            ComponentName::OriginToSubnodeRelPropertyName,
            $(ComponentName::$p,)*
        ]
    };
}

macro_rules! names {
    ($($p:ident),* $(,)?) => {
        &[$(ComponentName::$p,)*]
    };
}

macro_rules! class_def {
    (@opt) => { None };
    (@opt $id:ident) => { Some(ComponentName::$id) };
    (
        $name:ident: $class:ident,
        props: [$($p:ident),* $(,)?],
        subnodes: [$($s:ident),* $(,)?]
        $(, children: $children:ident)?
        $(, data: $data:ident)?
        $(, data_sep: $sep:ident)?
    ) => {
        const $name: ClassDef = ClassDef {
            class_name: ComponentName::$class,
            all_property_names: props!($($p),*),
            subnode_property_names: names!($($s),*),
            children_property_name: class_def!(@opt $($children)?),
            data_property_name: class_def!(@opt $($data)?),
            data_sep_property_name: class_def!(@opt $($sep)?),
        };
    };
}

class_def!(SGML_DOCUMENT: SgmlDocument,
    props: [SgmlConstants, ApplicationInfo, Prolog, Epilog, GoverningDoctype,
            DoctypesAndLinktypes, DocumentElement, Elements, Entities, DefaultedEntities],
    subnodes: [SgmlConstants, Prolog, Epilog, DoctypesAndLinktypes, DocumentElement,
               DefaultedEntities]);
class_def!(SGML_CONSTANTS: SgmlConstants, props: [], subnodes: []);
class_def!(DATA_CHAR: DataChar, props: [Char], subnodes: [], data: Char);
class_def!(ELEMENT: Element,
    props: [Gi, Id, Attributes, Content, Included, MustOmitEndTag, ElementType],
    subnodes: [Attributes, Content],
    children: Content);
class_def!(ATTRIBUTE_ASSIGNMENT: AttributeAssignment,
    props: [AttributeDef, Value, Name, Implied, TokenSep],
    subnodes: [Value],
    children: Value,
    data_sep: TokenSep);
class_def!(ATTRIBUTE_DEF: AttributeDef,
    props: [CurrentAttributeIndex, CurrentGroup, DeclValueType, DefaultValueType,
            DefaultValue, Name, Tokens],
    subnodes: [DefaultValue]);
class_def!(ATTRIBUTE_VALUE_TOKEN: AttributeValueToken,
    props: [Token, Entity, Notation, Referent],
    subnodes: [],
    data: Token);
class_def!(PI: Pi, props: [SystemData, EntityName, Entity], subnodes: []);
class_def!(SDATA: Sdata,
    props: [SystemData, Char, EntityName, Entity],
    subnodes: [],
    data: Char);
class_def!(DOCUMENT_TYPE: DocumentType,
    props: [Name, ElementTypes, Governing, GeneralEntities, Notations, DefaultEntity,
            ParameterEntities],
    subnodes: [GeneralEntities, Notations, ElementTypes, DefaultEntity, ParameterEntities]);
class_def!(ENTITY: Entity,
    props: [Name, EntityType, Text, ExternalId, Attributes, NotationName, Notation, Defaulted],
    subnodes: [ExternalId, Attributes]);
class_def!(DEFAULT_ENTITY: DefaultEntity,
    props: [Name, EntityType, Text, ExternalId, Attributes, NotationName, Notation],
    subnodes: [ExternalId, Attributes]);
class_def!(NOTATION: Notation,
    props: [Name, ExternalId, AttributeDefs],
    subnodes: [ExternalId, AttributeDefs]);
class_def!(EXTERNAL_ID: ExternalId,
    props: [PublicId, SystemId, GeneratedSystemId],
    subnodes: []);
class_def!(EXTERNAL_DATA: ExternalData, props: [EntityName, Entity], subnodes: []);
class_def!(SUBDOCUMENT: Subdocument, props: [EntityName, Entity], subnodes: []);
class_def!(NON_SGML: NonSgml, props: [Char], subnodes: [], data: Char);
class_def!(MESSAGE: Message, props: [], subnodes: []);
class_def!(ELEMENT_TYPE: ElementType,
    props: [AttributeDefs, ContentType, Exclusions, Gi, Inclusions, ModelGroup, OmitEndTag,
            OmitStartTag],
    subnodes: [AttributeDefs, ModelGroup]);
class_def!(MODEL_GROUP: ModelGroup,
    props: [Connector, OccurenceIndicator, ContentTokens],
    subnodes: [ContentTokens]);
class_def!(ELEMENT_TOKEN: ElementToken, props: [Gi, OccurenceIndicator], subnodes: []);
class_def!(PCDATA_TOKEN: PcdataToken, props: [], subnodes: []);

impl NodeClass {
    /// The class's metadata.
    pub fn class_def(self) -> &'static ClassDef {
        match self {
            NodeClass::SgmlDocument => &SGML_DOCUMENT,
            NodeClass::SgmlConstants => &SGML_CONSTANTS,
            NodeClass::DataChar => &DATA_CHAR,
            NodeClass::Element => &ELEMENT,
            NodeClass::AttributeAssignment => &ATTRIBUTE_ASSIGNMENT,
            NodeClass::AttributeDef => &ATTRIBUTE_DEF,
            NodeClass::AttributeValueToken => &ATTRIBUTE_VALUE_TOKEN,
            NodeClass::Pi => &PI,
            NodeClass::Sdata => &SDATA,
            NodeClass::DocumentType => &DOCUMENT_TYPE,
            NodeClass::Entity => &ENTITY,
            NodeClass::DefaultEntity => &DEFAULT_ENTITY,
            NodeClass::Notation => &NOTATION,
            NodeClass::ExternalId => &EXTERNAL_ID,
            NodeClass::ExternalData => &EXTERNAL_DATA,
            NodeClass::Subdocument => &SUBDOCUMENT,
            NodeClass::NonSgml => &NON_SGML,
            NodeClass::Message => &MESSAGE,
            NodeClass::ElementType => &ELEMENT_TYPE,
            NodeClass::ModelGroup => &MODEL_GROUP,
            NodeClass::ElementToken => &ELEMENT_TOKEN,
            NodeClass::PcdataToken => &PCDATA_TOKEN,
        }
    }

    /// Every class tag.
    pub const ALL: &'static [NodeClass] = &[
        NodeClass::SgmlDocument,
        NodeClass::SgmlConstants,
        NodeClass::DataChar,
        NodeClass::Element,
        NodeClass::AttributeAssignment,
        NodeClass::AttributeDef,
        NodeClass::AttributeValueToken,
        NodeClass::Pi,
        NodeClass::Sdata,
        NodeClass::DocumentType,
        NodeClass::Entity,
        NodeClass::DefaultEntity,
        NodeClass::Notation,
        NodeClass::ExternalId,
        NodeClass::ExternalData,
        NodeClass::Subdocument,
        NodeClass::NonSgml,
        NodeClass::Message,
        NodeClass::ElementType,
        NodeClass::ModelGroup,
        NodeClass::ElementToken,
        NodeClass::PcdataToken,
    ];
}

impl ClassDef {
    /// Whether `id` is in this class's property set.
    pub fn has_property(&self, id: ComponentName) -> bool {
        self.all_property_names.contains(&id)
    }
}
