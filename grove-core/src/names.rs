//! Canonical property and token names.
//!
//! Every property a node can expose, every node class, and every value of
//! the enumerated properties (entity type, declared value type, ...) is a
//! [`ComponentName`]. Internally only the enum is used; the two external
//! spellings exist for serialization at the boundary:
//!
//! - the compact form (`"docelem"`, `"attdefs"`)
//! - the verbose hyphenated form (`"document-element"`, `"attribute-defs"`)
//!
//! Verbose spellings are unique and resolve through a perfect-hash map.
//! The compact catalog has one collision (`"tokens"` names both
//! content-tokens and tokens), so compact lookup scans and prefers the
//! earlier id.

macro_rules! component_names {
    ($( $(#[$meta:meta])* $variant:ident => $compact:tt, $verbose:tt; )*) => {
        /// A canonical property, class, or enumerated-value name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum ComponentName {
            $( $(#[$meta])* $variant, )*
        }

        impl ComponentName {
            /// Every id, in catalog order.
            pub const ALL: &'static [ComponentName] = &[ $( ComponentName::$variant, )* ];

            /// Compact external spelling.
            pub fn compact_name(self) -> &'static str {
                match self {
                    $( ComponentName::$variant => $compact, )*
                }
            }

            /// Verbose (hyphenated) external spelling.
            pub fn verbose_name(self) -> &'static str {
                match self {
                    $( ComponentName::$variant => $verbose, )*
                }
            }
        }

        static VERBOSE_NAMES: phf::Map<&'static str, ComponentName> = phf::phf_map! {
            $( $verbose => ComponentName::$variant, )*
        };
    };
}

component_names! {
    AllPropertyNames => "allpns", "all-property-names";
    And => "and", "and";
    Any => "any", "any";
    ApplicationInfo => "appinfo", "application-info";
    AttributeAssignment => "attasgn", "attribute-assignment";
    AttributeDef => "attdef", "attribute-def";
    AttributeDefs => "attdefs", "attribute-defs";
    Attributes => "atts", "attributes";
    AttributeValueToken => "attvaltk", "attribute-value-token";
    Cdata => "cdata", "cdata";
    Char => "char", "char";
    ChildrenPropertyName => "childpn", "children-property-name";
    ClassName => "classnm", "class-name";
    Connector => "connect", "connector";
    Conref => "conref", "conref";
    Content => "content", "content";
    ContentTokens => "tokens", "content-tokens";
    ContentType => "contype", "content-type";
    Current => "current", "current";
    CurrentAttributeIndex => "curattix", "current-attribute-index";
    CurrentGroup => "curgrp", "current-group";
    DataChar => "datachar", "data-char";
    DataPropertyName => "datapn", "data-property-name";
    DataSepPropertyName => "dseppn", "data-sep-property-name";
    DeclValueType => "dcltype", "decl-value-type";
    Defaulted => "dflted", "defaulted?";
    DefaultedEntities => "dfltents", "defaulted-entities";
    DefaultEntity => "dfltent", "default-entity";
    DefaultValue => "dfltval", "default-value";
    DefaultValueType => "dflttype", "default-value-type";
    DoctypesAndLinktypes => "dtlts", "doctypes-and-linktypes";
    DocumentElement => "docelem", "document-element";
    DocumentType => "doctype", "document-type";
    Element => "element", "element";
    Elements => "elements", "elements";
    ElementToken => "elemtk", "element-token";
    ElementType => "elemtype", "element-type";
    ElementTypes => "elemtps", "element-types";
    Empty => "empty", "empty";
    Entities => "entities", "entities";
    Entity => "entity", "entity";
    EntityName => "entname", "entity-name";
    EntityType => "enttype", "entity-type";
    Epilog => "epilog", "epilog";
    Exclusions => "excls", "exclusions";
    ExternalData => "extdata", "external-data";
    ExternalId => "extid", "external-id";
    Fixed => "fixed", "fixed";
    GeneralEntities => "genents", "general-entities";
    GeneratedSystemId => "gensysid", "generated-system-id";
    Gi => "gi", "gi";
    Governing => "govrning", "governing?";
    GoverningDoctype => "govdt", "governing-doctype";
    GroveRoot => "grovroot", "grove-root";
    Id => "id", "id";
    Idref => "idref", "idref";
    Idrefs => "idrefs", "idrefs";
    Implied => "implied", "implied?";
    Included => "included", "included?";
    Inclusions => "incls", "inclusions";
    /// Class name of diagnostic message nodes.
    Message => "message", "message";
    ModelGroup => "modelgrp", "model-group";
    MustOmitEndTag => "momitend", "must-omit-end-tag?";
    Name => "name", "name";
    Names => "names", "names";
    Ndata => "ndata", "ndata";
    Nmtkgrp => "nmtkgrp", "name-token-group";
    Nmtoken => "nmtoken", "nmtoken";
    Nmtokens => "nmtokens", "nmtokens";
    /// Class name of non-SGML character nodes.
    NonSgml => "nonsgml", "non-sgml";
    Notation => "notation", "notation";
    NotationName => "notname", "notation-name";
    Notations => "nots", "notations";
    Number => "number", "number";
    Numbers => "numbers", "numbers";
    Nutoken => "nutoken", "nutoken";
    Nutokens => "nutokens", "nutokens";
    OccurenceIndicator => "occur", "occur-indicator";
    OmitEndTag => "omitend", "omit-end-tag?";
    OmitStartTag => "omitstrt", "omit-start-tag?";
    Opt => "opt", "opt";
    Or => "or", "or";
    Origin => "origin", "origin";
    OriginToSubnodeRelPropertyName => "otsrelpn", "origin-to-subnode-rel-property-name";
    ParameterEntities => "parments", "parameter-entities";
    Parent => "parent", "parent";
    PcdataToken => "pcdatatk", "pcdata-token";
    Pi => "pi", "pi";
    Plus => "plus", "plus";
    Prolog => "prolog", "prolog";
    PublicId => "pubid", "public-id";
    Rcdata => "rcdata", "rcdata";
    Referent => "referent", "referent";
    Rep => "rep", "rep";
    Required => "required", "required";
    Sdata => "sdata", "sdata";
    Seq => "seq", "seq";
    SgmlConstants => "sgmlcsts", "sgml-constants";
    SgmlDocument => "sgmldoc", "sgml-document";
    Subdocument => "subdoc", "subdocument";
    SubnodePropertyNames => "subpns", "subnode-property-names";
    SystemData => "sysdata", "system-data";
    SystemId => "sysid", "system-id";
    Text => "text", "text";
    Token => "token", "token";
    Tokens => "tokens", "tokens";
    TokenSep => "tokensep", "token-sep";
    TreeRoot => "treeroot", "tree-root";
    Value => "value", "value";
}

impl ComponentName {
    /// Numeric id (catalog position).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Id for a catalog position, if one exists.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Resolve a verbose spelling such as `"document-element"`.
    pub fn from_verbose_name(name: &str) -> Option<Self> {
        VERBOSE_NAMES.get(name).copied()
    }

    /// Resolve a compact spelling such as `"docelem"`.
    pub fn from_compact_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.compact_name() == name)
    }
}

impl std::fmt::Display for ComponentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verbose_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_positions_are_dense() {
        for (i, id) in ComponentName::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(ComponentName::from_index(i), Some(*id));
        }
        assert_eq!(ComponentName::from_index(ComponentName::ALL.len()), None);
    }

    #[test]
    fn test_verbose_round_trip() {
        for id in ComponentName::ALL {
            assert_eq!(ComponentName::from_verbose_name(id.verbose_name()), Some(*id));
        }
    }

    #[test]
    fn test_spellings() {
        assert_eq!(ComponentName::DocumentElement.compact_name(), "docelem");
        assert_eq!(ComponentName::Defaulted.verbose_name(), "defaulted?");
        assert_eq!(ComponentName::Nmtkgrp.verbose_name(), "name-token-group");
        assert_eq!(
            ComponentName::from_compact_name("otsrelpn"),
            Some(ComponentName::OriginToSubnodeRelPropertyName)
        );
    }

    #[test]
    fn test_compact_collision_prefers_content_tokens() {
        assert_eq!(ComponentName::from_compact_name("tokens"), Some(ComponentName::ContentTokens));
        assert_eq!(ComponentName::from_verbose_name("tokens"), Some(ComponentName::Tokens));
    }

    #[test]
    fn test_unknown_spelling() {
        assert_eq!(ComponentName::from_verbose_name("no-such-property"), None);
        assert_eq!(ComponentName::from_compact_name("nope"), None);
    }
}
