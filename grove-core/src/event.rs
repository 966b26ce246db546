//! Parser events - the input of the grove builder.
//!
//! One event per parser callback, in document order. Structure is
//! expressed by `StartElement`/`EndElement` pairs; everything between a
//! pair belongs to that element's content.
//!
//! ## Event Sequences
//!
//! `<a>12<b></b>34</a>` arrives as:
//! ```text
//! StartElement(a)
//! Data("12")
//! StartElement(b)
//! EndElement
//! Data("34")
//! EndElement
//! EndDocument
//! ```
//!
//! Declarations (`SgmlDecl`, `EndProlog`) arrive before the instance.

use std::sync::Arc;

use crate::decl::{
    AttributeValue, Dtd, ElementType, Entity, Location, Message, SgmlDeclaration, Syntax,
};
use crate::string::{GroveChar, GroveString};

/// Payload of a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement {
    pub element_type: Arc<ElementType>,
    /// Specified values, one slot per attribute definition of the type.
    pub attributes: Vec<Option<AttributeValue>>,
    /// Element allowed only by an inclusion exception.
    pub included: bool,
    pub location: Location,
}

impl StartElement {
    /// A start tag with no attributes specified.
    pub fn new(element_type: Arc<ElementType>) -> Self {
        let n = element_type.attribute_defs.len();
        Self {
            element_type,
            attributes: vec![None; n],
            included: false,
            location: Location::default(),
        }
    }

    /// Specify the attribute whose definition is named `name`.
    ///
    /// Unknown names are ignored; the parser reports those.
    pub fn with_attribute(mut self, name: &str, value: AttributeValue) -> Self {
        if let Some(i) = self.element_type.attribute_defs.position(&GroveString::from(name)) {
            if let Some(slot) = self.attributes.get_mut(i) {
                *slot = Some(value);
            }
        }
        self
    }

    pub fn included(mut self, included: bool) -> Self {
        self.included = included;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// A processing instruction, written inline or through a PI entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PiData {
    Inline(GroveString),
    Entity(Arc<Entity>),
}

/// Builder input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // ========== Structure Events ==========

    /// Start tag. Boxed to keep the enum small.
    StartElement(Box<StartElement>),

    /// End tag (explicit or implied).
    EndElement,

    // ========== Content Events ==========

    /// Character data. Consecutive `Data` events form one chunk.
    Data { text: GroveString, location: Location },

    Pi { data: PiData, location: Location },

    SdataEntity { entity: Arc<Entity>, location: Location },

    /// A character not allowed by the document character set.
    NonSgmlChar { c: GroveChar, location: Location },

    ExternalDataEntity { entity: Arc<Entity>, location: Location },

    SubdocEntity { entity: Arc<Entity>, location: Location },

    // ========== Declaration Events ==========

    /// End of the prolog; carries the governing DTD.
    EndProlog { dtd: Arc<Dtd> },

    /// APPINFO parameter of the SGML declaration.
    Appinfo { text: GroveString },

    /// An entity created from the default entity.
    EntityDefaulted { entity: Arc<Entity> },

    SgmlDecl {
        sd: Arc<SgmlDeclaration>,
        prolog_syntax: Arc<Syntax>,
        instance_syntax: Arc<Syntax>,
    },

    // ========== Diagnostics ==========

    Message(Message),

    // ========== End ==========

    EndDocument,
}

impl Event {
    pub fn start(element: StartElement) -> Self {
        Event::StartElement(Box::new(element))
    }

    pub fn data(text: impl Into<GroveString>) -> Self {
        Event::Data { text: text.into(), location: Location::default() }
    }

    pub fn pi(text: impl Into<GroveString>) -> Self {
        Event::Pi { data: PiData::Inline(text.into()), location: Location::default() }
    }
}
