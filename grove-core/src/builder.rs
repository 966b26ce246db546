//! Event consumer that grows a grove.
//!
//! [`GroveBuilder`] is the producer side of a grove. It turns parser
//! [`Event`]s into chunk appends on the shared [`GroveImpl`]; the root
//! [`NodeHandle`] returned by [`GroveBuilder::new`] is the consumer side
//! and can be read from other threads while the builder keeps going.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use grove_core::{Event, GroveBuilder, GroveConfig, StartElement};
//! use grove_core::decl::ElementType;
//!
//! let (mut builder, root) = GroveBuilder::new(0, GroveConfig::default());
//! let para = Arc::new(ElementType::new("P"));
//! builder.handle_event(Event::start(StartElement::new(para))).unwrap();
//! builder.handle_event(Event::data("Hello")).unwrap();
//! builder.handle_event(Event::EndElement).unwrap();
//! builder.handle_event(Event::EndDocument).unwrap();
//!
//! let element = root.document_element().unwrap();
//! assert_eq!(element.gi().unwrap().to_string(), "P");
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::arena::{ChunkKind, ElementChunk};
use crate::config::GroveConfig;
use crate::decl::{
    AttributeValue, ContentType, DefaultValue, Dtd, Entity, Location, Message, SgmlDeclaration,
    Syntax,
};
use crate::event::{Event, PiData, StartElement};
use crate::grove::GroveImpl;
use crate::handle::NodeHandle;
use crate::nodes;
use crate::string::{GroveChar, GroveString};

/// Why the builder refused an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A document-instance event arrived after the grove completed.
    #[error("grove is already complete")]
    Complete,
}

/// Grows one grove from parser events.
#[derive(Debug)]
pub struct GroveBuilder {
    grove: Arc<GroveImpl>,
}

impl GroveBuilder {
    /// Create an empty grove and return its builder and root handle.
    pub fn new(grove_index: u32, config: GroveConfig) -> (Self, NodeHandle) {
        let grove = GroveImpl::new(grove_index, config);
        let root = NodeHandle::new(nodes::document_node(&grove));
        (Self { grove }, root)
    }

    /// A fresh handle on the document node.
    pub fn root(&self) -> NodeHandle {
        NodeHandle::new(nodes::document_node(&self.grove))
    }

    pub fn grove_index(&self) -> u32 {
        self.grove.grove_index()
    }

    pub fn is_complete(&self) -> bool {
        self.grove.is_complete()
    }

    /// Dispatch one event.
    pub fn handle_event(&mut self, event: Event) -> Result<(), BuildError> {
        log::trace!(target: "grove.builder", "event: {:?}", event);
        match event {
            Event::StartElement(start) => self.start_element(*start),
            Event::EndElement => self.end_element(),
            Event::Data { text, location } => self.data(&text, &location),
            Event::Pi { data, location } => self.pi(data, &location),
            Event::SdataEntity { entity, location } => self.sdata_entity(entity, &location),
            Event::NonSgmlChar { c, location } => self.non_sgml_char(c, &location),
            Event::ExternalDataEntity { entity, location } => {
                self.external_data_entity(entity, &location)
            }
            Event::SubdocEntity { entity, location } => self.subdoc_entity(entity, &location),
            Event::EndProlog { dtd } => {
                self.end_prolog(dtd);
                Ok(())
            }
            Event::Appinfo { text } => {
                self.appinfo(text);
                Ok(())
            }
            Event::EntityDefaulted { entity } => {
                self.entity_defaulted(entity);
                Ok(())
            }
            Event::SgmlDecl { sd, prolog_syntax, instance_syntax } => {
                self.sgml_decl(sd, prolog_syntax, instance_syntax);
                Ok(())
            }
            Event::Message(message) => {
                self.message(message);
                Ok(())
            }
            Event::EndDocument => {
                self.end_document();
                Ok(())
            }
        }
    }

    // ========================================================================
    // Document instance
    // ========================================================================

    /// Instance events are skipped in validate-only mode and refused once
    /// the grove is complete.
    fn accept_instance(&self) -> Result<bool, BuildError> {
        if self.grove.config().validate_only {
            return Ok(false);
        }
        if self.grove.is_complete() {
            return Err(BuildError::Complete);
        }
        Ok(true)
    }

    fn set_location(&self, location: &Location) {
        if let Some(origin) = &location.origin {
            let restamp = self.grove.config().loc_origin_restamp;
            self.grove.update(|state| state.set_loc_origin(origin, restamp));
        }
    }

    pub fn start_element(&mut self, start: StartElement) -> Result<(), BuildError> {
        if !self.accept_instance()? {
            return Ok(());
        }
        self.set_location(&start.location);

        let defs = start.element_type.attribute_defs.clone();
        let mut specified_conref = false;
        let attributes: Vec<Option<AttributeValue>> = defs
            .defs
            .iter()
            .enumerate()
            .map(|(i, def)| match start.attributes.get(i).cloned().flatten() {
                Some(value) => {
                    if def.default == DefaultValue::Conref {
                        specified_conref = true;
                    }
                    Some(value)
                }
                None => def.default.value().cloned(),
            })
            .collect();

        let id = defs
            .id_index()
            .and_then(|i| start.attributes.get(i).cloned().flatten())
            .map(|value| value.text().clone());
        let must_omit_end_tag =
            start.element_type.content_type == ContentType::Empty || specified_conref;

        let element = ElementChunk {
            element_type: start.element_type,
            attributes: Arc::from(attributes),
            element_index: 0,
            included: start.included,
            must_omit_end_tag,
            id,
            next_sibling: None,
        };
        let loc_index = start.location.index;
        self.grove.update(|state| state.push(element, loc_index));
        Ok(())
    }

    pub fn end_element(&mut self) -> Result<(), BuildError> {
        if !self.accept_instance()? {
            return Ok(());
        }
        self.grove.update(|state| state.pop());
        Ok(())
    }

    pub fn data(&mut self, text: &GroveString, location: &Location) -> Result<(), BuildError> {
        if !self.accept_instance()? || text.is_empty() {
            return Ok(());
        }
        self.set_location(location);
        self.grove.update(|state| state.append_data_sibling(text.as_chars(), location.index));
        Ok(())
    }

    pub fn pi(&mut self, data: PiData, location: &Location) -> Result<(), BuildError> {
        let kind = match data {
            PiData::Inline(text) => ChunkKind::Pi(text),
            PiData::Entity(entity) => ChunkKind::PiEntity(entity),
        };
        self.leaf(kind, location)
    }

    pub fn sdata_entity(&mut self, entity: Arc<Entity>, location: &Location) -> Result<(), BuildError> {
        self.leaf(ChunkKind::Sdata(entity), location)
    }

    pub fn non_sgml_char(&mut self, c: GroveChar, location: &Location) -> Result<(), BuildError> {
        self.leaf(ChunkKind::NonSgml(c), location)
    }

    pub fn external_data_entity(
        &mut self,
        entity: Arc<Entity>,
        location: &Location,
    ) -> Result<(), BuildError> {
        self.leaf(ChunkKind::ExternalData(entity), location)
    }

    pub fn subdoc_entity(&mut self, entity: Arc<Entity>, location: &Location) -> Result<(), BuildError> {
        self.leaf(ChunkKind::Subdocument(entity), location)
    }

    fn leaf(&mut self, kind: ChunkKind, location: &Location) -> Result<(), BuildError> {
        if !self.accept_instance()? {
            return Ok(());
        }
        self.set_location(location);
        self.grove.update(|state| state.append_sibling(kind, location.index));
        Ok(())
    }

    // ========================================================================
    // Declarations and diagnostics
    // ========================================================================

    pub fn end_prolog(&mut self, dtd: Arc<Dtd>) {
        self.grove.update(|state| state.set_dtd(dtd));
    }

    pub fn appinfo(&mut self, text: GroveString) {
        self.grove.update(|state| state.set_appinfo(text));
    }

    pub fn entity_defaulted(&mut self, entity: Arc<Entity>) {
        self.grove.update(|state| state.add_defaulted_entity(entity));
    }

    pub fn sgml_decl(
        &mut self,
        sd: Arc<SgmlDeclaration>,
        prolog_syntax: Arc<Syntax>,
        instance_syntax: Arc<Syntax>,
    ) {
        self.grove.update(|state| state.set_sd(sd, prolog_syntax, instance_syntax));
    }

    pub fn message(&mut self, message: Message) {
        self.grove.update(|state| state.append_message(message));
    }

    /// Complete the grove. Calling it again has no further effect.
    pub fn end_document(&mut self) {
        self.grove.update(|state| state.set_complete());
    }
}
