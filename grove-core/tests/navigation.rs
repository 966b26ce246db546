//! Node properties, declarations, attributes and growing-grove answers.

mod common;

use std::sync::Arc;

use common::{build, build_with, element_type, Shape};
use grove_core::decl::{
    AttributeDefinition, AttributeValue, ContentToken, ContentType, DeclValueType, DefaultValue,
    Dtd, ElementType, Entity, EntityType, ExternalId, Location, Message, ModelGroup, Connector,
    Notation, OccurIndicator, Severity,
};
use grove_core::{
    Access, ComponentName, Event, GroveBuilder, GroveChar, GroveConfig, GroveString, NoSdataMapper,
    Node, NodeClass, NodeListHandle, NodeRef, PropertyValue, SdataMapper, StartElement,
};
use pretty_assertions::assert_eq;

struct GreekMapper;

impl SdataMapper for GreekMapper {
    fn sdata_map(&self, name: &GroveString, _text: &GroveString) -> Option<GroveChar> {
        name.eq_str("alpha").then_some(0x3b1)
    }
}

/// A small declared document:
///
/// ```text
/// <!DOCTYPE DOC [
///   <!ELEMENT DOC - - (TITLE, P*)>
///   <!ELEMENT TITLE - O (#PCDATA)>
///   <!ELEMENT P - O (#PCDATA | XREF)*>
///   <!ELEMENT XREF - O EMPTY>
///   <!ATTLIST DOC ID ID #IMPLIED STATUS (DRAFT|FINAL) FINAL>
///   <!ATTLIST P ID ID #IMPLIED>
///   <!ATTLIST XREF TO IDREF #REQUIRED NOTE CDATA #IMPLIED>
///   <!NOTATION GIF SYSTEM "gif.exe">
///   <!ENTITY alpha SDATA "[alpha]">
///   <!ENTITY logo SYSTEM "logo.gif" NDATA GIF>
/// ]>
/// ```
struct Declared {
    dtd: Arc<Dtd>,
    doc: Arc<ElementType>,
    title: Arc<ElementType>,
    p: Arc<ElementType>,
    xref: Arc<ElementType>,
}

fn declared() -> Declared {
    let status = AttributeDefinition {
        allowed_tokens: vec!["DRAFT".into(), "FINAL".into()],
        ..AttributeDefinition::new(
            "STATUS",
            DeclValueType::NameTokenGroup,
            DefaultValue::Value(AttributeValue::Tokens("FINAL".into())),
        )
    };
    let mut doc = ElementType::new("DOC").with_attributes(vec![
        AttributeDefinition::new("ID", DeclValueType::Id, DefaultValue::Implied),
        status,
    ]);
    doc.content_type = ContentType::ModelGroup;
    doc.model_group = Some(Arc::new(ModelGroup {
        connector: Connector::Seq,
        occur: None,
        tokens: vec![
            ContentToken::Element { gi: "TITLE".into(), occur: None },
            ContentToken::Element { gi: "P".into(), occur: Some(OccurIndicator::Rep) },
        ],
    }));
    let mut p = ElementType::new("P")
        .with_attributes(vec![AttributeDefinition::new("ID", DeclValueType::Id, DefaultValue::Implied)]);
    p.content_type = ContentType::ModelGroup;
    p.omit_end_tag = true;
    p.model_group = Some(Arc::new(ModelGroup {
        connector: Connector::Or,
        occur: Some(OccurIndicator::Rep),
        tokens: vec![
            ContentToken::Pcdata,
            ContentToken::Element { gi: "XREF".into(), occur: None },
        ],
    }));
    let xref = ElementType::new("XREF").with_content(ContentType::Empty).with_attributes(vec![
        AttributeDefinition::new("TO", DeclValueType::Idref, DefaultValue::Required),
        AttributeDefinition::new("NOTE", DeclValueType::Cdata, DefaultValue::Implied),
    ]);

    let gif = Arc::new(Notation {
        name: "GIF".into(),
        external_id: Some(ExternalId { system_id: Some("gif.exe".into()), ..ExternalId::default() }),
        attribute_defs: None,
    });
    let mut logo = Entity::external(
        "logo",
        EntityType::Ndata,
        ExternalId { system_id: Some("logo.gif".into()), ..ExternalId::default() },
    );
    logo.notation = Some(gif.clone());

    let doc = Arc::new(doc);
    let title = Arc::new(ElementType::new("TITLE").with_content(ContentType::Rcdata));
    let p = Arc::new(p);
    let xref = Arc::new(xref);
    let dtd = Arc::new(Dtd {
        general_entities: vec![
            Arc::new(Entity::internal("alpha", EntityType::Sdata, "[alpha]")),
            Arc::new(logo),
        ],
        notations: vec![gif],
        element_types: vec![doc.clone(), title.clone(), p.clone(), xref.clone()],
        ..Dtd::new("DOC")
    });
    Declared { dtd, doc, title, p, xref }
}

/// `<DOC><TITLE>T</TITLE><P ID=p1>see <XREF TO=P2><P ID=p2>&alpha;&logo;</DOC>`
fn declared_grove() -> (Declared, grove_core::NodeHandle) {
    let d = declared();
    let (mut b, root) = GroveBuilder::new(0, GroveConfig::default());
    b.end_prolog(d.dtd.clone());
    b.start_element(StartElement::new(d.doc.clone())).unwrap();
    b.start_element(StartElement::new(d.title.clone())).unwrap();
    b.handle_event(Event::data("T")).unwrap();
    b.end_element().unwrap();
    b.start_element(StartElement::new(d.p.clone()).with_attribute("ID", AttributeValue::Tokens("P1".into())))
        .unwrap();
    b.handle_event(Event::data("see ")).unwrap();
    b.start_element(StartElement::new(d.xref.clone()).with_attribute("TO", AttributeValue::Tokens("P2".into())))
        .unwrap();
    b.end_element().unwrap();
    b.end_element().unwrap();
    b.start_element(StartElement::new(d.p.clone()).with_attribute("ID", AttributeValue::Tokens("P2".into())))
        .unwrap();
    let alpha = d.dtd.general_entity(&"alpha".into()).unwrap().clone();
    let logo = d.dtd.general_entity(&"logo".into()).unwrap().clone();
    b.sdata_entity(alpha, &Default::default()).unwrap();
    b.external_data_entity(logo, &Default::default()).unwrap();
    b.end_element().unwrap();
    b.end_element().unwrap();
    b.end_document();
    (d, root)
}

fn string(value: PropertyValue) -> String {
    value.as_string().map(|s| s.to_string()).unwrap_or_default()
}

// =============================================================================
// Property dispatch
// =============================================================================

/// One node of every class, from a grove that reaches them all.
fn one_of_each_class() -> Vec<NodeRef> {
    let d = declared();
    let default_entity = Arc::new(Entity::internal("#DEFAULT", EntityType::Text, "?"));
    let dtd = Arc::new(Dtd { default_entity: Some(default_entity), ..(*d.dtd).clone() });
    let chapter = Arc::new(Entity::external(
        "chap",
        EntityType::Subdocument,
        ExternalId { system_id: Some("chap.sgm".into()), ..ExternalId::default() },
    ));
    let logo = d.dtd.general_entity(&"logo".into()).unwrap().clone();
    let alpha = d.dtd.general_entity(&"alpha".into()).unwrap().clone();

    // <?prolog><DOC><TITLE>T</TITLE><P>&alpha;&logo;&chap;\x80</DOC>
    let (mut b, root) = GroveBuilder::new(0, GroveConfig::default());
    b.handle_event(Event::pi("prolog")).unwrap();
    b.end_prolog(dtd);
    b.start_element(StartElement::new(d.doc.clone())).unwrap();
    b.start_element(StartElement::new(d.title.clone())).unwrap();
    b.handle_event(Event::data("T")).unwrap();
    b.end_element().unwrap();
    b.start_element(StartElement::new(d.p.clone())).unwrap();
    b.sdata_entity(alpha, &Default::default()).unwrap();
    b.external_data_entity(logo, &Default::default()).unwrap();
    b.subdoc_entity(chapter, &Default::default()).unwrap();
    b.non_sgml_char(0x80, &Default::default()).unwrap();
    b.end_element().unwrap();
    b.end_element().unwrap();
    b.message(Message { severity: Severity::Warning, text: "late".into(), location: Location::default() });
    b.end_document();

    let document = root.node().clone();
    let doc = root.document_element().unwrap();
    let status = doc.attributes().unwrap().named_node("STATUS").unwrap();
    let title = doc.first_child().unwrap();
    let p = title.next_sibling().unwrap();
    let doctype = document.governing_doctype().unwrap();
    let logo = doctype.general_entities().unwrap().named_node(&"logo".into()).unwrap();
    let types = doctype.element_types().unwrap();
    let doc_type = types.named_node(&"DOC".into()).unwrap();
    let doc_group = doc_type.model_group().unwrap();
    let p_group = types.named_node(&"P".into()).unwrap().model_group().unwrap();

    let mut nodes = vec![
        document.clone(),
        document.sgml_constants().unwrap(),
        document.prolog().unwrap().first().unwrap(),
        doc.node().clone(),
        status.node().clone(),
        status.node().value().unwrap().first().unwrap(),
        title.first_child().unwrap().node().clone(),
        doctype.default_entity().unwrap(),
        logo.external_id().unwrap(),
        logo.notation().unwrap(),
        logo.clone(),
        doc_type.attribute_defs().unwrap().named_node(&"STATUS".into()).unwrap(),
        doc_group.content_tokens().unwrap().first().unwrap(),
        p_group.content_tokens().unwrap().first().unwrap(),
        doc_group,
        doc_type,
        doctype,
        document.messages().unwrap().first().unwrap(),
    ];
    nodes.extend(NodeListHandle::new(p.node().content().unwrap()).iter().map(|n| n.node().clone()));
    nodes
}

#[test]
fn test_class_names_match_catalog() {
    for class in NodeClass::ALL {
        let def = class.class_def();
        assert_eq!(def.all_property_names[0], ComponentName::ClassName);
        assert!(def.has_property(ComponentName::Parent), "{:?}", class);
    }

    let nodes = one_of_each_class();
    for node in &nodes {
        let class = node.property(ComponentName::ClassName, &NoSdataMapper).unwrap();
        assert_eq!(class.as_component_name(), Some(node.class().class_def().class_name), "{:?}", node.class());
    }
    let missing: Vec<NodeClass> =
        NodeClass::ALL.iter().copied().filter(|c| !nodes.iter().any(|n| n.class() == *c)).collect();
    assert_eq!(missing, Vec::<NodeClass>::new());

    let root = build(&Shape::element("A", vec![Shape::data("x")]));
    let a = root.document_element().unwrap();
    let class = a.node().property(ComponentName::ClassName, &NoSdataMapper).unwrap();
    assert_eq!(class.as_component_name(), Some(ComponentName::Element));
    let class = root.node().property(ComponentName::ClassName, &NoSdataMapper).unwrap();
    assert_eq!(class.as_component_name(), Some(ComponentName::SgmlDocument));
}

#[test]
fn test_property_dispatch_and_not_in_class() {
    let root = build(&Shape::element("A", vec![Shape::data("xy")]));
    let a = root.document_element().unwrap();
    assert_eq!(string(a.node().property(ComponentName::Gi, &NoSdataMapper).unwrap()), "A");
    assert_eq!(a.node().property(ComponentName::SystemData, &NoSdataMapper).err(), Some(Access::NotInClass));
    assert_eq!(a.node().property(ComponentName::Id, &NoSdataMapper).err(), Some(Access::Null));

    let x = a.first_child().unwrap();
    let c = x.node().property(ComponentName::Char, &NoSdataMapper).unwrap();
    assert_eq!(c.as_char(), Some('x' as GroveChar));
    assert_eq!(x.node().property(ComponentName::Gi, &NoSdataMapper).err(), Some(Access::NotInClass));
    assert_eq!(x.node().property_at(usize::MAX, &NoSdataMapper).err(), Some(Access::NotInClass));

    let names = a.node().property(ComponentName::SubnodePropertyNames, &NoSdataMapper).unwrap();
    assert_eq!(names.kind(), "component-name-list");
    let children = a.node().property(ComponentName::ChildrenPropertyName, &NoSdataMapper).unwrap();
    assert_eq!(children.as_component_name(), Some(ComponentName::Content));
}

#[test]
fn test_intrinsic_navigation() {
    let shape = Shape::element("A", vec![Shape::element("B", vec![Shape::data("leaf")]), Shape::data("z")]);
    let root = build(&shape);
    let a = root.document_element().unwrap();
    let b = a.first_child().unwrap();
    let leaf = b.first_child().unwrap();

    assert!(leaf.parent().unwrap().same_node(&b));
    assert!(leaf.node().tree_root().unwrap().same(root.node().as_node()));
    assert!(leaf.node().grove_root().unwrap().same(root.node().as_node()));
    assert_eq!(root.parent().err(), Some(Access::Null));

    let z = b.next_sibling().unwrap();
    assert_eq!(z.node().siblings_index(), Ok(1));
    assert!(z.previous_sibling().unwrap().same_node(&b));
    assert_eq!(b.previous_sibling().err(), Some(Access::Null));

    // Document order: A, B, "leaf", "z".
    let mut order = vec![a.gi().unwrap().to_string()];
    let mut node = a.clone();
    while let Ok(next) = node.next_chunk_after() {
        order.push(match next.gi() {
            Some(gi) => gi.to_string(),
            None => common::text(&next),
        });
        node = next;
    }
    assert_eq!(order, vec!["A", "B", "leaf", "z"]);
}

#[test]
fn test_in_place_steps_agree_with_materialized_nodes() {
    let shape = Shape::element(
        "A",
        vec![Shape::element("B", vec![]), Shape::data("cd"), Shape::element("E", vec![])],
    );
    let root = build(&shape);
    let a = root.document_element().unwrap();

    let mut walker = a.first_child().unwrap();
    let mut materialized = vec![walker.clone()];
    while let Ok(next) = materialized.last().unwrap().next_sibling() {
        materialized.push(next);
    }
    let mut stepped = 1;
    while walker.assign_next_sibling().is_ok() {
        assert!(walker.same_node(&materialized[stepped]), "step {}", stepped);
        assert_eq!(walker.node().hash_code(), materialized[stepped].node().hash_code());
        stepped += 1;
    }
    // B, 'c', 'd', E
    assert_eq!(stepped, 4);
    assert_eq!(materialized.len(), 4);
}

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn test_governing_doctype() {
    let (_d, root) = declared_grove();
    let doctype = root.node().governing_doctype().unwrap();
    assert_eq!(doctype.class(), NodeClass::DocumentType);
    assert_eq!(doctype.name().unwrap().to_string(), "DOC");
    assert_eq!(doctype.governing(), Ok(true));

    let types = doctype.element_types().unwrap();
    let p = types.named_node(&"p".into()).unwrap();
    assert_eq!(p.omit_end_tag(), Ok(true));
    assert_eq!(p.content_type(), Ok(ContentType::ModelGroup));
    assert!(p.origin().unwrap().same(doctype.as_node()));

    let via_list = root.node().doctypes_and_linktypes().unwrap().named_node(&"doc".into()).unwrap();
    assert!(via_list.same(doctype.as_node()));
}

#[test]
fn test_model_group_tokens() {
    let (_d, root) = declared_grove();
    let doc_type = root.document_element().unwrap().node().element_type().unwrap();
    let group = doc_type.model_group().unwrap();
    assert_eq!(group.connector(), Ok(Connector::Seq));
    assert_eq!(group.occur_indicator().err(), Some(Access::Null));

    let tokens = grove_core::NodeListHandle::new(group.content_tokens().unwrap());
    let gis: Vec<String> = tokens.iter().map(|t| t.gi().unwrap().to_string()).collect();
    assert_eq!(gis, vec!["TITLE", "P"]);
    let p_token = tokens.nth(1).unwrap();
    assert_eq!(p_token.node().occur_indicator(), Ok(OccurIndicator::Rep));
    assert!(p_token.node().origin().unwrap().same(group.as_node()));

    let title_type = root.node().governing_doctype().unwrap().element_types().unwrap();
    let title_type = title_type.named_node(&"TITLE".into()).unwrap();
    assert_eq!(title_type.model_group().err(), Some(Access::Null));

    let p_group = root
        .node()
        .governing_doctype()
        .unwrap()
        .element_types()
        .unwrap()
        .named_node(&"P".into())
        .unwrap()
        .model_group()
        .unwrap();
    let first = p_group.content_tokens().unwrap().first().unwrap();
    assert_eq!(first.class(), NodeClass::PcdataToken);
    assert_eq!(first.gi().err(), Some(Access::NotInClass));
}

#[test]
fn test_attribute_definitions() {
    let (_d, root) = declared_grove();
    let doc_type = root.document_element().unwrap().node().element_type().unwrap();
    let defs = doc_type.attribute_defs().unwrap();
    let status = defs.named_node(&"status".into()).unwrap();
    assert_eq!(status.decl_value_type(), Ok(DeclValueType::NameTokenGroup));
    let tokens = status.allowed_tokens().unwrap();
    assert_eq!(tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>(), vec!["DRAFT", "FINAL"]);
    let default = status.default_value().unwrap().first().unwrap();
    assert_eq!(default.token().unwrap().to_string(), "FINAL");
    assert_eq!(default.origin_to_subnode_rel_property_name(), Ok(ComponentName::DefaultValue));

    let id = defs.named_node(&"ID".into()).unwrap();
    assert_eq!(id.default_value().err(), Some(Access::Null));
    assert_eq!(id.allowed_tokens().err(), Some(Access::Null));
}

#[test]
fn test_entities_and_notations() {
    let (_d, root) = declared_grove();
    let entities = root.node().entities().unwrap();
    let logo = entities.named_node(&"logo".into()).unwrap();
    assert_eq!(logo.entity_type(), Ok(EntityType::Ndata));
    assert_eq!(logo.notation_name().unwrap().to_string(), "GIF");
    let ext = logo.external_id().unwrap();
    assert_eq!(ext.system_id().unwrap().to_string(), "logo.gif");
    assert_eq!(ext.public_id().err(), Some(Access::Null));
    assert!(ext.origin().unwrap().same(logo.as_node()));

    // Entity names do not fold under the reference syntax.
    assert_eq!(entities.named_node(&"LOGO".into()).err(), Some(Access::Null));

    let gif = logo.notation().unwrap();
    assert_eq!(gif.external_id().unwrap().system_id().unwrap().to_string(), "gif.exe");
    assert_eq!(logo.defaulted(), Ok(false));
}

// =============================================================================
// Attributes
// =============================================================================

#[test]
fn test_attribute_values() {
    let (_d, root) = declared_grove();
    let doc = root.document_element().unwrap();

    // Defaulted token value.
    assert_eq!(doc.attribute_string("status", &NoSdataMapper), Some("FINAL".into()));
    let attrs = doc.attributes().unwrap();
    let id = attrs.named_node("ID").unwrap();
    assert_eq!(id.node().implied(), Ok(true));
    assert_eq!(id.node().value().err(), Some(Access::Null));
    assert_eq!(id.node().origin_to_subnode_rel_property_name(), Ok(ComponentName::Attributes));
    assert!(id.origin().unwrap().same_node(&doc));
    assert_eq!(attrs.node_list().iter().count(), 2);
    assert_eq!(attrs.node_name(&id).unwrap().to_string(), "ID");
}

#[test]
fn test_idref_referent() {
    let (_d, root) = declared_grove();
    let doc = root.document_element().unwrap();
    let p1 = doc.first_child().unwrap().next_sibling().unwrap();
    assert_eq!(p1.node().id().unwrap().to_string(), "P1");

    let xref = grove_core::NodeListHandle::new(p1.node().content().unwrap())
        .iter()
        .find(|n| n.gi().is_some())
        .unwrap();
    assert_eq!(xref.node().must_omit_end_tag(), Ok(true));
    let to = xref.attributes().unwrap().named_node("to").unwrap();
    let token = to.node().value().unwrap().first().unwrap();
    assert_eq!(token.token().unwrap().to_string(), "P2");
    let referent = token.referent().unwrap();
    assert_eq!(referent.id().unwrap().to_string(), "P2");
    assert_eq!(token.entity().err(), Some(Access::Null));

    let note = xref.attributes().unwrap().named_node("NOTE").unwrap();
    assert_eq!(note.node().implied(), Ok(true));
}

#[test]
fn test_entity_references_in_content() {
    let (_d, root) = declared_grove();
    let doc = root.document_element().unwrap();
    let p2 = doc.first_child().unwrap().next_sibling().unwrap().next_sibling().unwrap();
    let sdata = p2.first_child().unwrap();
    assert_eq!(sdata.node().class(), NodeClass::Sdata);
    assert_eq!(sdata.node().entity_name().unwrap().to_string(), "alpha");
    assert_eq!(sdata.node().system_data().unwrap().to_string(), "[alpha]");
    assert_eq!(sdata.node().char(&GreekMapper), Ok(0x3b1));
    assert_eq!(sdata.node().char(&NoSdataMapper).err(), Some(Access::Null));

    let ext = sdata.next_sibling().unwrap();
    assert_eq!(ext.node().class(), NodeClass::ExternalData);
    let entity = ext.node().entity().unwrap();
    assert_eq!(entity.name().unwrap().to_string(), "logo");
    assert_eq!(ext.next_sibling().err(), Some(Access::Null));
}

// =============================================================================
// Growing groves
// =============================================================================

#[test]
fn test_growing_grove_times_out_then_settles() {
    let (mut builder, root) = GroveBuilder::new(0, GroveConfig::default());
    assert_eq!(root.document_element().err(), Some(Access::Timeout));
    assert_eq!(root.node().prolog().err(), Some(Access::Timeout));
    assert_eq!(root.node().governing_doctype().err(), Some(Access::Timeout));

    builder.start_element(StartElement::new(element_type("A"))).unwrap();
    let a = root.document_element().unwrap();
    assert_eq!(a.first_child().err(), Some(Access::Timeout));
    assert_eq!(root.node().prolog().map(|l| l.first().is_err()), Ok(true));

    builder.start_element(StartElement::new(element_type("B"))).unwrap();
    builder.end_element().unwrap();
    let b = a.first_child().unwrap();
    assert_eq!(b.next_sibling().err(), Some(Access::Timeout));
    assert_eq!(a.next_sibling().err(), Some(Access::Timeout));
    assert_eq!(root.node().epilog().err(), Some(Access::Timeout));

    builder.start_element(StartElement::new(element_type("C"))).unwrap();
    assert_eq!(b.next_sibling().unwrap().gi().unwrap().to_string(), "C");

    builder.end_element().unwrap();
    builder.end_element().unwrap();
    builder.end_document();
    assert_eq!(a.next_sibling().err(), Some(Access::Null));
    assert_eq!(root.node().epilog().map(|l| l.first().is_err()), Ok(true));
    assert_eq!(root.node().governing_doctype().err(), Some(Access::Null));
}

#[test]
fn test_pending_data_is_invisible_until_flushed() {
    let (mut builder, root) = build_with(
        GroveConfig::default(),
        vec![Event::start(StartElement::new(element_type("A"))), Event::data("ab")],
    );
    let a = root.document_element().unwrap();
    assert_eq!(a.first_child().err(), Some(Access::Timeout));
    builder.handle_event(Event::data("cd")).unwrap();
    builder.handle_event(Event::EndElement).unwrap();
    assert_eq!(common::text(&a.first_child().unwrap()), "abcd");
}

#[test]
fn test_referent_times_out_until_complete() {
    let d = declared();
    let (mut b, root) = GroveBuilder::new(0, GroveConfig::default());
    b.end_prolog(d.dtd.clone());
    b.start_element(StartElement::new(d.doc.clone())).unwrap();
    b.start_element(StartElement::new(d.xref.clone()).with_attribute("TO", AttributeValue::Tokens("LATER".into())))
        .unwrap();
    b.end_element().unwrap();

    let xref = root.document_element().unwrap().first_child().unwrap();
    let to = xref.attributes().unwrap().named_node("TO").unwrap();
    let token = to.node().value().unwrap().first().unwrap();
    assert_eq!(token.referent().err(), Some(Access::Timeout));

    b.end_element().unwrap();
    b.end_document();
    assert_eq!(token.referent().err(), Some(Access::Null));
}

#[test]
fn test_cdata_attribute_value_is_character_nodes() {
    let d = declared();
    let (mut b, root) = GroveBuilder::new(0, GroveConfig::default());
    b.end_prolog(d.dtd.clone());
    b.start_element(StartElement::new(d.doc.clone())).unwrap();
    let xref = StartElement::new(d.xref.clone())
        .with_attribute("TO", AttributeValue::Tokens("A B".into()))
        .with_attribute("NOTE", AttributeValue::Cdata("hi there".into()));
    b.start_element(xref).unwrap();
    b.end_element().unwrap();
    b.end_element().unwrap();
    b.end_document();

    let xref = root.document_element().unwrap().first_child().unwrap();
    assert_eq!(xref.attribute_string("NOTE", &NoSdataMapper), Some("hi there".into()));
    let note = xref.attributes().unwrap().named_node("NOTE").unwrap();
    let chars = grove_core::NodeListHandle::new(note.node().value().unwrap());
    assert_eq!(chars.iter().count(), 8);
    let h = chars.first().unwrap();
    assert_eq!(h.node().class(), NodeClass::DataChar);
    assert_eq!(h.node().char(&NoSdataMapper), Ok('h' as GroveChar));
    assert!(h.origin().unwrap().same_node(&note));
    assert_eq!(note.node().tokens().err(), Some(Access::NotInClass));

    let to = xref.attributes().unwrap().named_node("TO").unwrap();
    assert_eq!(to.node().tokens().unwrap().to_string(), "A B");
    assert_eq!(grove_core::NodeListHandle::new(to.node().value().unwrap()).iter().count(), 2);
}
