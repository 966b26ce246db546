//! Typed results of the generic property dispatcher.

use crate::names::ComponentName;
use crate::node::{NamedNodeListRef, NodeListRef, NodeRef};
use crate::string::{GroveChar, GroveString, GroveStringList};

/// A property value, one variant per value category.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Node(NodeRef),
    NodeList(NodeListRef),
    NamedNodeList(NamedNodeListRef),
    Boolean(bool),
    Char(GroveChar),
    String(GroveString),
    StringList(GroveStringList),
    ComponentName(ComponentName),
    ComponentNameList(&'static [ComponentName]),
    Integer(i64),
}

impl PropertyValue {
    /// Value category, for diagnostics and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Node(_) => "node",
            PropertyValue::NodeList(_) => "node-list",
            PropertyValue::NamedNodeList(_) => "named-node-list",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Char(_) => "char",
            PropertyValue::String(_) => "string",
            PropertyValue::StringList(_) => "string-list",
            PropertyValue::ComponentName(_) => "component-name",
            PropertyValue::ComponentNameList(_) => "component-name-list",
            PropertyValue::Integer(_) => "integer",
        }
    }

    #[inline]
    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            PropertyValue::Node(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_string(&self) -> Option<&GroveString> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_component_name(&self) -> Option<ComponentName> {
        match self {
            PropertyValue::ComponentName(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_char(&self) -> Option<GroveChar> {
        match self {
            PropertyValue::Char(c) => Some(*c),
            _ => None,
        }
    }
}
