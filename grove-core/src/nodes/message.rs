use std::sync::Arc;

use super::{document_node, downcast, node_basics};
use crate::access::{or_null, Access, AccessResult};
use crate::class_def::NodeClass;
use crate::decl::{Location, Severity};
use crate::grove::GroveImpl;
use crate::node::{Node, NodeRef};
use crate::string::GroveString;

/// A diagnostic recorded while the grove was built.
///
/// The message class defines no properties of its own; the text is
/// available through [`MessageNode::message`].
#[derive(Debug, Clone)]
pub struct MessageNode {
    grove: Arc<GroveImpl>,
    index: usize,
}

impl MessageNode {
    pub(crate) fn new(grove: Arc<GroveImpl>, index: usize) -> Self {
        Self { grove, index }
    }

    /// Rendered message text.
    pub fn message(&self) -> AccessResult<GroveString> {
        Ok(or_null(self.grove.read().messages().get(self.index))?.text.clone())
    }
}

impl Node for MessageNode {
    node_basics!();

    fn class(&self) -> NodeClass {
        NodeClass::Message
    }

    fn same(&self, other: &dyn Node) -> bool {
        downcast::<MessageNode>(other)
            .is_some_and(|o| o.index == self.index && Arc::ptr_eq(&o.grove, &self.grove))
    }

    fn hash_code(&self) -> u64 {
        ((self.grove.grove_index() as u64) << 48) ^ 0x4d00_0000 ^ self.index as u64
    }

    fn origin(&self) -> AccessResult<NodeRef> {
        Ok(document_node(&self.grove))
    }

    fn location(&self) -> AccessResult<Location> {
        Ok(or_null(self.grove.read().messages().get(self.index))?.location.clone())
    }

    fn severity(&self) -> AccessResult<Severity> {
        Ok(or_null(self.grove.read().messages().get(self.index))?.severity)
    }

    fn next_sibling(&self) -> AccessResult<NodeRef> {
        let state = self.grove.read();
        if self.index + 1 < state.messages().len() {
            return Ok(Arc::new(Self::new(self.grove.clone(), self.index + 1)));
        }
        if state.is_complete() {
            Err(Access::Null)
        } else {
            Err(Access::Timeout)
        }
    }

    fn first_sibling(&self) -> AccessResult<NodeRef> {
        Ok(Arc::new(Self::new(self.grove.clone(), 0)))
    }

    fn siblings_index(&self) -> AccessResult<usize> {
        Ok(self.index)
    }
}
