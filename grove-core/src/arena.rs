//! Append-only chunk storage.
//!
//! Every structural record of a grove is a [`Chunk`] in one [`ChunkArena`].
//! Chunks are only ever pushed, so a chunk's [`ChunkId`] is its position
//! in allocation order, which is also event-arrival order.
//!
//! # Architecture
//!
//! ```text
//!  id:      0        1       2       3       4       5
//!         ┌──────┬───────┬───────┬───────┬───────┬───────┐
//!  kind:  │ doc  │ elem a│ "12"  │ elem b│ "34"  │ pi    │
//!  origin:│  -   │   0   │   1   │   1   │   1   │   0   │
//!         └──────┴───────┴───────┴───────┴───────┴───────┘
//! ```
//!
//! A chunk's first child, when it has one, is the chunk allocated right
//! after it. Leaf chunks carry no sibling link: their next sibling is the
//! next chunk in allocation order with the same origin, found by
//! [`ChunkArena::scan_sibling`]. Element chunks also carry an explicit
//! `next_sibling` link that the builder fills once it is known.

use std::sync::Arc;

use crate::decl::{AttributeValue, ElementType, Entity};
use crate::string::{GroveChar, GroveString};

/// Position of a chunk in allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId(pub(crate) u32);

impl ChunkId {
    /// The document root, always the first chunk.
    pub const ROOT: ChunkId = ChunkId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn next(self) -> ChunkId {
        ChunkId(self.0 + 1)
    }
}

/// Links held by the document-root chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentChunk {
    /// First chunk of the prolog.
    pub prolog: Option<ChunkId>,
    pub document_element: Option<ChunkId>,
    /// First chunk of the epilog.
    pub epilog: Option<ChunkId>,
}

/// An element's structural record.
#[derive(Debug, Clone)]
pub struct ElementChunk {
    pub element_type: Arc<ElementType>,
    /// One slot per attribute definition; `None` is an implied value.
    pub attributes: Arc<[Option<AttributeValue>]>,
    pub element_index: u32,
    pub included: bool,
    pub must_omit_end_tag: bool,
    pub id: Option<GroveString>,
    pub next_sibling: Option<ChunkId>,
}

/// Payload of a chunk.
#[derive(Debug, Clone)]
pub enum ChunkKind {
    /// The document root; its links live in [`ChunkArena::root`].
    Document,
    Element(Box<ElementChunk>),
    /// A closed run of character data.
    Data(GroveString),
    /// A processing instruction written inline.
    Pi(GroveString),
    /// A reference to a PI entity.
    PiEntity(Arc<Entity>),
    Sdata(Arc<Entity>),
    ExternalData(Arc<Entity>),
    Subdocument(Arc<Entity>),
    NonSgml(GroveChar),
}

impl ChunkKind {
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, ChunkKind::Element(_))
    }
}

/// One structural record.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Structural parent; `None` only for the document root.
    pub origin: Option<ChunkId>,
    /// Character index of the chunk's start within its location origin.
    pub loc_index: u32,
    pub kind: ChunkKind,
}

impl Chunk {
    pub fn element(&self) -> Option<&ElementChunk> {
        match &self.kind {
            ChunkKind::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.kind, ChunkKind::Document)
    }
}

/// Outcome of an allocation-order sibling search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingScan {
    /// The next sibling.
    Found(ChunkId),
    /// The parent's content has definitely ended.
    End,
    /// Ran out of chunks before the question was settled.
    Exhausted,
}

/// Append-only chunk storage.
#[derive(Debug)]
pub struct ChunkArena {
    chunks: Vec<Chunk>,
    root: DocumentChunk,
}

impl ChunkArena {
    /// Create an arena holding only the document root.
    pub fn new() -> Self {
        let mut chunks = Vec::with_capacity(64);
        chunks.push(Chunk {
            origin: None,
            loc_index: 0,
            kind: ChunkKind::Document,
        });
        Self { chunks, root: DocumentChunk::default() }
    }

    /// Append a chunk, returning its id.
    pub fn push(&mut self, chunk: Chunk) -> ChunkId {
        let id = ChunkId(self.chunks.len() as u32);
        self.chunks.push(chunk);
        id
    }

    #[inline]
    pub fn get(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        self.chunks.get_mut(id.index())
    }

    /// The chunk allocated right after `id`.
    #[inline]
    pub fn after(&self, id: ChunkId) -> Option<(ChunkId, &Chunk)> {
        let next = id.next();
        self.get(next).map(|chunk| (next, chunk))
    }

    /// Id the next push will return.
    #[inline]
    pub fn next_id(&self) -> ChunkId {
        ChunkId(self.chunks.len() as u32)
    }

    /// Number of chunks, the root included.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Always false: the root is allocated up front.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Links of the document root.
    #[inline]
    pub fn root(&self) -> &DocumentChunk {
        &self.root
    }

    #[inline]
    pub(crate) fn root_mut(&mut self) -> &mut DocumentChunk {
        &mut self.root
    }

    /// Whether `ancestor` is `node` or lies on its origin chain.
    pub fn is_ancestor(&self, ancestor: ChunkId, node: ChunkId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|c| c.origin);
        }
        false
    }

    /// Find the next sibling of `id` by walking allocation order.
    ///
    /// Chunks with the same origin are siblings; descendants of earlier
    /// siblings are skipped; a chunk whose origin is an ancestor of ours
    /// means our parent has closed. At document level the document
    /// element separates the prolog from the epilog, so it ends a prolog
    /// chunk's sibling run.
    pub fn scan_sibling(&self, id: ChunkId) -> SiblingScan {
        let Some(origin) = self.get(id).and_then(|c| c.origin) else {
            return SiblingScan::End;
        };
        let document_element = self.root().document_element;
        let mut candidate = id.next();
        while let Some(chunk) = self.get(candidate) {
            match chunk.origin {
                Some(o) if o == origin => {
                    if origin == ChunkId::ROOT && Some(candidate) == document_element {
                        return SiblingScan::End;
                    }
                    return SiblingScan::Found(candidate);
                }
                Some(o) if self.is_ancestor(o, origin) => return SiblingScan::End,
                _ => candidate = candidate.next(),
            }
        }
        SiblingScan::Exhausted
    }
}

impl Default for ChunkArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(origin: ChunkId, text: &str) -> Chunk {
        Chunk { origin: Some(origin), loc_index: 0, kind: ChunkKind::Data(GroveString::from(text)) }
    }

    fn element(origin: ChunkId, name: &str) -> Chunk {
        Chunk {
            origin: Some(origin),
            loc_index: 0,
            kind: ChunkKind::Element(Box::new(ElementChunk {
                element_type: Arc::new(ElementType::new(name)),
                attributes: Arc::from(Vec::new()),
                element_index: 0,
                included: false,
                must_omit_end_tag: false,
                id: None,
                next_sibling: None,
            })),
        }
    }

    #[test]
    fn test_root_is_first() {
        let arena = ChunkArena::new();
        assert_eq!(arena.len(), 1);
        assert!(arena.get(ChunkId::ROOT).is_some_and(|c| c.is_document()));
        assert_eq!(arena.next_id(), ChunkId(1));
    }

    #[test]
    fn test_scan_skips_descendants() {
        let mut arena = ChunkArena::new();
        let a = arena.push(element(ChunkId::ROOT, "A"));
        arena.root_mut().document_element = Some(a);
        let d1 = arena.push(leaf(a, "12"));
        let b = arena.push(element(a, "B"));
        let _inner = arena.push(leaf(b, "x"));
        let d2 = arena.push(leaf(a, "34"));

        assert_eq!(arena.scan_sibling(d1), SiblingScan::Found(b));
        assert_eq!(arena.scan_sibling(b), SiblingScan::Found(d2));
        assert_eq!(arena.scan_sibling(d2), SiblingScan::Exhausted);
    }

    #[test]
    fn test_scan_stops_at_closed_parent() {
        let mut arena = ChunkArena::new();
        let a = arena.push(element(ChunkId::ROOT, "A"));
        arena.root_mut().document_element = Some(a);
        let b = arena.push(element(a, "B"));
        let x = arena.push(leaf(b, "x"));
        let _c = arena.push(element(a, "C"));

        assert_eq!(arena.scan_sibling(x), SiblingScan::End);
        assert!(arena.is_ancestor(a, x));
        assert!(!arena.is_ancestor(x, a));
    }

    #[test]
    fn test_prolog_run_ends_at_document_element() {
        let mut arena = ChunkArena::new();
        let pi = arena.push(Chunk {
            origin: Some(ChunkId::ROOT),
            loc_index: 0,
            kind: ChunkKind::Pi(GroveString::from("pi")),
        });
        assert_eq!(arena.scan_sibling(pi), SiblingScan::Exhausted);
        let a = arena.push(element(ChunkId::ROOT, "A"));
        arena.root_mut().document_element = Some(a);
        assert_eq!(arena.scan_sibling(pi), SiblingScan::End);
    }
}
