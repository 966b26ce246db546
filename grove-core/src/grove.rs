//! Grove state and the builder state machine.
//!
//! A [`GroveImpl`] is shared by the builder and every node view of one
//! document. All mutable state sits in a [`GroveState`] behind a
//! reader-writer lock: the builder holds the write side for the length of
//! one append, readers hold the read side for the length of one accessor.
//! Published chunks are never rewritten except to fill a link slot that
//! was still empty, so a reader only ever sees the grove grow.
//!
//! # Lifecycle
//!
//! ```text
//!   Growing ──set_complete()──▶ Complete
//!      │                          │
//!      │ accessors may time out   │ every accessor is definitive
//! ```
//!
//! Readers that got [`Access::Timeout`](crate::Access::Timeout) can block
//! in [`GroveImpl::wait_for_more_nodes`] until the next pulse.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock, RwLockReadGuard};

use crate::access::{Access, AccessResult};
use crate::arena::{Chunk, ChunkArena, ChunkId, ChunkKind, ElementChunk};
use crate::config::GroveConfig;
use crate::decl::{Dtd, Entity, Location, Message, SgmlDeclaration, SourceOrigin, Syntax};
use crate::string::{GroveChar, GroveString};

/// The single link slot the next structural append fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppendPoint {
    /// The `next_sibling` link of a closed element.
    NextSibling(ChunkId),
    Prolog,
    Epilog,
}

/// Character data not yet closed into a chunk.
#[derive(Debug)]
struct PendingData {
    loc_index: u32,
    chars: Vec<GroveChar>,
    /// `(char offset, loc index)` where a merged event did not continue
    /// the source run.
    breaks: Vec<(u32, u32)>,
}

impl PendingData {
    /// Source index the next character would have if contiguous.
    fn next_loc_index(&self) -> u32 {
        let len = self.chars.len() as u32;
        match self.breaks.last() {
            Some(&(at, index)) => index.saturating_add(len - at),
            None => self.loc_index.saturating_add(len),
        }
    }
}

/// Everything about a grove that changes while it grows.
#[derive(Debug)]
pub struct GroveState {
    arena: ChunkArena,
    open: ChunkId,
    pending: Option<PendingData>,
    tail: Option<AppendPoint>,
    prolog_done: bool,
    complete: bool,
    pulse_due: bool,

    n_elements: u32,
    n_events: u32,
    pulse_interval: u32,

    chunks_since_loc_origin: u32,
    current_loc_origin: Option<Arc<SourceOrigin>>,
    /// Origin in effect from each chunk id onwards, sorted by id.
    loc_origins: Vec<(ChunkId, Arc<SourceOrigin>)>,
    /// Index discontinuities inside coalesced data chunks.
    data_breaks: HashMap<ChunkId, Box<[(u32, u32)]>>,

    dtd: Option<Arc<Dtd>>,
    sd: Option<Arc<SgmlDeclaration>>,
    prolog_syntax: Option<Arc<Syntax>>,
    instance_syntax: Option<Arc<Syntax>>,
    appinfo: Option<GroveString>,

    defaulted_entities: Vec<Arc<Entity>>,
    defaulted_index: HashMap<GroveString, usize>,
    messages: Vec<Message>,
    id_table: HashMap<GroveString, ChunkId>,
}

impl GroveState {
    fn new(pulse_interval: u32) -> Self {
        Self {
            arena: ChunkArena::new(),
            open: ChunkId::ROOT,
            pending: None,
            tail: Some(AppendPoint::Prolog),
            prolog_done: false,
            complete: false,
            pulse_due: false,
            n_elements: 0,
            n_events: 0,
            pulse_interval: pulse_interval.max(1),
            chunks_since_loc_origin: 0,
            current_loc_origin: None,
            loc_origins: Vec::new(),
            data_breaks: HashMap::new(),
            dtd: None,
            sd: None,
            prolog_syntax: None,
            instance_syntax: None,
            appinfo: None,
            defaulted_entities: Vec::new(),
            defaulted_index: HashMap::new(),
            messages: Vec::new(),
            id_table: HashMap::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    pub fn arena(&self) -> &ChunkArena {
        &self.arena
    }

    #[inline]
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.arena.get(id)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The innermost open chunk.
    #[inline]
    pub fn open(&self) -> ChunkId {
        self.open
    }

    pub fn element_count(&self) -> u32 {
        self.n_elements
    }

    pub fn dtd(&self) -> Option<&Arc<Dtd>> {
        self.dtd.as_ref()
    }

    pub fn sgml_declaration(&self) -> Option<&Arc<SgmlDeclaration>> {
        self.sd.as_ref()
    }

    pub fn prolog_syntax(&self) -> Option<&Arc<Syntax>> {
        self.prolog_syntax.as_ref()
    }

    pub fn instance_syntax(&self) -> Option<&Arc<Syntax>> {
        self.instance_syntax.as_ref()
    }

    /// Fold a general name (element, attribute, id) per the instance syntax.
    pub fn general_fold(&self, name: &GroveString) -> GroveString {
        match &self.instance_syntax {
            Some(syntax) => syntax.general_fold(name),
            None => Syntax::default().general_fold(name),
        }
    }

    /// Fold an entity name per the instance syntax.
    pub fn entity_fold(&self, name: &GroveString) -> GroveString {
        match &self.instance_syntax {
            Some(syntax) => syntax.entity_fold(name),
            None => Syntax::default().entity_fold(name),
        }
    }

    /// Token separator of the instance syntax.
    pub fn space(&self) -> GroveChar {
        self.instance_syntax.as_ref().map(|s| s.space).unwrap_or(' ' as GroveChar)
    }

    /// Application info; times out until the SGML declaration arrives.
    pub fn appinfo(&self) -> AccessResult<GroveString> {
        match &self.appinfo {
            Some(text) => Ok(text.clone()),
            None if !self.complete && self.sd.is_none() => Err(Access::Timeout),
            None => Err(Access::Null),
        }
    }

    pub fn has_default_entity(&self) -> bool {
        self.dtd.as_ref().is_some_and(|dtd| dtd.default_entity.is_some())
    }

    pub fn defaulted_entities(&self) -> &[Arc<Entity>] {
        &self.defaulted_entities
    }

    pub fn lookup_defaulted_entity(&self, name: &GroveString) -> Option<&Arc<Entity>> {
        self.defaulted_index.get(name).and_then(|&i| self.defaulted_entities.get(i))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Element with the given id, falling back to a case-insensitive match.
    pub fn lookup_element(&self, id: &GroveString) -> Option<ChunkId> {
        if let Some(&chunk) = self.id_table.get(id) {
            return Some(chunk);
        }
        self.id_table
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(id))
            .map(|(_, &chunk)| chunk)
            .min()
    }

    /// Element chunks with an id, in document order.
    pub fn elements_with_id(&self) -> Vec<ChunkId> {
        let mut ids: Vec<ChunkId> = self.id_table.values().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Whether children of `parent` may still be appended.
    ///
    /// While growing this holds exactly when `parent` is on the chain of
    /// open chunks; once complete nothing more can arrive.
    pub fn maybe_more_siblings(&self, parent: ChunkId) -> bool {
        if self.complete {
            return false;
        }
        self.arena.is_ancestor(parent, self.open)
    }

    /// Whether the prolog can still gain chunks.
    pub fn prolog_open(&self) -> bool {
        !self.prolog_done && !self.complete
    }

    /// Resolve the source location of a chunk, offset by `delta` characters.
    pub fn location(&self, id: ChunkId, delta: u32) -> Location {
        let Some(chunk) = self.arena.get(id) else {
            return Location::default();
        };
        let n = self.loc_origins.partition_point(|(start, _)| *start <= id);
        let origin = n.checked_sub(1).and_then(|i| self.loc_origins.get(i)).map(|(_, o)| o.clone());
        let (base, delta) = self
            .data_breaks
            .get(&id)
            .and_then(|breaks| {
                let n = breaks.partition_point(|&(at, _)| at <= delta);
                n.checked_sub(1).and_then(|i| breaks.get(i))
            })
            .map_or((chunk.loc_index, delta), |&(at, index)| (index, delta - at));
        Location {
            origin,
            index: base.saturating_add(delta),
        }
    }

    // ========================================================================
    // Building
    // ========================================================================

    fn alloc(&mut self, kind: ChunkKind, loc_index: u32) -> ChunkId {
        self.chunks_since_loc_origin += 1;
        self.arena.push(Chunk { origin: Some(self.open), loc_index, kind })
    }

    /// Fill the append point with `id`, if there is one.
    fn attach(&mut self, id: ChunkId) {
        match self.tail.take() {
            Some(AppendPoint::NextSibling(prev)) => {
                if let Some(ChunkKind::Element(e)) = self.arena.get_mut(prev).map(|c| &mut c.kind) {
                    e.next_sibling = Some(id);
                }
            }
            Some(AppendPoint::Prolog) => self.arena.root_mut().prolog = Some(id),
            Some(AppendPoint::Epilog) => self.arena.root_mut().epilog = Some(id),
            None => {}
        }
    }

    /// Close the pending data run into a chunk.
    fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            let text = GroveString::from_chars(&pending.chars);
            let id = self.alloc(ChunkKind::Data(text), pending.loc_index);
            if !pending.breaks.is_empty() {
                self.data_breaks.insert(id, pending.breaks.into_boxed_slice());
            }
            self.attach(id);
        }
    }

    fn count_event(&mut self) {
        self.n_events = self.n_events.wrapping_add(1);
        if self.n_events % self.pulse_interval == 0 {
            self.pulse_due = true;
        }
    }

    /// Open an element under the current open chunk.
    pub(crate) fn push(&mut self, mut element: ElementChunk, loc_index: u32) -> ChunkId {
        self.flush();
        element.element_index = self.n_elements;
        self.n_elements += 1;
        let id_value = element.id.clone();
        let parent = self.open;
        let id = self.alloc(ChunkKind::Element(Box::new(element)), loc_index);
        self.open = id;

        if parent == ChunkId::ROOT && self.arena.root().document_element.is_none() {
            self.arena.root_mut().document_element = Some(id);
            self.finish_prolog();
            log::debug!(target: "grove.impl", "document element opened as {:?}", id);
        } else {
            self.attach(id);
        }

        if let Some(value) = id_value {
            self.id_table.entry(value).or_insert(id);
        }
        self.count_event();
        id
    }

    /// Close the innermost open element.
    pub(crate) fn pop(&mut self) {
        self.flush();
        let closing = self.open;
        let Some(parent) = self.arena.get(closing).and_then(|c| c.origin) else {
            log::warn!(target: "grove.impl", "end of element with no open element; ignored");
            return;
        };
        self.tail = Some(AppendPoint::NextSibling(closing));
        self.open = parent;
        if parent == ChunkId::ROOT {
            self.finish_document_element();
        }
        self.count_event();
    }

    /// Append a leaf chunk under the open chunk.
    pub(crate) fn append_sibling(&mut self, kind: ChunkKind, loc_index: u32) -> ChunkId {
        self.flush();
        let id = self.alloc(kind, loc_index);
        self.attach(id);
        self.count_event();
        id
    }

    /// Add character data, coalescing with the pending run.
    pub(crate) fn append_data_sibling(&mut self, chars: &[GroveChar], loc_index: u32) {
        match &mut self.pending {
            Some(pending) => {
                if loc_index != pending.next_loc_index() {
                    pending.breaks.push((pending.chars.len() as u32, loc_index));
                }
                pending.chars.extend_from_slice(chars);
            }
            None => {
                self.pending = Some(PendingData { loc_index, chars: chars.to_vec(), breaks: Vec::new() });
            }
        }
        self.count_event();
    }

    /// Note the source origin of the chunks that follow.
    pub(crate) fn set_loc_origin(&mut self, origin: &Arc<SourceOrigin>, restamp: u32) {
        let changed = match &self.current_loc_origin {
            Some(current) => !Arc::ptr_eq(current, origin),
            None => true,
        };
        if changed {
            // Pending data belongs to the old origin.
            self.flush();
        } else if self.chunks_since_loc_origin < restamp {
            return;
        }
        let at = self.arena.next_id();
        match self.loc_origins.last_mut() {
            Some((last, slot)) if *last == at => *slot = origin.clone(),
            _ => self.loc_origins.push((at, origin.clone())),
        }
        self.current_loc_origin = Some(origin.clone());
        self.chunks_since_loc_origin = 0;
    }

    pub(crate) fn set_dtd(&mut self, dtd: Arc<Dtd>) {
        self.dtd = Some(dtd);
        self.finish_prolog();
        self.pulse_due = true;
    }

    pub(crate) fn set_sd(&mut self, sd: Arc<SgmlDeclaration>, prolog: Arc<Syntax>, instance: Arc<Syntax>) {
        self.sd = Some(sd);
        self.prolog_syntax = Some(prolog);
        self.instance_syntax = Some(instance);
        self.pulse_due = true;
    }

    pub(crate) fn set_appinfo(&mut self, text: GroveString) {
        self.appinfo = Some(text);
    }

    pub(crate) fn add_defaulted_entity(&mut self, entity: Arc<Entity>) {
        match self.defaulted_index.get(&entity.name) {
            Some(&i) => self.defaulted_entities[i] = entity,
            None => {
                self.defaulted_index.insert(entity.name.clone(), self.defaulted_entities.len());
                self.defaulted_entities.push(entity);
            }
        }
        self.pulse_due = true;
    }

    pub(crate) fn append_message(&mut self, message: Message) {
        self.messages.push(message);
        self.pulse_due = true;
    }

    /// Enter the terminal state. Returns false if already complete.
    pub(crate) fn set_complete(&mut self) -> bool {
        if self.complete {
            return false;
        }
        self.flush();
        self.tail = None;
        self.complete = true;
        self.pulse_due = true;
        log::debug!(target: "grove.impl", "grove complete with {} chunks", self.arena.len());
        true
    }

    fn finish_prolog(&mut self) {
        if self.tail == Some(AppendPoint::Prolog) {
            self.tail = None;
        }
        if !self.prolog_done {
            self.prolog_done = true;
            log::debug!(target: "grove.impl", "prolog finished");
        }
    }

    fn finish_document_element(&mut self) {
        // Tolerate a second top-level element in erroneous documents.
        if self.arena.root().epilog.is_none() {
            self.tail = Some(AppendPoint::Epilog);
            log::debug!(target: "grove.impl", "epilog opened");
        }
    }

    #[cfg(test)]
    pub(crate) fn tail(&self) -> Option<AppendPoint> {
        self.tail
    }
}

/// One grove, shared by its builder and all of its node views.
pub struct GroveImpl {
    grove_index: u32,
    config: GroveConfig,
    state: RwLock<GroveState>,
    generation: Mutex<u64>,
    wake: Condvar,
}

impl std::fmt::Debug for GroveImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroveImpl").field("grove_index", &self.grove_index).finish_non_exhaustive()
    }
}

impl GroveImpl {
    pub(crate) fn new(grove_index: u32, config: GroveConfig) -> Arc<Self> {
        let state = GroveState::new(config.pulse_interval);
        Arc::new(Self {
            grove_index,
            config,
            state: RwLock::new(state),
            generation: Mutex::new(0),
            wake: Condvar::new(),
        })
    }

    #[inline]
    pub fn grove_index(&self) -> u32 {
        self.grove_index
    }

    #[inline]
    pub fn config(&self) -> &GroveConfig {
        &self.config
    }

    /// Shared view of the state. Hold it only for one accessor.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, GroveState> {
        self.state.read()
    }

    pub fn is_complete(&self) -> bool {
        self.state.read().complete
    }

    /// Apply one builder step, then wake readers if the step asked for it.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut GroveState) -> R) -> R {
        let (result, pulse) = {
            let mut state = self.state.write();
            let result = f(&mut state);
            (result, std::mem::take(&mut state.pulse_due))
        };
        if pulse {
            self.pulse();
        }
        result
    }

    fn pulse(&self) {
        let mut generation = self.generation.lock();
        *generation = generation.wrapping_add(1);
        self.wake.notify_all();
    }

    /// Block until the grove grows or completes, or `timeout` passes.
    ///
    /// Returns true when woken by a pulse, false when the grove is
    /// already complete or the timeout elapsed first.
    pub fn wait_for_more_nodes(&self, timeout: Duration) -> bool {
        let mut generation = self.generation.lock();
        if self.is_complete() {
            return false;
        }
        let start = *generation;
        let deadline = Instant::now() + timeout;
        while *generation == start {
            if self.wake.wait_until(&mut generation, deadline).timed_out() {
                return *generation != start;
            }
        }
        true
    }
}
