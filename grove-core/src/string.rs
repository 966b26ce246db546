//! Code-point strings shared between chunks and node views.
//!
//! A [`GroveString`] never copies: it is a window `(buffer, offset, len)`
//! onto a reference-counted code-point buffer. Character-data chunks hand
//! out windows onto their own buffer, so a data node at index `i` and the
//! chunk it lives in share storage.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A single SGML character (a code point in the document character set).
pub type GroveChar = u32;

/// A zero-copy view of a run of code points.
#[derive(Clone, Default)]
pub struct GroveString {
    buf: Option<Arc<[GroveChar]>>,
    offset: u32,
    len: u32,
}

impl GroveString {
    /// An empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// View the whole of `buf`.
    pub fn from_buffer(buf: Arc<[GroveChar]>) -> Self {
        let len = buf.len() as u32;
        GroveString { buf: Some(buf), offset: 0, len }
    }

    /// Copy code points into a fresh buffer.
    pub fn from_chars(chars: &[GroveChar]) -> Self {
        if chars.is_empty() {
            return Self::new();
        }
        Self::from_buffer(Arc::from(chars))
    }

    /// One-character string.
    pub fn from_char(c: GroveChar) -> Self {
        Self::from_chars(&[c])
    }

    /// Length in code points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The viewed code points.
    #[inline]
    pub fn as_chars(&self) -> &[GroveChar] {
        match &self.buf {
            Some(buf) => &buf[self.offset as usize..(self.offset + self.len) as usize],
            None => &[],
        }
    }

    /// Character at `index`, if in range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<GroveChar> {
        self.as_chars().get(index).copied()
    }

    /// A narrower view sharing the same buffer.
    ///
    /// `start` and `end` are clamped to the current view.
    pub fn slice(&self, start: usize, end: usize) -> GroveString {
        let end = end.min(self.len());
        let start = start.min(end);
        GroveString {
            buf: self.buf.clone(),
            offset: self.offset + start as u32,
            len: (end - start) as u32,
        }
    }

    /// Drop the first `n` code points.
    pub fn skip(&self, n: usize) -> GroveString {
        self.slice(n, self.len())
    }

    /// Whether both views share a buffer (not just equal contents).
    pub fn shares_buffer(&self, other: &GroveString) -> bool {
        match (&self.buf, &other.buf) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Compare against a Rust string, code point by code point.
    pub fn eq_str(&self, s: &str) -> bool {
        self.as_chars().iter().copied().eq(s.chars().map(|c| c as GroveChar))
    }

    /// Render as a Rust string, replacing code points that are not
    /// Unicode scalar values.
    pub fn to_string_lossy(&self) -> String {
        self.as_chars()
            .iter()
            .map(|&c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    /// ASCII upper-case copy, used for general name-case folding.
    pub fn to_ascii_uppercase(&self) -> GroveString {
        let folded: Vec<GroveChar> = self
            .as_chars()
            .iter()
            .map(|&c| if (b'a' as u32..=b'z' as u32).contains(&c) { c - 32 } else { c })
            .collect();
        GroveString::from_chars(&folded)
    }

    /// Case-insensitive (ASCII) comparison.
    pub fn eq_ignore_ascii_case(&self, other: &GroveString) -> bool {
        self.len == other.len && self.to_ascii_uppercase() == other.to_ascii_uppercase()
    }
}

impl PartialEq for GroveString {
    fn eq(&self, other: &Self) -> bool {
        self.as_chars() == other.as_chars()
    }
}

impl Eq for GroveString {}

impl Hash for GroveString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_chars().hash(state);
    }
}

impl From<&str> for GroveString {
    fn from(s: &str) -> Self {
        let chars: Vec<GroveChar> = s.chars().map(|c| c as GroveChar).collect();
        GroveString::from_chars(&chars)
    }
}

impl From<String> for GroveString {
    fn from(s: String) -> Self {
        GroveString::from(s.as_str())
    }
}

impl fmt::Debug for GroveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl fmt::Display for GroveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// An immutable, shareable list of strings.
///
/// `rest()` returns a view over the same storage, mirroring cons-style
/// node lists.
#[derive(Clone)]
pub struct GroveStringList {
    items: Arc<[GroveString]>,
    start: usize,
}

impl GroveStringList {
    pub fn new(items: Vec<GroveString>) -> Self {
        GroveStringList { items: items.into(), start: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&GroveString> {
        self.items.get(self.start)
    }

    /// Everything after the first entry; `None` when already empty.
    pub fn rest(&self) -> Option<GroveStringList> {
        if self.is_empty() {
            return None;
        }
        Some(GroveStringList { items: self.items.clone(), start: self.start + 1 })
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroveString> {
        self.items[self.start..].iter()
    }
}

impl Default for GroveStringList {
    fn default() -> Self {
        GroveStringList::new(Vec::new())
    }
}

impl PartialEq for GroveStringList {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for GroveStringList {}

impl fmt::Debug for GroveStringList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<GroveString> for GroveStringList {
    fn from_iter<I: IntoIterator<Item = GroveString>>(iter: I) -> Self {
        GroveStringList::new(iter.into_iter().collect())
    }
}
