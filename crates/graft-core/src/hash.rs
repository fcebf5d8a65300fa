//! Content hashing for cache keys.
//!
//! A [`ContentHash`] is a SHA-256 digest identifying the content of one
//! computed value: two plugs with equal digests are cache-equivalent and
//! share the stored object. Nodes build digests through a [`ContentHasher`],
//! appending everything that determines their result (input hashes, consulted
//! context variables), or replacing the accumulated state wholesale with
//! another plug's digest to declare a pure passthrough.

use sha2::{Digest, Sha256};
use std::fmt;

/// A 256-bit content digest identifying a computed value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// The all-zero digest.
    #[inline]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Creates a digest from a raw byte array.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw byte array.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 4 bytes in hex for readability
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}…",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Accumulates the content that determines one computed value.
///
/// Every append is length-prefixed, so adjacent appends cannot run together
/// (`append(b"ab")` then `append(b"c")` differs from `append(b"a")` then
/// `append(b"bc")`).
#[derive(Clone)]
pub struct ContentHasher {
    state: Sha256,
    replaced: Option<ContentHash>,
}

impl ContentHasher {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self {
            state: Sha256::new(),
            replaced: None,
        }
    }

    /// Appends raw bytes, length-prefixed.
    pub fn append(&mut self, bytes: &[u8]) {
        if let Some(h) = self.replaced.take() {
            // Appending after a replacement resumes from the replaced digest.
            self.state = Sha256::new();
            self.state.update(h.0);
        }
        self.state.update((bytes.len() as u64).to_le_bytes());
        self.state.update(bytes);
    }

    /// Appends a string's UTF-8 bytes.
    pub fn append_str(&mut self, s: &str) {
        self.append(s.as_bytes());
    }

    /// Appends a `u64`.
    pub fn append_u64(&mut self, v: u64) {
        self.append(&v.to_le_bytes());
    }

    /// Appends an `i32`.
    pub fn append_i32(&mut self, v: i32) {
        self.append(&v.to_le_bytes());
    }

    /// Appends an `f32` by bit pattern.
    pub fn append_f32(&mut self, v: f32) {
        self.append(&v.to_bits().to_le_bytes());
    }

    /// Appends an `f64` by bit pattern.
    pub fn append_f64(&mut self, v: f64) {
        self.append(&v.to_bits().to_le_bytes());
    }

    /// Appends a `bool`.
    pub fn append_bool(&mut self, v: bool) {
        self.append(&[v as u8]);
    }

    /// Appends another digest.
    pub fn append_hash(&mut self, h: &ContentHash) {
        self.append(&h.0);
    }

    /// Discards everything accumulated so far and pins the result to `hash`.
    ///
    /// Declares a pure passthrough: [`ContentHasher::finish`] returns `hash`
    /// exactly, making this value cache-equivalent to the one `hash` came
    /// from. A subsequent append lifts the pin and resumes from the digest.
    pub fn replace(&mut self, hash: ContentHash) {
        self.state = Sha256::new();
        self.replaced = Some(hash);
    }

    /// Finalizes the accumulated content into a digest.
    pub fn finish(self) -> ContentHash {
        match self.replaced {
            Some(h) => h,
            None => ContentHash(self.state.finalize().into()),
        }
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let mut a = ContentHasher::new();
        a.append_str("frame");
        a.append_f64(24.0);
        let mut b = ContentHasher::new();
        b.append_str("frame");
        b.append_f64(24.0);
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn test_length_prefix_separates_appends() {
        let mut a = ContentHasher::new();
        a.append(b"ab");
        a.append(b"c");
        let mut b = ContentHasher::new();
        b.append(b"a");
        b.append(b"bc");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn test_empty_differs_from_nonempty() {
        let empty = ContentHasher::new().finish();
        let mut h = ContentHasher::new();
        h.append(b"");
        assert_ne!(empty, h.finish());
    }

    #[test]
    fn test_replace_pins_result() {
        let mut upstream = ContentHasher::new();
        upstream.append_str("source");
        let source = upstream.finish();

        let mut h = ContentHasher::new();
        h.append_str("ignored");
        h.replace(source);
        assert_eq!(h.finish(), source);
    }

    #[test]
    fn test_append_after_replace_resumes() {
        let mut upstream = ContentHasher::new();
        upstream.append_str("source");
        let source = upstream.finish();

        let mut h = ContentHasher::new();
        h.replace(source);
        h.append_u64(1);
        let resumed = h.finish();
        assert_ne!(resumed, source);

        // Resuming is itself deterministic.
        let mut h2 = ContentHasher::new();
        h2.replace(source);
        h2.append_u64(1);
        assert_eq!(resumed, h2.finish());
    }

    #[test]
    fn test_display_short_form() {
        let h = ContentHash::from_bytes([0xab; 32]);
        assert_eq!(h.to_string(), "abababab…");
    }

    #[test]
    fn test_zero() {
        assert_eq!(ContentHash::zero().as_bytes(), &[0u8; 32]);
    }
}
