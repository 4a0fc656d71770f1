//! Canonical string representation.
//!
//! A [`Str`] is an immutable, reference-counted UTF-8 buffer. The extended
//! grapheme boundaries are computed on first use and cached, so grapheme,
//! code point, UTF-16 code unit, and byte views all come from the same text.

use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone)]
pub struct Str(Rc<StrInner>);

struct StrInner {
    text: Box<str>,
    /// Byte offset of every grapheme start, followed by `text.len()`.
    bounds: OnceCell<Box<[usize]>>,
}

impl Str {
    pub fn new(text: impl Into<Box<str>>) -> Self {
        Str(Rc::new(StrInner {
            text: text.into(),
            bounds: OnceCell::new(),
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    pub fn is_empty(&self) -> bool {
        self.0.text.is_empty()
    }

    fn bounds(&self) -> &[usize] {
        self.0.bounds.get_or_init(|| {
            let text = &self.0.text;
            let mut bounds: Vec<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
            bounds.push(text.len());
            bounds.into_boxed_slice()
        })
    }

    // ── Grapheme view ───────────────────────────────────────────────

    pub fn grapheme_len(&self) -> usize {
        self.bounds().len() - 1
    }

    pub fn grapheme(&self, index: usize) -> Option<&str> {
        if index >= self.grapheme_len() {
            return None;
        }
        let bounds = self.bounds();
        Some(&self.0.text[bounds[index]..bounds[index + 1]])
    }

    pub fn graphemes(&self) -> impl Iterator<Item = &str> + '_ {
        self.bounds()
            .windows(2)
            .map(move |w| &self.0.text[w[0]..w[1]])
    }

    /// Substring by grapheme index, end exclusive. Bounds past the end clamp
    /// to the length; `begin >= end` yields an empty string.
    pub fn grapheme_slice(&self, begin: usize, end: usize) -> &str {
        let len = self.grapheme_len();
        let end = end.min(len);
        if begin >= end {
            return "";
        }
        let bounds = self.bounds();
        &self.0.text[bounds[begin]..bounds[end]]
    }

    /// Grapheme index of the first occurrence of `search` at or after
    /// `from`. Matches are whole-grapheme: a search text only matches where
    /// its grapheme sequence lines up with this string's.
    pub fn grapheme_index_of(&self, search: &Str, from: usize) -> Option<usize> {
        let len = self.grapheme_len();
        if search.is_empty() {
            return Some(from.min(len));
        }
        if from >= len {
            return None;
        }
        let needle: Vec<&str> = search.graphemes().collect();
        if needle.len() > len {
            return None;
        }
        (from..=len - needle.len()).find(|&start| {
            needle
                .iter()
                .enumerate()
                .all(|(k, g)| self.grapheme(start + k) == Some(*g))
        })
    }

    // ── Code point view ─────────────────────────────────────────────

    pub fn chars(&self) -> std::str::Chars<'_> {
        self.0.text.chars()
    }

    // ── UTF-16 view ─────────────────────────────────────────────────

    pub fn utf16_units(&self) -> Vec<u16> {
        self.0.text.encode_utf16().collect()
    }

    pub fn code_unit_at(&self, index: usize) -> Option<u16> {
        self.0.text.encode_utf16().nth(index)
    }

    /// Code point starting at UTF-16 index `index`. A surrogate pair is
    /// combined; an index landing on the trailing half yields that unit.
    pub fn code_point_at(&self, index: usize) -> Option<u32> {
        let mut units = self.0.text.encode_utf16().skip(index);
        let first = units.next()?;
        if (0xD800..0xDC00).contains(&first) {
            if let Some(second) = units.next() {
                if (0xDC00..0xE000).contains(&second) {
                    let hi = u32::from(first - 0xD800);
                    let lo = u32::from(second - 0xDC00);
                    return Some(0x10000 + (hi << 10) + lo);
                }
            }
        }
        Some(u32::from(first))
    }

    // ── Byte view ───────────────────────────────────────────────────

    pub fn bytes(&self) -> &[u8] {
        self.0.text.as_bytes()
    }
}

impl From<&str> for Str {
    fn from(s: &str) -> Self {
        Str::new(s)
    }
}

impl From<String> for Str {
    fn from(s: String) -> Self {
        Str::new(s)
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.text == other.0.text
    }
}

impl Eq for Str {}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0.text, f)
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grapheme_view() {
        // family emoji is one cluster made of several code points
        let s = Str::from("a👨‍👩‍👧b");
        assert_eq!(s.grapheme_len(), 3);
        assert_eq!(s.grapheme(1), Some("👨‍👩‍👧"));
        assert_eq!(s.grapheme(3), None);
        assert_eq!(s.graphemes().collect::<Vec<_>>(), vec!["a", "👨‍👩‍👧", "b"]);
        assert_eq!(s.chars().count(), 7);
    }

    #[test]
    fn test_empty() {
        let s = Str::from("");
        assert_eq!(s.grapheme_len(), 0);
        assert_eq!(s.grapheme(0), None);
        assert_eq!(s.graphemes().count(), 0);
        assert_eq!(s.grapheme_slice(0, 5), "");
    }

    #[test]
    fn test_grapheme_slice() {
        let s = Str::from("héllo");
        assert_eq!(s.grapheme_slice(0, 2), "hé");
        assert_eq!(s.grapheme_slice(3, 100), "lo");
        assert_eq!(s.grapheme_slice(4, 2), "");
    }

    #[test]
    fn test_grapheme_index_of() {
        let s = Str::from("abcabc");
        let b = Str::from("b");
        assert_eq!(s.grapheme_index_of(&b, 0), Some(1));
        assert_eq!(s.grapheme_index_of(&b, 2), Some(4));
        assert_eq!(s.grapheme_index_of(&b, 5), None);
        assert_eq!(s.grapheme_index_of(&Str::from(""), 3), Some(3));
        assert_eq!(s.grapheme_index_of(&Str::from(""), 9), Some(6));
        assert_eq!(s.grapheme_index_of(&Str::from("cab"), 0), Some(2));
        assert_eq!(s.grapheme_index_of(&Str::from("abcabcd"), 0), None);
    }

    #[test]
    fn test_index_of_respects_cluster_boundaries() {
        // "e" + combining acute is a single cluster; a bare "e" must not match it
        let s = Str::from("e\u{301}x");
        assert_eq!(s.grapheme_index_of(&Str::from("e"), 0), None);
        assert_eq!(s.grapheme_index_of(&Str::from("x"), 0), Some(1));
    }

    #[test]
    fn test_utf16_view() {
        let s = Str::from("a😀");
        assert_eq!(s.utf16_units(), vec![0x61, 0xD83D, 0xDE00]);
        assert_eq!(s.code_unit_at(1), Some(0xD83D));
        assert_eq!(s.code_unit_at(3), None);
        assert_eq!(s.code_point_at(1), Some(0x1F600));
        assert_eq!(s.code_point_at(2), Some(0xDE00));
        assert_eq!(s.code_point_at(3), None);
    }

    #[test]
    fn test_bytes_round_trip() {
        let s = Str::from("日本語 ok");
        assert_eq!(std::str::from_utf8(s.bytes()).ok(), Some("日本語 ok"));
    }

    #[test]
    fn test_eq() {
        assert_eq!(Str::from("abc"), Str::from(String::from("abc")));
        assert_ne!(Str::from("abc"), Str::from("abd"));
    }
}
