//! Tensor-shaped data that flows between the preprocessor, the inference
//! engine and the span decoder.
//!
//! The layouts mirror the BiDAF graph inputs: words as an `(N, 1)` column
//! of lower-cased tokens, characters as an `(N, 1, 1, W)` grid of
//! single-character strings padded with `""`.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Character slots per token expected by the published BiDAF model.
pub const DEFAULT_CHAR_WIDTH: usize = 16;

/// Lower-cased word tokens, shape `(N, 1)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordTensor {
    words: Vec<String>,
}

impl WordTensor {
    /// Lower-case every token, preserving order.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self {
            words: tokens.iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.words.len(), 1]
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Fixed-width per-token character slots, shape `(N, 1, 1, W)`.
///
/// Stored row-major: row `i` occupies `cells[i * W..(i + 1) * W]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharTensor {
    rows: usize,
    width: usize,
    cells: Vec<String>,
}

impl CharTensor {
    /// Encode each token as its first `width` characters, right-padded
    /// with empty strings. Characters keep their original case.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], width: usize) -> Self {
        let mut cells = Vec::with_capacity(tokens.len() * width);
        for token in tokens {
            let mut filled = 0;
            for c in token.as_ref().chars().take(width) {
                cells.push(c.to_string());
                filled += 1;
            }
            cells.extend(std::iter::repeat(String::new()).take(width - filled));
        }
        Self {
            rows: tokens.len(),
            width,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn shape(&self) -> [usize; 4] {
        [self.rows, 1, 1, self.width]
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        if index >= self.rows {
            return None;
        }
        Some(&self.cells[index * self.width..(index + 1) * self.width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        (0..self.rows).map(move |i| &self.cells[i * self.width..(i + 1) * self.width])
    }

    /// Flat row-major cells, ready to reshape into `(N, 1, 1, W)`.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// One preprocessed piece of text: the raw tokens and both tensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub tokens: Vec<String>,
    pub words: WordTensor,
    pub chars: CharTensor,
}

impl EncodedText {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Label → answer mapping in target order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    entries: Vec<(String, String)>,
}

impl Answers {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Record an answer. A repeated label replaces the earlier answer in place.
    pub fn insert(&mut self, label: &str, answer: String) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some(entry) => entry.1 = answer,
            None => self.entries.push((label.to_string(), answer)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, a)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, a)| (l.as_str(), a.as_str()))
    }
}

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, answer) in &self.entries {
            map.serialize_entry(label, answer)?;
        }
        map.end()
    }
}
