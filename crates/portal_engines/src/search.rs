#![forbid(unsafe_code)]

use unicode_normalization::UnicodeNormalization;

/// NFKC-normalised, lowercased form used for substring matching.
pub fn fold(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

/// Case-insensitive substring matcher over one or more candidate strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    folded: String,
}

impl TextQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            folded: fold(raw.trim()),
        }
    }

    /// An empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.is_empty() || fold(candidate).contains(&self.folded)
    }

    pub fn matches_any<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.is_empty() || candidates.into_iter().any(|c| self.matches(c))
    }
}
