//! Colon-delimited action arguments.

use smallvec::SmallVec;
use std::ops::Range;
use tracing::trace;

use crate::MAX_OPTIONS;

/// Arguments of one binding: the owned source text plus byte ranges into it.
///
/// At most `MAX_OPTIONS - 1` segments are kept. Empty segments are real (empty) options;
/// only an absent or empty source yields an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    raw: String,
    spans: SmallVec<[Range<usize>; 4]>,
}

impl OptionList {
    pub fn parse(source: Option<&str>) -> Self {
        let Some(raw) = source.filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        let mut spans = SmallVec::new();
        let mut start = 0;
        for piece in raw.split(':') {
            if spans.len() == MAX_OPTIONS - 1 {
                trace!(target: "actions.table", kept = spans.len(), "options_truncated");
                break;
            }
            spans.push(start..start + piece.len());
            start += piece.len() + 1;
        }
        Self {
            raw: raw.to_string(),
            spans,
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.spans.get(index).map(|r| &self.raw[r.clone()])
    }

    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans.iter().map(|r| &self.raw[r.clone()])
    }

    /// Source text as given (including any dropped tail).
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}
