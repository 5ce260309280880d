//! Per-document highlight cache
//!
//! The highlighter is stateless; the caller owns the document. When
//! edits race, results computed from older text must not overwrite
//! newer ones. The cache keeps each line's spans with the revision of
//! the text they came from and refuses to go backwards.

use super::ruleset::RuleSet;
use super::style::Span;

/// Spans for one line and the text revision they were computed from
#[derive(Debug, Clone)]
struct CachedLine {
    revision: u64,
    spans: Vec<Span>,
}

/// Per-document highlighting cache
#[derive(Debug, Default)]
pub struct HighlightCache {
    /// Cached spans per line (None = not computed)
    lines: Vec<Option<CachedLine>>,
}

impl HighlightCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the cache has a slot for every line
    pub fn ensure_size(&mut self, line_count: usize) {
        if self.lines.len() < line_count {
            self.lines.resize(line_count, None);
        }
    }

    /// Store spans computed from `revision` of a line
    ///
    /// Returns false, keeping the cached spans, when the cache already
    /// holds a result from a newer revision.
    pub fn store(&mut self, line_idx: usize, revision: u64, spans: Vec<Span>) -> bool {
        self.ensure_size(line_idx + 1);
        let slot = &mut self.lines[line_idx];
        if let Some(cached) = slot {
            if cached.revision > revision {
                return false;
            }
        }
        *slot = Some(CachedLine { revision, spans });
        true
    }

    /// Cached spans for a line, if any
    pub fn get(&self, line_idx: usize) -> Option<&[Span]> {
        self.lines
            .get(line_idx)
            .and_then(|slot| slot.as_ref())
            .map(|cached| cached.spans.as_slice())
    }

    /// Revision the cached spans of a line were computed from
    pub fn revision(&self, line_idx: usize) -> Option<u64> {
        self.lines.get(line_idx).and_then(|slot| slot.as_ref()).map(|c| c.revision)
    }

    /// Spans for a line at `revision`, computing them on a miss
    pub fn highlight(&mut self, rules: &RuleSet, line_idx: usize, revision: u64, text: &str) -> &[Span] {
        if self.revision(line_idx) != Some(revision) {
            let spans = rules.highlight_line(text);
            self.store(line_idx, revision, spans);
        }
        self.get(line_idx).unwrap_or(&[])
    }

    /// Invalidate cache from a specific line onwards
    pub fn invalidate_from(&mut self, line_idx: usize) {
        for slot in self.lines.iter_mut().skip(line_idx) {
            *slot = None;
        }
    }

    /// Invalidate entire cache
    pub fn invalidate_all(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::builtin;
    use crate::syntax::tokens::TokenType;

    #[test]
    fn test_stale_result_is_discarded() {
        let rules = builtin::python().unwrap();
        let mut cache = HighlightCache::new();

        // Revision 2 finishes before revision 1.
        assert!(cache.store(0, 2, rules.highlight_line("# newer")));
        assert!(!cache.store(0, 1, rules.highlight_line("if older:")));

        let spans = cache.get(0).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].token, TokenType::Comment);
        assert_eq!(cache.revision(0), Some(2));
    }

    #[test]
    fn test_highlight_computes_on_miss() {
        let rules = builtin::python().unwrap();
        let mut cache = HighlightCache::new();

        assert_eq!(cache.highlight(&rules, 3, 1, "return x").len(), 1);
        assert!(cache.get(0).is_none());
        // Same revision is served from the cache even if the text differs.
        assert_eq!(cache.highlight(&rules, 3, 1, "plain").len(), 1);
        assert!(cache.highlight(&rules, 3, 2, "plain").is_empty());
    }

    #[test]
    fn test_invalidation() {
        let rules = builtin::python().unwrap();
        let mut cache = HighlightCache::new();
        for idx in 0..3 {
            cache.highlight(&rules, idx, 1, "def f(): pass");
        }

        cache.invalidate_from(1);
        assert!(cache.get(0).is_some());
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_none());

        cache.invalidate_all();
        assert!(cache.get(0).is_none());
    }
}
