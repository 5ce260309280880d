//! Line highlighter
//!
//! `highlight_line` is a pure function of a line and a rule set. It
//! keeps no state between calls, so any thread may call it for any line.

use std::ops::Range;

use tracing::debug;

use super::rules::StyleRule;
use super::ruleset::{OverlayPolicy, RuleSet};
use super::style::Span;

/// A match found by one rule, in byte offsets
struct RawMatch {
    range: Range<usize>,
    rule: usize,
}

/// Maps regex byte offsets onto char offsets
struct CharOffsets {
    /// Byte offset of every char; empty for ASCII lines
    starts: Vec<usize>,
    char_count: usize,
}

impl CharOffsets {
    fn new(line: &str) -> Self {
        if line.is_ascii() {
            return Self {
                starts: Vec::new(),
                char_count: line.len(),
            };
        }
        let starts: Vec<usize> = line.char_indices().map(|(b, _)| b).collect();
        Self {
            char_count: starts.len(),
            starts,
        }
    }

    /// Char index of a byte offset on a char boundary (or the line end)
    fn char_at(&self, byte: usize) -> usize {
        if self.starts.is_empty() {
            byte
        } else {
            self.starts.partition_point(|&b| b < byte)
        }
    }
}

/// Highlight a single line with an ordered rule set
///
/// Rules run in order. Each rule scans the line forward, resuming right
/// after its previous match. A rule that yields an empty match is
/// abandoned for the rest of the line.
pub fn highlight_line(line: &str, rules: &RuleSet) -> Vec<Span> {
    if line.is_empty() || rules.is_empty() {
        return Vec::new();
    }

    let resolve = rules.policy() == OverlayPolicy::Resolved;
    let mut matches: Vec<RawMatch> = Vec::new();
    let mut masks: Vec<Range<usize>> = Vec::new();

    for (idx, rule) in rules.rules().iter().enumerate() {
        let first = matches.len();
        let active_masks: &[Range<usize>] = if resolve { &masks } else { &[] };
        for range in scan_rule(rule, line, active_masks) {
            matches.push(RawMatch { range, rule: idx });
        }
        if resolve && rule.masks_later {
            masks.extend(matches[first..].iter().map(|m| m.range.clone()));
        }
    }

    let offsets = CharOffsets::new(line);
    match rules.policy() {
        OverlayPolicy::Layered => layered_spans(&matches, rules.rules(), &offsets),
        OverlayPolicy::Resolved => resolved_spans(&matches, rules.rules(), &offsets),
    }
}

/// All non-overlapping matches of one rule, skipping masked starts
fn scan_rule(rule: &StyleRule, line: &str, masks: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < line.len() {
        let Some(m) = rule.find_at(line, pos) else {
            break;
        };
        if m.start() == m.end() {
            debug!(rule = %rule.name, offset = m.start(), "zero-width match, skipping rest of line");
            break;
        }
        if let Some(mask) = masks.iter().find(|r| r.contains(&m.start())) {
            // mask.end > m.start() >= pos, so the scan always advances
            pos = mask.end;
            continue;
        }
        found.push(m.start()..m.end());
        pos = m.end();
    }
    found
}

fn layered_spans(matches: &[RawMatch], rules: &[StyleRule], offsets: &CharOffsets) -> Vec<Span> {
    matches
        .iter()
        .map(|m| {
            let rule = &rules[m.rule];
            let start = offsets.char_at(m.range.start);
            let end = offsets.char_at(m.range.end);
            Span::new(start, end - start, rule.token, rule.style)
        })
        .collect()
}

/// Paint matches in order onto a per-char owner table, then read back runs
fn resolved_spans(matches: &[RawMatch], rules: &[StyleRule], offsets: &CharOffsets) -> Vec<Span> {
    let mut owner: Vec<Option<usize>> = vec![None; offsets.char_count];
    for (idx, m) in matches.iter().enumerate() {
        let start = offsets.char_at(m.range.start);
        let end = offsets.char_at(m.range.end);
        for slot in &mut owner[start..end] {
            *slot = Some(idx);
        }
    }

    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < owner.len() {
        let Some(idx) = owner[pos] else {
            pos += 1;
            continue;
        };
        let run_end = owner[pos..]
            .iter()
            .position(|o| *o != Some(idx))
            .map_or(owner.len(), |n| pos + n);
        let rule = &rules[matches[idx].rule];
        spans.push(Span::new(pos, run_end - pos, rule.token, rule.style));
        pos = run_end;
    }
    spans
}
