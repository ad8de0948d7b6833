//! The coreference-chain parser: a streaming bracket-matching automaton
//! over per-token coref fields.
//!
//! # Field grammar
//!
//! A token's coref field is a `|`-joined list of sub-annotations, each one
//! of:
//!
//! | form | meaning |
//! |------|---------|
//! | `(5)` | **full mention**: a chain opens and closes at this token |
//! | `(5`  | **opening marker** for chain 5 |
//! | `5)`  | **closing marker** for chain 5 |
//! | `-` (or anything else) | no mention activity |
//!
//! [`lex_coref_field`] turns a field into typed [`CorefEvent`]s; the
//! extraction pass then dispatches each token into exactly one category:
//! a whole-field full mention, an opening field, a closing field, or
//! nothing. A field mixing opening and closing markers is handled only by
//! the opening branch — its closes are never processed.
//!
//! # Matching
//!
//! One stack of `(chain id, start token)` pairs is shared across the whole
//! sentence rather than kept per chain: a closing marker first tries the
//! stack top (the common, properly nested case) and otherwise scans from
//! the bottom for the oldest entry with its chain id. The id match is what
//! resolves crossing spans, where chains close out of LIFO order. A close
//! with no matching entry is dropped with a warning.
//!
//! # Example
//!
//! ```rust
//! use corefex::{extract_sentence_mentions, Mention, Sentence, Token};
//!
//! // "John saw Mary" with chain 0 spanning all three tokens and
//! // chain 1 on the single token "Mary".
//! let sentence = Sentence::from_tokens(vec![
//!     (1, Token::new("John", "NNP", "*", "*", "(0")),
//!     (2, Token::new("saw", "VBD", "*", "*", "-")),
//!     (3, Token::new("Mary", "NNP", "*", "*", "0)|(1)")),
//! ]);
//! let mentions = extract_sentence_mentions(0, &sentence);
//! assert_eq!(
//!     mentions,
//!     vec![Mention::new(0, 1, 3, 0), Mention::new(0, 3, 3, 1)]
//! );
//! ```

use crate::corpus::{Part, Sentence};
use crate::mention::{Chain, Mention};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Lexer
// =============================================================================

/// One typed sub-annotation of a coref field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorefEvent {
    /// `(5)` — a single-token mention of the chain.
    Full(u64),
    /// `(5` — the chain's span starts at this token.
    Open(u64),
    /// `5)` — the chain's span ends at this token.
    Close(u64),
}

impl CorefEvent {
    /// The chain id the event refers to.
    #[must_use]
    pub fn chain(&self) -> u64 {
        match *self {
            CorefEvent::Full(id) | CorefEvent::Open(id) | CorefEvent::Close(id) => id,
        }
    }
}

/// Lex a coref field into its typed events, in field order.
///
/// Sub-annotations outside the grammar (including the inert `-`) produce
/// no event.
#[must_use]
pub fn lex_coref_field(field: &str) -> Vec<CorefEvent> {
    field.split('|').filter_map(classify_subannotation).collect()
}

fn classify_subannotation(sub: &str) -> Option<CorefEvent> {
    let opens = sub.starts_with('(');
    let closes = sub.ends_with(')');
    // Both brackets are single bytes, so the slice bounds stay on char
    // boundaries even for non-ASCII junk.
    let digits = sub.get(opens as usize..sub.len() - closes as usize)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let id: u64 = digits.parse().ok()?;
    match (opens, closes) {
        (true, true) => Some(CorefEvent::Full(id)),
        (true, false) => Some(CorefEvent::Open(id)),
        (false, true) => Some(CorefEvent::Close(id)),
        (false, false) => None,
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract the mentions of one sentence, sorted by `(start, end)`.
///
/// The open-bracket stack is local to this call; it must never be carried
/// across sentences.
#[must_use]
pub fn extract_sentence_mentions(sentence_index: usize, sentence: &Sentence) -> Vec<Mention> {
    scan_sentence(sentence_index, sentence).0
}

/// Extract the mentions of every sentence in a part, concatenated in
/// sentence order and sorted by `(sentence, start, end)`.
///
/// Ties keep emission order (the sort is stable). Unmatched closing
/// markers are dropped with a `log::warn!` each and a part-level summary;
/// they never halt extraction.
#[must_use]
pub fn extract_mentions(part: &Part) -> Vec<Mention> {
    let mut mentions = Vec::new();
    let mut unmatched = 0;
    for (index, sentence) in part.sentences().iter().enumerate() {
        let (found, dropped) = scan_sentence(index, sentence);
        mentions.extend(found);
        unmatched += dropped;
    }
    if unmatched > 0 {
        log::debug!(
            "dropped {} unmatched closing bracket(s) across {} sentence(s)",
            unmatched,
            part.len()
        );
    }
    mentions.sort_by_key(Mention::span_key);
    mentions
}

fn scan_sentence(sentence_index: usize, sentence: &Sentence) -> (Vec<Mention>, usize) {
    let mut open_starts: Vec<(u64, usize)> = Vec::new();
    let mut mentions: Vec<Mention> = Vec::new();
    let mut unmatched = 0usize;

    for (&index, token) in sentence.tokens() {
        let field = token.coref.as_str();
        let events = lex_coref_field(field);
        if events.is_empty() {
            continue;
        }

        let whole_field_full =
            !field.contains('|') && matches!(events.as_slice(), [CorefEvent::Full(_)]);
        let has_open = events.iter().any(|e| matches!(e, CorefEvent::Open(_)));
        let has_close = events.iter().any(|e| matches!(e, CorefEvent::Close(_)));

        if whole_field_full {
            mentions.push(Mention::new(sentence_index, index, index, events[0].chain()));
        } else if has_open {
            // Embedded full mentions first, then the pushes, each in field
            // order. Closing markers in the same field are never processed.
            for event in &events {
                if let CorefEvent::Full(chain) = event {
                    mentions.push(Mention::new(sentence_index, index, index, *chain));
                }
            }
            for event in &events {
                if let CorefEvent::Open(chain) = event {
                    open_starts.push((*chain, index));
                }
            }
        } else if has_close {
            for event in &events {
                if let CorefEvent::Full(chain) = event {
                    mentions.push(Mention::new(sentence_index, index, index, *chain));
                }
            }
            for event in &events {
                let CorefEvent::Close(chain) = *event else {
                    continue;
                };
                if let Some(start) = pop_matching_start(&mut open_starts, chain) {
                    mentions.push(Mention::new(sentence_index, start, index, chain));
                } else {
                    unmatched += 1;
                    log::warn!(
                        "unmatched closing bracket for chain {} at sentence {} token {}",
                        chain,
                        sentence_index,
                        index
                    );
                }
            }
        }
        // A full-mention pattern embedded in an otherwise inert field
        // matches no category and emits nothing.
    }

    mentions.sort_by_key(Mention::span_key);
    (mentions, unmatched)
}

/// Remove and return the start token of the open entry a close for `chain`
/// matches, if any.
fn pop_matching_start(open_starts: &mut Vec<(u64, usize)>, chain: u64) -> Option<usize> {
    // LIFO fast path: the close matches the most recent open.
    if let Some(&(top, start)) = open_starts.last() {
        if top == chain {
            open_starts.pop();
            return Some(start);
        }
    }
    // Crossing brackets: match by chain id, oldest entry first.
    let position = open_starts.iter().position(|&(id, _)| id == chain)?;
    Some(open_starts.remove(position).1)
}

// =============================================================================
// Chain grouping
// =============================================================================

/// Group extracted mentions into chains, ordered by first appearance.
///
/// Builds a fresh output from a snapshot of the input; the mention slice
/// is never mutated.
#[must_use]
pub fn group_chains(mentions: &[Mention]) -> Vec<Chain> {
    let mut order: Vec<u64> = Vec::new();
    let mut buckets: HashMap<u64, Vec<Mention>> = HashMap::new();
    for mention in mentions {
        let bucket = buckets.entry(mention.chain).or_default();
        if bucket.is_empty() {
            order.push(mention.chain);
        }
        bucket.push(*mention);
    }
    order
        .into_iter()
        .map(|id| Chain::new(id, buckets.remove(&id).unwrap_or_default()))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
