//! Coreference mentions and their materialized records.
//!
//! # Terminology
//!
//! - **Mention**: a contiguous token span within one sentence that belongs
//!   to exactly one chain
//! - **Chain**: the set of mentions referring to the same entity,
//!   identified by an integer id
//! - **Singleton**: a chain with only one mention
//!
//! Mentions are token-indexed, non-owning views into a [`Part`]: they
//! reference a sentence by index and must be recomputed if the source
//! sentence changes. [`materialize_mention`] resolves a mention against its
//! part into a human-readable [`MentionRecord`].

use crate::corpus::Part;
use crate::tree::Tree;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Mention
// =============================================================================

/// A contiguous token span belonging to a coreference chain.
///
/// `start` and `end` are inclusive 1-based token indices within the
/// sentence, `start <= end`. Mentions of different chains may overlap.
/// The canonical ordering is `(sentence, start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mention {
    /// 0-based sentence index within the owning part.
    pub sentence: usize,
    /// First token index of the span (inclusive).
    pub start: usize,
    /// Last token index of the span (inclusive).
    pub end: usize,
    /// Id of the chain this mention belongs to.
    pub chain: u64,
}

impl Mention {
    /// Create a new mention.
    #[must_use]
    pub fn new(sentence: usize, start: usize, end: usize, chain: u64) -> Self {
        Self {
            sentence,
            start,
            end,
            chain,
        }
    }

    /// Number of tokens covered by the span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// A mention span is never empty; provided for container symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this span covers a single token.
    #[must_use]
    pub fn is_single_token(&self) -> bool {
        self.start == self.end
    }

    /// Whether two mentions share at least one token of the same sentence.
    #[must_use]
    pub fn overlaps(&self, other: &Mention) -> bool {
        self.sentence == other.sentence && self.start <= other.end && other.start <= self.end
    }

    /// The canonical sort key `(sentence, start, end)`.
    #[must_use]
    pub fn span_key(&self) -> (usize, usize, usize) {
        (self.sentence, self.start, self.end)
    }
}

impl std::fmt::Display for Mention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sentence {} tokens {}-{} (chain {})",
            self.sentence, self.start, self.end, self.chain
        )
    }
}

// =============================================================================
// Chain
// =============================================================================

/// A coreference chain: all extracted mentions sharing one chain id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// The chain id shared by every mention below.
    pub id: u64,
    /// Mentions in canonical `(sentence, start, end)` order.
    pub mentions: Vec<Mention>,
}

impl Chain {
    /// Create a chain from mentions that already share `id`.
    ///
    /// Mentions are sorted into canonical order.
    #[must_use]
    pub fn new(id: u64, mut mentions: Vec<Mention>) -> Self {
        mentions.sort_by_key(Mention::span_key);
        Self { id, mentions }
    }

    /// Number of mentions in this chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// Whether the chain has no mentions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Whether the entity is mentioned only once.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.mentions.len() == 1
    }

    /// The first mention in canonical order.
    #[must_use]
    pub fn first(&self) -> Option<&Mention> {
        self.mentions.first()
    }
}

// =============================================================================
// MentionRecord
// =============================================================================

/// A materialized mention: the human-readable projection of a [`Mention`]
/// against its owning part.
///
/// Borrows the sentence tree (no copy) and is therefore serialize-only;
/// it does not mutate the part it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentionRecord<'a> {
    /// 0-based sentence index within the owning part.
    pub sentence: usize,
    /// First token index of the span (inclusive).
    pub start: usize,
    /// Last token index of the span (inclusive).
    pub end: usize,
    /// Space-joined surface words of the span.
    pub text: String,
    /// Space-joined part-of-speech tags of the span.
    pub pos: String,
    /// Concatenated entity-type annotations of the span, stripped of the
    /// `(`, `)`, and `*` span-boundary characters.
    pub entity_type: String,
    /// Id of the chain the mention belongs to.
    pub chain: u64,
    /// The owning sentence's parse tree, when reconstruction has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<&'a Tree>,
}

impl MentionRecord<'_> {
    /// Pretty-printed JSON dump of the record.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for MentionRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\"{}\" [sentence {} tokens {}-{}, chain {}]",
            self.text, self.sentence, self.start, self.end, self.chain
        )
    }
}

/// Materialize a mention against its owning part.
///
/// Walks the span's tokens in index order, space-joining words and POS
/// tags and concatenating entity-type annotations (bracket characters
/// stripped). Fails with [`Error::SentenceOutOfRange`] or
/// [`Error::TokenOutOfRange`] if the span references data the part does
/// not have.
pub fn materialize_mention<'a>(mention: &Mention, part: &'a Part) -> Result<MentionRecord<'a>> {
    let sentence = part.get(mention.sentence).ok_or(Error::SentenceOutOfRange {
        sentence: mention.sentence,
    })?;

    let mut text = String::new();
    let mut pos = String::new();
    let mut entity_type = String::new();
    for index in mention.start..=mention.end {
        let token = sentence.token(index).ok_or(Error::TokenOutOfRange {
            sentence: mention.sentence,
            index,
        })?;
        if !text.is_empty() {
            text.push(' ');
            pos.push(' ');
        }
        text.push_str(&token.word);
        pos.push_str(&token.pos);
        entity_type.push_str(&token.entity_type);
    }
    entity_type.retain(|c| !matches!(c, '(' | ')' | '*'));

    Ok(MentionRecord {
        sentence: mention.sentence,
        start: mention.start,
        end: mention.end,
        text,
        pos,
        entity_type,
        chain: mention.chain,
        tree: sentence.tree(),
    })
}

// =============================================================================
// Tests
// =============================================================================
