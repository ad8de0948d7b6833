//! Corpus data model and the column-format reader.
//!
//! Input files are line-oriented, CoNLL style:
//!
//! - one token per line, columns separated by whitespace;
//! - a blank line closes the sentence being accumulated;
//! - `#`-prefixed lines are structural markers: a line whose last field is
//!   the literal `document` flushes the accumulated sentences into a new
//!   [`Part`], a purely numeric last field (the `part 000` form) is a
//!   no-op sentinel, and any other comment line is ignored.
//!
//! Token lines decode five fixed columns:
//!
//! | column (0-indexed) | field |
//! |--------------------|-------|
//! | 2 | token index (1-based) |
//! | 3 | surface word |
//! | 4 | part-of-speech tag |
//! | 5 | tree fragment (one `*` placeholder) |
//! | 10 | entity type |
//! | last | coreference field |
//!
//! Columns between 10 and the last are not modeled. A token line with
//! fewer than 11 columns, or a non-numeric index column, fails the read
//! with [`Error::MalformedLine`].

use crate::chain::extract_mentions;
use crate::mention::Mention;
use crate::tree::{reconstruct_tree, Tree};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Minimum column count of a token line: indices 2..=10 plus a trailing
/// coreference column.
const MIN_COLUMNS: usize = 11;

// =============================================================================
// Token
// =============================================================================

/// One annotated token: the five decoded columns of a token line.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Surface word.
    pub word: String,
    /// Part-of-speech tag.
    pub pos: String,
    /// Constituency-tree fragment with a `*` placeholder for this token's
    /// preterminal.
    pub tree_fragment: String,
    /// Entity-type annotation, kept as an opaque bracketed string.
    pub entity_type: String,
    /// Raw coreference field in bracket notation, e.g. `(5`, `5)`, `(5)`,
    /// `(0|(3|(5)`, or `-`.
    pub coref: String,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub fn new(
        word: impl Into<String>,
        pos: impl Into<String>,
        tree_fragment: impl Into<String>,
        entity_type: impl Into<String>,
        coref: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            pos: pos.into(),
            tree_fragment: tree_fragment.into(),
            entity_type: entity_type.into(),
            coref: coref.into(),
        }
    }
}

// =============================================================================
// Sentence
// =============================================================================

/// An ordered mapping from token index to [`Token`], plus derived fields.
///
/// Token indices come from the source file: 1-based, and dense in
/// well-formed input, so map order equals encounter order. The reader does
/// not enforce density; malformed input produces malformed sentences
/// silently.
///
/// The parse tree is attached exactly once, after all tokens exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    tokens: BTreeMap<usize, Token>,
    words: Vec<String>,
    tree: Option<Tree>,
}

impl Sentence {
    /// Build a sentence from `(token index, token)` pairs in encounter
    /// order. Duplicate indices keep the last token, as the source column
    /// is trusted.
    #[must_use]
    pub fn from_tokens(tokens: Vec<(usize, Token)>) -> Self {
        let mut words = Vec::with_capacity(tokens.len());
        let mut map = BTreeMap::new();
        for (index, token) in tokens {
            words.push(token.word.clone());
            map.insert(index, token);
        }
        Self {
            tokens: map,
            words,
            tree: None,
        }
    }

    /// Look up a token by its 1-based index.
    #[must_use]
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(&index)
    }

    /// All tokens, ordered by token index.
    #[must_use]
    pub fn tokens(&self) -> &BTreeMap<usize, Token> {
        &self.tokens
    }

    /// Surface words in encounter order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The reconstructed parse tree, if reconstruction has run.
    #[must_use]
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sentence has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn set_tree(&mut self, tree: Tree) {
        debug_assert!(self.tree.is_none(), "sentence tree is set exactly once");
        self.tree = Some(tree);
    }
}

// =============================================================================
// Part
// =============================================================================

/// A document part: an ordered sequence of sentences.
///
/// Sentence indices are dense and 0-based, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    sentences: Vec<Sentence>,
}

impl Part {
    /// Build a part from sentences in document order.
    #[must_use]
    pub fn from_sentences(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    /// All sentences in document order.
    #[must_use]
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Look up a sentence by its 0-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    /// Number of sentences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether the part has no sentences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

// =============================================================================
// Corpus
// =============================================================================

/// The result of one corpus read: an ordered sequence of document parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    parts: Vec<Part>,
}

impl Corpus {
    /// All parts in file order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Look up a part by its 0-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Part> {
        self.parts.get(index)
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the corpus has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Consume the corpus, yielding its parts.
    #[must_use]
    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }

    /// Extract mentions from every part, tagged with the part index.
    #[must_use]
    pub fn all_mentions(&self) -> Vec<(usize, Vec<Mention>)> {
        self.parts
            .iter()
            .enumerate()
            .map(|(index, part)| (index, extract_mentions(part)))
            .collect()
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Configurable corpus reader.
///
/// Tree reconstruction runs by default and can be switched off when only
/// the coreference layer is needed:
///
/// ```rust
/// use corefex::CorpusReader;
///
/// let reader = CorpusReader::new().build_trees(false);
/// let corpus = reader.read_str("").unwrap();
/// assert!(corpus.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct CorpusReader {
    build_trees: bool,
}

impl Default for CorpusReader {
    fn default() -> Self {
        Self { build_trees: true }
    }
}

impl CorpusReader {
    /// Create a reader with default settings (trees on).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle per-sentence tree reconstruction.
    #[must_use]
    pub fn build_trees(mut self, build: bool) -> Self {
        self.build_trees = build;
        self
    }

    /// Read a corpus file from disk.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Corpus> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(Error::Io)?;
        self.read_str(&content)
    }

    /// Read a corpus from an in-memory string.
    ///
    /// Parts are flushed only at `document` markers: sentences accumulated
    /// after the final marker are discarded, and a pending sentence not
    /// closed by a blank line survives across a marker into the next part.
    pub fn read_str(&self, content: &str) -> Result<Corpus> {
        let mut parts: Vec<Part> = Vec::new();
        let mut sentences: Vec<Sentence> = Vec::new();
        let mut pending: Vec<(usize, Token)> = Vec::new();

        for (line_index, line) in content.lines().enumerate() {
            if line.starts_with('#') {
                // Comment lines never touch the pending token buffer. Only
                // a trailing `document` field matters; numeric tails (the
                // `part 000` form) and everything else are no-ops.
                if line.split_whitespace().last() == Some("document") {
                    parts.push(Part::from_sentences(std::mem::take(&mut sentences)));
                }
            } else if line.is_empty() {
                if !pending.is_empty() {
                    sentences.push(Sentence::from_tokens(std::mem::take(&mut pending)));
                }
            } else {
                pending.push(parse_token_line(line, line_index + 1)?);
            }
        }

        let mut corpus = Corpus { parts };
        if self.build_trees {
            for part in &mut corpus.parts {
                for sentence in &mut part.sentences {
                    let tree = reconstruct_tree(sentence)?;
                    sentence.set_tree(tree);
                }
            }
        }
        log::debug!("read {} part(s) from corpus input", corpus.len());
        Ok(corpus)
    }
}

/// Read a corpus file with default settings.
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    CorpusReader::new().read_path(path)
}

/// Read a corpus from an in-memory string with default settings.
pub fn read_corpus_str(content: &str) -> Result<Corpus> {
    CorpusReader::new().read_str(content)
}

fn parse_token_line(line: &str, line_number: usize) -> Result<(usize, Token)> {
    let columns: Vec<&str> = line.split_whitespace().collect();
    if columns.len() < MIN_COLUMNS {
        return Err(Error::malformed_line(
            line_number,
            format!(
                "expected at least {} columns, found {}",
                MIN_COLUMNS,
                columns.len()
            ),
        ));
    }
    let index = columns[2].parse::<usize>().map_err(|_| {
        Error::malformed_line(
            line_number,
            format!("token index column is not numeric: {:?}", columns[2]),
        )
    })?;
    let token = Token::new(
        columns[3],
        columns[4],
        columns[5],
        columns[10],
        columns[columns.len() - 1],
    );
    Ok((index, token))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn token_line(index: usize, word: &str, coref: &str) -> String {
        format!(
            "doc 0 {} {} NN (NP*) - - - - * {}",
            index, word, coref
        )
    }

    #[test]
    fn test_parse_token_line_columns() {
        let (index, token) =
            parse_token_line("doc 0 1 cat NN (NP*) - - - - (ANIMAL) extra (5)", 1).unwrap();
        assert_eq!(index, 1);
        assert_eq!(token.word, "cat");
        assert_eq!(token.pos, "NN");
        assert_eq!(token.tree_fragment, "(NP*)");
        assert_eq!(token.entity_type, "(ANIMAL)");
        assert_eq!(token.coref, "(5)");
    }

    #[test]
    fn test_parse_token_line_too_few_columns() {
        let err = parse_token_line("doc 0 1 cat NN", 7).unwrap_err();
        match err {
            Error::MalformedLine { line, .. } => assert_eq!(line, 7),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_token_line_non_numeric_index() {
        let err = parse_token_line("doc 0 x cat NN (NP*) - - - - * -", 3).unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn test_document_marker_flushes_part() {
        let input = format!(
            "#begin document (doc); part 000\n{}\n\n#end document\n",
            token_line(1, "hello", "-")
        );
        let corpus = CorpusReader::new().build_trees(false).read_str(&input).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(0).unwrap().len(), 1);
        assert_eq!(corpus.get(0).unwrap().get(0).unwrap().words(), ["hello"]);
    }

    #[test]
    fn test_numeric_tail_comment_is_noop() {
        // The `#begin ... part 000` line must not flush a part.
        let input = "#begin document (doc); part 000\n#end document\n";
        let corpus = read_corpus_str(input).unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.get(0).unwrap().is_empty());
    }

    #[test]
    fn test_pending_sentence_dropped_at_marker() {
        // No blank line before the end marker: the pending sentence is not
        // committed to the flushed part, and keeps accumulating.
        let input = format!("{}\n#end document\n", token_line(1, "stray", "-"));
        let corpus = CorpusReader::new().build_trees(false).read_str(&input).unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.get(0).unwrap().is_empty());
    }

    #[test]
    fn test_sentences_after_last_marker_discarded() {
        let input = format!("#end document\n{}\n\n", token_line(1, "late", "-"));
        let corpus = CorpusReader::new().build_trees(false).read_str(&input).unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.get(0).unwrap().is_empty());
    }

    #[test]
    fn test_sentence_duplicate_index_keeps_last() {
        let sentence = Sentence::from_tokens(vec![
            (1, Token::new("a", "DT", "*", "*", "-")),
            (1, Token::new("b", "NN", "*", "*", "-")),
        ]);
        assert_eq!(sentence.len(), 1);
        assert_eq!(sentence.token(1).unwrap().word, "b");
        // The derived word list keeps both encounters.
        assert_eq!(sentence.words(), ["a", "b"]);
    }
}
