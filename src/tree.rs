//! Constituency trees and per-sentence tree reconstruction.
//!
//! Corpus files carry one tree *fragment* per token; the fragment holds a
//! `*` placeholder where the token's preterminal belongs. Splicing the
//! fragments of a sentence in token-index order, with every placeholder
//! replaced by `(POS word)`, yields one bracketed string for the whole
//! sentence, which [`Tree::from_bracketed_str`] parses.
//!
//! # Example
//!
//! ```rust
//! use corefex::Tree;
//!
//! let tree = Tree::from_bracketed_str("(S (NP (DT the) (NN cat)) (VP (VBD sat)))").unwrap();
//! assert_eq!(tree.leaves(), vec!["the", "cat", "sat"]);
//! assert_eq!(tree.label(), Some("S"));
//! ```

use crate::corpus::Sentence;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A constituency parse tree.
///
/// Internal nodes carry a phrase or part-of-speech label; leaves carry a
/// surface word. The `Display` impl renders the canonical bracketed form,
/// which [`Tree::from_bracketed_str`] accepts back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tree {
    /// Internal node with a label and ordered children.
    Node {
        /// Phrase or part-of-speech label. May be empty for bare roots.
        label: String,
        /// Child subtrees, in surface order.
        children: Vec<Tree>,
    },
    /// Terminal node holding a surface word.
    Leaf {
        /// The surface word.
        word: String,
    },
}

impl Tree {
    /// Parse a tree from a bracketed string such as `(NP (DT the) (NN cat))`.
    ///
    /// Labels and words are delimited by whitespace and brackets; no space
    /// is required between brackets, so spliced fragment strings like
    /// `(TOP(S(NP(NNP Mary))` parse directly. Fails with
    /// [`Error::MalformedTree`] on unbalanced brackets, trailing input, or
    /// an empty string.
    pub fn from_bracketed_str(text: &str) -> Result<Tree> {
        let mut scanner = Scanner::new(text);
        scanner.skip_whitespace();
        if scanner.peek() != Some('(') {
            return Err(Error::malformed_tree(
                "expected '(' at start of tree string",
            ));
        }
        let tree = parse_node(&mut scanner)?;
        scanner.skip_whitespace();
        if let Some(c) = scanner.peek() {
            return Err(Error::malformed_tree(format!(
                "trailing input after tree at byte {}: {:?}",
                scanner.pos, c
            )));
        }
        Ok(tree)
    }

    /// The node label, or `None` for a leaf.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Tree::Node { label, .. } => Some(label.as_str()),
            Tree::Leaf { .. } => None,
        }
    }

    /// Child subtrees; empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Tree] {
        match self {
            Tree::Node { children, .. } => children,
            Tree::Leaf { .. } => &[],
        }
    }

    /// Whether this is a terminal node.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf { .. })
    }

    /// The leaf words in surface order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&str> {
        match self {
            Tree::Leaf { word } => vec![word.as_str()],
            Tree::Node { children, .. } => {
                children.iter().flat_map(Tree::leaves).collect()
            }
        }
    }
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tree::Leaf { word } => write!(f, "{}", word),
            Tree::Node { label, children } => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Reconstruct a sentence's parse tree from its token tree fragments.
///
/// Iterates tokens in index order, substitutes each fragment's `*`
/// placeholder with `(POS word)`, concatenates the results, and parses the
/// spliced string. Fails with [`Error::MalformedTree`] if the splice is not
/// well-bracketed (which also covers the empty-sentence case).
pub fn reconstruct_tree(sentence: &Sentence) -> Result<Tree> {
    let mut spliced = String::new();
    for token in sentence.tokens().values() {
        let preterminal = format!("({} {})", token.pos, token.word);
        spliced.push_str(&token.tree_fragment.replace('*', &preterminal));
    }
    Tree::from_bracketed_str(&spliced)
}

// =============================================================================
// Scanner
// =============================================================================

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume a run of characters up to whitespace or a bracket.
    /// May be empty when the cursor already sits on a delimiter.
    fn take_atom(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '(' || c == ')' {
                break;
            }
            self.bump();
        }
        &self.text[start..self.pos]
    }
}

fn parse_node(scanner: &mut Scanner<'_>) -> Result<Tree> {
    // Caller guarantees the cursor sits on '('.
    scanner.bump();
    let label = scanner.take_atom().to_string();
    let mut children = Vec::new();
    loop {
        scanner.skip_whitespace();
        match scanner.peek() {
            Some('(') => children.push(parse_node(scanner)?),
            Some(')') => {
                scanner.bump();
                return Ok(Tree::Node { label, children });
            }
            Some(_) => {
                let word = scanner.take_atom().to_string();
                children.push(Tree::Leaf { word });
            }
            None => {
                return Err(Error::malformed_tree(format!(
                    "unbalanced brackets: node {:?} never closed",
                    label
                )));
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
