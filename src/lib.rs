//! # corefex
//!
//! Reader and mention extractor for CoNLL-style coreference-annotated
//! corpora.
//!
//! - **Corpus reading**: column-format files split into document parts,
//!   sentences, and tokens
//! - **Tree reconstruction**: per-token parse fragments spliced into one
//!   constituency tree per sentence
//! - **Mention extraction**: bracket-encoded coreference spans decoded by
//!   a streaming matching automaton that handles nested and crossing spans
//! - **Materialization**: mention spans resolved into surface, POS, and
//!   entity-type strings plus the owning tree
//!
//! ## Quick Start
//!
//! ```rust
//! use corefex::{extract_mentions, materialize_mention, read_corpus_str};
//!
//! let corpus = read_corpus_str(concat!(
//!     "#begin document (demo); part 000\n",
//!     "demo 0 1 Mary NNP (TOP(S(NP*) - - - - * (0)\n",
//!     "demo 0 2 saw VBD (VP* - - - - * -\n",
//!     "demo 0 3 the DT (NP* - - - - * (1\n",
//!     "demo 0 4 cat NN *)))) - - - - * 1)\n",
//!     "\n",
//!     "#end document\n",
//! ))?;
//!
//! let part = &corpus.parts()[0];
//! let mentions = extract_mentions(part);
//! assert_eq!(mentions.len(), 2);
//!
//! let record = materialize_mention(&mentions[1], part)?;
//! assert_eq!(record.text, "the cat");
//! assert_eq!(record.pos, "DT NN");
//! # Ok::<(), corefex::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! Data flows strictly forward: the reader produces the corpus, the tree
//! reconstructor and chain parser consume it independently, and the
//! materializer combines the chain parser's mentions with the reader's
//! tokens and trees. Everything after the one file read is a pure function
//! over in-memory data; sentences are independent, so parts may be
//! processed in parallel as long as the corpus is treated as read-only.

#![warn(missing_docs)]

mod chain;
mod corpus;
mod error;
mod mention;
mod tree;

pub use chain::{
    extract_mentions, extract_sentence_mentions, group_chains, lex_coref_field, CorefEvent,
};
pub use corpus::{read_corpus, read_corpus_str, Corpus, CorpusReader, Part, Sentence, Token};
pub use error::{Error, Result};
pub use mention::{materialize_mention, Chain, Mention, MentionRecord};
pub use tree::{reconstruct_tree, Tree};
