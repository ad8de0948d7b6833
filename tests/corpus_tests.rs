//! Integration tests for corpus reading and tree reconstruction.

use corefex::{read_corpus, read_corpus_str, CorpusReader, Error};
use std::io::Write;

/// Two-part corpus: a simple sentence, a crossing-bracket sentence, and a
/// second part with a singleton chain.
const SAMPLE: &str = concat!(
    "#begin document (test/doc); part 000\n",
    "test/doc 0 1 Mary NNP (TOP(S(NP*) - - - - (PERSON) (0)\n",
    "test/doc 0 2 saw VBD (VP* - - - - * -\n",
    "test/doc 0 3 the DT (NP* - - - - * (1\n",
    "test/doc 0 4 cat NN *)))) - - - - * 1)\n",
    "\n",
    "test/doc 0 1 He PRP (TOP(S(NP*) - - - - * (0\n",
    "test/doc 0 2 saw VBD (VP* - - - - * (1\n",
    "test/doc 0 3 her PRP$ (NP* - - - - * 0)\n",
    "test/doc 0 4 wave NN *)))) - - - - * 1)\n",
    "\n",
    "#end document\n",
    "#begin document (test/doc); part 001\n",
    "test/doc 1 1 Dogs NNS (TOP(S(NP*) - - - - * (2)\n",
    "test/doc 1 2 bark VBP (VP*))) - - - - * -\n",
    "\n",
    "#end document\n",
);

// =============================================================================
// Reading
// =============================================================================

#[test]
fn test_parts_and_sentences() {
    let corpus = read_corpus_str(SAMPLE).unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.get(0).unwrap().len(), 2);
    assert_eq!(corpus.get(1).unwrap().len(), 1);
}

#[test]
fn test_token_fields_decoded() {
    let corpus = read_corpus_str(SAMPLE).unwrap();
    let sentence = corpus.get(0).unwrap().get(0).unwrap();
    let token = sentence.token(1).unwrap();
    assert_eq!(token.word, "Mary");
    assert_eq!(token.pos, "NNP");
    assert_eq!(token.tree_fragment, "(TOP(S(NP*)");
    assert_eq!(token.entity_type, "(PERSON)");
    assert_eq!(token.coref, "(0)");
}

#[test]
fn test_words_in_token_order() {
    let corpus = read_corpus_str(SAMPLE).unwrap();
    let sentence = corpus.get(0).unwrap().get(0).unwrap();
    assert_eq!(sentence.words(), ["Mary", "saw", "the", "cat"]);
    assert_eq!(sentence.len(), 4);
}

#[test]
fn test_stray_comment_lines_ignored() {
    let input = concat!(
        "# some note about the corpus\n",
        "test/doc 0 1 Hi UH (TOP*) - - - - * -\n",
        "\n",
        "#end document\n",
    );
    let corpus = read_corpus_str(input).unwrap();
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.get(0).unwrap().len(), 1);
}

#[test]
fn test_malformed_line_reports_position() {
    let input = concat!(
        "#begin document (x); part 000\n",
        "test/doc 0 not-a-number cat NN (NP*) - - - - * -\n",
    );
    match read_corpus_str(input).unwrap_err() {
        Error::MalformedLine { line, reason } => {
            assert_eq!(line, 2);
            assert!(reason.contains("not-a-number"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_short_line_fails() {
    let err = read_corpus_str("a b 1 word NN\n").unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 1, .. }));
}

#[test]
fn test_read_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    file.flush().unwrap();

    let corpus = read_corpus(file.path()).unwrap();
    assert_eq!(corpus.len(), 2);
}

// =============================================================================
// Tree reconstruction
// =============================================================================

#[test]
fn test_trees_attached_to_every_sentence() {
    let corpus = read_corpus_str(SAMPLE).unwrap();
    for part in corpus.parts() {
        for sentence in part.sentences() {
            let tree = sentence.tree().expect("tree should be reconstructed");
            assert_eq!(tree.leaves(), sentence.words().to_vec());
        }
    }
}

#[test]
fn test_spliced_tree_shape() {
    let corpus = read_corpus_str(SAMPLE).unwrap();
    let tree = corpus.get(0).unwrap().get(0).unwrap().tree().unwrap();
    assert_eq!(tree.label(), Some("TOP"));
    assert_eq!(
        tree.to_string(),
        "(TOP (S (NP (NNP Mary)) (VP (VBD saw) (NP (DT the) (NN cat)))))"
    );
}

#[test]
fn test_build_trees_off() {
    let corpus = CorpusReader::new()
        .build_trees(false)
        .read_str(SAMPLE)
        .unwrap();
    for part in corpus.parts() {
        for sentence in part.sentences() {
            assert!(sentence.tree().is_none());
        }
    }
}

#[test]
fn test_unbalanced_fragment_fails_the_read() {
    let input = concat!(
        "test/doc 0 1 lone NN (TOP(S* - - - - * -\n",
        "\n",
        "#end document\n",
    );
    let err = read_corpus_str(input).unwrap_err();
    assert!(matches!(err, Error::MalformedTree(_)));

    // The same input reads fine with trees off.
    let corpus = CorpusReader::new()
        .build_trees(false)
        .read_str(input)
        .unwrap();
    assert_eq!(corpus.get(0).unwrap().len(), 1);
}
