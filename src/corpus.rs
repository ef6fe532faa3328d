//! Tokenized corpora.
//!
//! The pipeline starts from already-tokenized text. Lemmatization, noun-phrase
//! chunking and the like belong to an external NLP engine; the [`Tokenize`]
//! trait is the seam where one plugs in, and [`SimpleTokenizer`] is a minimal
//! stand-in for tests and quick exploration.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// A single tokenized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Unique identifier.
    pub id: String,
    /// Tokens in document order; duplicates are meaningful.
    pub tokens: Vec<String>,
}

/// An ordered collection of tokenized documents with unique identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Build a corpus, rejecting repeated document identifiers.
    ///
    /// Empty documents are allowed; they become isolated nodes.
    pub fn new<I, S, T>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<T>)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut docs = Vec::new();
        for (id, tokens) in documents {
            let id = id.into();
            if !seen.insert(id.clone()) {
                return Err(Error::DuplicateDocument { id });
            }
            docs.push(Document {
                id,
                tokens: tokens.into_iter().map(Into::into).collect(),
            });
        }
        Ok(Self { documents: docs })
    }

    /// Tokenize raw texts with the given tokenizer.
    pub fn from_texts<I, S, T>(texts: I, tokenizer: &impl Tokenize) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        Self::new(
            texts
                .into_iter()
                .map(|(id, text)| (id, tokenizer.tokenize(text.as_ref()))),
        )
    }

    /// Documents in corpus order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if there are no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents each term occurs in.
    pub fn document_frequencies(&self) -> HashMap<&str, usize> {
        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &self.documents {
            let distinct: HashSet<&str> = doc.tokens.iter().map(String::as_str).collect();
            for term in distinct {
                *df.entry(term).or_insert(0) += 1;
            }
        }
        df
    }
}

/// Turns raw text into a token sequence.
///
/// Implementations must return a finite, ordered sequence; duplicates are
/// kept because they carry term frequency.
pub trait Tokenize {
    /// Tokenize one document.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Lowercasing tokenizer that splits on anything not alphanumeric.
#[derive(Debug, Clone)]
pub struct SimpleTokenizer {
    stop_words: HashSet<String>,
    min_len: usize,
}

impl SimpleTokenizer {
    /// Tokenizer with no stop words and a minimum token length of 1.
    pub fn new() -> Self {
        Self {
            stop_words: HashSet::new(),
            min_len: 1,
        }
    }

    /// Drop these words (compared after lowercasing).
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Drop tokens shorter than `min_len` characters.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }
}

impl Default for SimpleTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenize for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .filter(|t| t.chars().count() >= self.min_len && !self.stop_words.contains(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Corpus::new(vec![("d1", vec!["a"]), ("d1", vec!["b"])]);
        assert_eq!(
            result.unwrap_err(),
            Error::DuplicateDocument { id: "d1".into() }
        );
    }

    #[test]
    fn test_empty_documents_allowed() {
        let corpus = Corpus::new(vec![("d1", vec!["a"]), ("d2", Vec::<&str>::new())]).unwrap();
        assert_eq!(corpus.len(), 2);
        assert!(corpus.documents()[1].tokens.is_empty());
    }

    #[test]
    fn test_document_frequencies_count_documents_not_tokens() {
        let corpus = Corpus::new(vec![("d1", vec!["a", "a", "b"]), ("d2", vec!["b", "c"])]).unwrap();
        let df = corpus.document_frequencies();
        assert_eq!(df["a"], 1);
        assert_eq!(df["b"], 2);
        assert_eq!(df["c"], 1);
    }

    #[test]
    fn test_simple_tokenizer() {
        let tok = SimpleTokenizer::new()
            .with_stop_words(["the", "a"])
            .with_min_len(2);
        assert_eq!(
            tok.tokenize("The cat sat on a Mat, the END."),
            vec!["cat", "sat", "on", "mat", "end"]
        );
    }

    #[test]
    fn test_from_texts() {
        let corpus = Corpus::from_texts(
            [("x", "Red fish, blue fish"), ("y", "")],
            &SimpleTokenizer::default(),
        )
        .unwrap();
        assert_eq!(corpus.documents()[0].tokens, vec!["red", "fish", "blue", "fish"]);
        assert!(corpus.documents()[1].tokens.is_empty());
    }
}
