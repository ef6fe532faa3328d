//! Weighting engine: corpus → sparse document-term incidence matrix.
//!
//! ## Schemes
//!
//! | Scheme | Cell value |
//! |--------|------------|
//! | `count` | tf(t, d), the number of occurrences of t in d |
//! | `binary` | 1 if t occurs in d |
//! | `tfidf` | tf(t, d) × idf(t) |
//! | `tfidf-l2` | tfidf row scaled to unit Euclidean norm |
//!
//! with the smoothed inverse document frequency
//!
//! ```text
//! idf(t) = ln((1 + N) / (1 + df_t)) + 1
//! ```
//!
//! which stays positive when a term occurs in every document.
//!
//! Only non-zero cells are stored, one sorted row per document.

use crate::config::{Scheme, WeightingConfig};
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Sparse document × term matrix of non-negative weights.
///
/// Rows follow corpus order. Columns follow first occurrence of each term in
/// corpus order. Each row is sorted by column index and holds only non-zero
/// cells.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidenceMatrix {
    documents: Vec<String>,
    terms: Vec<String>,
    rows: Vec<Vec<(usize, f64)>>,
}

impl IncidenceMatrix {
    /// Weight a corpus.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for an empty corpus, or when no term survives
    ///   `min_docs` filtering.
    /// - [`Error::InvalidConfiguration`] for `min_docs == 0`.
    pub fn from_corpus(corpus: &Corpus, config: &WeightingConfig) -> Result<Self> {
        config.validate()?;
        if corpus.is_empty() {
            return Err(Error::EmptyInput { what: "corpus" });
        }

        let df = corpus.document_frequencies();

        let mut term_index: HashMap<&str, usize> = HashMap::new();
        let mut terms: Vec<String> = Vec::new();
        let mut counts: Vec<Vec<(usize, f64)>> = Vec::with_capacity(corpus.len());

        for doc in corpus.documents() {
            let mut row: HashMap<usize, f64> = HashMap::new();
            for token in &doc.tokens {
                if df.get(token.as_str()).copied().unwrap_or(0) < config.min_docs {
                    continue;
                }
                let col = *term_index.entry(token.as_str()).or_insert_with(|| {
                    terms.push(token.clone());
                    terms.len() - 1
                });
                *row.entry(col).or_insert(0.0) += 1.0;
            }
            let mut row: Vec<(usize, f64)> = row.into_iter().collect();
            row.sort_unstable_by_key(|&(col, _)| col);
            counts.push(row);
        }

        if terms.is_empty() {
            return Err(Error::EmptyInput { what: "vocabulary" });
        }

        let n_docs = corpus.len() as f64;
        let idf: Vec<f64> = terms
            .iter()
            .map(|t| {
                let df_t = df.get(t.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df_t)).ln() + 1.0
            })
            .collect();

        let rows = counts
            .into_iter()
            .map(|row| apply_scheme(row, config.scheme, &idf))
            .collect();

        let matrix = Self {
            documents: corpus.documents().iter().map(|d| d.id.clone()).collect(),
            terms,
            rows,
        };
        debug!(
            scheme = %config.scheme,
            min_docs = config.min_docs,
            documents = matrix.n_documents(),
            terms = matrix.n_terms(),
            nnz = matrix.nnz(),
            "built incidence matrix"
        );
        Ok(matrix)
    }

    /// Assemble a matrix from explicit cells.
    ///
    /// Zero cells are dropped; duplicate cells are summed. Used when
    /// reloading a persisted bipartite graph.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] for an out-of-range index or a negative
    /// or non-finite weight; [`Error::EmptyInput`] when either axis is empty.
    pub fn from_cells(
        documents: Vec<String>,
        terms: Vec<String>,
        cells: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyInput { what: "corpus" });
        }
        if terms.is_empty() {
            return Err(Error::EmptyInput { what: "vocabulary" });
        }
        let mut rows: Vec<HashMap<usize, f64>> = vec![HashMap::new(); documents.len()];
        for (row, col, w) in cells {
            if row >= documents.len() || col >= terms.len() {
                return Err(Error::invalid(
                    "cell",
                    format!("({row}, {col}) outside {}x{}", documents.len(), terms.len()),
                ));
            }
            if !w.is_finite() || w < 0.0 {
                return Err(Error::invalid("cell", format!("weight {w} is not >= 0")));
            }
            *rows[row].entry(col).or_insert(0.0) += w;
        }
        let rows = rows
            .into_iter()
            .map(|r| {
                let mut r: Vec<(usize, f64)> = r.into_iter().filter(|&(_, w)| w > 0.0).collect();
                r.sort_unstable_by_key(|&(col, _)| col);
                r
            })
            .collect();
        Ok(Self {
            documents,
            terms,
            rows,
        })
    }

    /// Document identifiers (row labels).
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Vocabulary (column labels).
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of rows.
    pub fn n_documents(&self) -> usize {
        self.documents.len()
    }

    /// Number of columns.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of stored (non-zero) cells.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Non-zero cells of one document, sorted by term index.
    pub fn row(&self, doc: usize) -> &[(usize, f64)] {
        self.rows.get(doc).map_or(&[], Vec::as_slice)
    }

    /// Weight of `(document, term)` by label, or `None` for a zero cell.
    pub fn get(&self, document: &str, term: &str) -> Option<f64> {
        let row = self.documents.iter().position(|d| d == document)?;
        let col = self.terms.iter().position(|t| t == term)?;
        self.rows[row]
            .binary_search_by_key(&col, |&(c, _)| c)
            .ok()
            .map(|i| self.rows[row][i].1)
    }

    /// All non-zero cells as `(row, col, weight)` in row-then-column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().map(move |&(c, w)| (r, c, w)))
    }
}

fn apply_scheme(counts: Vec<(usize, f64)>, scheme: Scheme, idf: &[f64]) -> Vec<(usize, f64)> {
    match scheme {
        Scheme::Count => counts,
        Scheme::Binary => counts.into_iter().map(|(c, _)| (c, 1.0)).collect(),
        Scheme::Tfidf => counts.into_iter().map(|(c, tf)| (c, tf * idf[c])).collect(),
        Scheme::TfidfL2 => {
            let weighted: Vec<(usize, f64)> =
                counts.into_iter().map(|(c, tf)| (c, tf * idf[c])).collect();
            let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                weighted.into_iter().map(|(c, w)| (c, w / norm)).collect()
            } else {
                weighted
            }
        }
    }
}
