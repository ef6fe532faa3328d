//! Configuration for every stage of the pipeline.
//!
//! Everything here is a plain value type with `Default`, `with_*` setters and
//! an explicit `validate()`. The aggregate [`Config`] can be read from JSON so a
//! whole analysis run is reproducible from a single file:
//!
//! ```json
//! {
//!   "weighting": { "scheme": "tfidf", "min_docs": 2 },
//!   "projector": { "side": "terms", "combine": "product", "max_hub_degree": null },
//!   "params": { "resolution": 1.0, "seed": 42, "tuning_parameter": 0.5 }
//! }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Cell weighting scheme for the document-term incidence matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// Raw term frequency per document.
    Count,
    /// 1 if the term occurs in the document.
    Binary,
    /// Term frequency times smoothed inverse document frequency.
    #[default]
    Tfidf,
    /// tf-idf with every row scaled to unit Euclidean norm.
    TfidfL2,
}

impl Scheme {
    /// Canonical name, as accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Count => "count",
            Scheme::Binary => "binary",
            Scheme::Tfidf => "tfidf",
            Scheme::TfidfL2 => "tfidf-l2",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(Scheme::Count),
            "binary" => Ok(Scheme::Binary),
            "tfidf" | "tf-idf" => Ok(Scheme::Tfidf),
            "tfidf-l2" | "tf-idf-l2" => Ok(Scheme::TfidfL2),
            other => Err(Error::invalid(
                "scheme",
                format!("unrecognized weighting scheme '{other}'"),
            )),
        }
    }
}

/// One side of the bipartite partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    /// Document nodes.
    Documents,
    /// Term nodes.
    Terms,
}

impl Side {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Documents => Side::Terms,
            Side::Terms => Side::Documents,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Documents => f.write_str("documents"),
            Side::Terms => f.write_str("terms"),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "documents" | "document" | "docs" | "doc" => Ok(Side::Documents),
            "terms" | "term" => Ok(Side::Terms),
            other => Err(Error::invalid(
                "side",
                format!("unrecognized projection side '{other}'"),
            )),
        }
    }
}

/// How two incident weights on a shared neighbor combine into a projected weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Combine {
    /// `w(u,x) * w(v,x)`: co-occurrence counts for `count`, cosine for `tfidf-l2`.
    #[default]
    Product,
    /// `min(w(u,x), w(v,x))`.
    Min,
}

impl Combine {
    /// Apply the combination to a pair of incident weights.
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Combine::Product => a * b,
            Combine::Min => a.min(b),
        }
    }
}

impl FromStr for Combine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(Combine::Product),
            "min" | "minimum" => Ok(Combine::Min),
            other => Err(Error::invalid(
                "combine",
                format!("unrecognized combination function '{other}'"),
            )),
        }
    }
}

/// Parameters that determine the incidence matrix.
///
/// Two textnets built from the same corpus with equal `WeightingConfig`s are
/// identical, which is what makes this the cache key.
///
/// Defaults to `tfidf` weighting with `min_docs = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightingConfig {
    /// Cell weighting scheme; `tfidf` by default.
    pub scheme: Scheme,
    /// Minimum number of documents a term must occur in to be kept.
    pub min_docs: usize,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Tfidf,
            min_docs: 1,
        }
    }
}

impl WeightingConfig {
    /// Set the weighting scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the minimum document frequency.
    pub fn with_min_docs(mut self, min_docs: usize) -> Self {
        self.min_docs = min_docs;
        self
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<()> {
        if self.min_docs == 0 {
            return Err(Error::invalid("min_docs", "must be at least 1"));
        }
        Ok(())
    }
}

/// Analysis parameters shared by clustering and path-based centralities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Resolution parameter handed to the community detector.
    pub resolution: f64,
    /// Seed handed to the community detector.
    pub seed: u64,
    /// Exponent in `cost = 1 / weight^tuning_parameter`.
    pub tuning_parameter: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 42,
            tuning_parameter: 0.5,
        }
    }
}

impl Params {
    /// Set the resolution parameter.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the cost tuning parameter.
    pub fn with_tuning_parameter(mut self, tuning_parameter: f64) -> Self {
        self.tuning_parameter = tuning_parameter;
        self
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<()> {
        validate_resolution(self.resolution)?;
        if !self.tuning_parameter.is_finite() || self.tuning_parameter < 0.0 {
            return Err(Error::invalid(
                "tuning_parameter",
                format!("must be finite and >= 0, got {}", self.tuning_parameter),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_resolution(resolution: f64) -> Result<()> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(Error::invalid(
            "resolution",
            format!("must be finite and > 0, got {resolution}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(Error::invalid(
            "alpha",
            format!("must be in (0, 1], got {alpha}"),
        ));
    }
    Ok(())
}

/// Projection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    /// Which side of the bipartite graph becomes the node set.
    pub side: Side,
    /// Combination function for incident weights.
    #[serde(default)]
    pub combine: Combine,
    /// Opposite-side nodes with more neighbors than this are skipped.
    ///
    /// `None` (the default) keeps every hub. Skipping bounds the quadratic
    /// cost of very common terms but drops their contribution to weights.
    #[serde(default)]
    pub max_hub_degree: Option<usize>,
}

impl Projector {
    /// Project onto `side` with the product combination and no hub skipping.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            combine: Combine::default(),
            max_hub_degree: None,
        }
    }

    /// Set the combination function.
    pub fn with_combine(mut self, combine: Combine) -> Self {
        self.combine = combine;
        self
    }

    /// Skip opposite-side nodes whose degree exceeds `max_degree`.
    pub fn with_max_hub_degree(mut self, max_degree: usize) -> Self {
        self.max_hub_degree = Some(max_degree);
        self
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_hub_degree == Some(0) {
            return Err(Error::invalid("max_hub_degree", "must be at least 1"));
        }
        Ok(())
    }
}

/// Complete description of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Incidence matrix construction.
    #[serde(default)]
    pub weighting: WeightingConfig,
    /// Projection settings.
    pub projector: Projector,
    /// Clustering and centrality parameters.
    #[serde(default)]
    pub params: Params,
}

impl Config {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| Error::invalid("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.weighting.validate()?;
        self.projector.validate()?;
        self.params.validate()
    }
}
