//! Agreement between two partitions of the same view.
//!
//! Sweeping resolution or α produces many partitions; these scores say how
//! much two of them agree.
//!
//! | Metric | Range | Identical | Notes |
//! |--------|-------|-----------|-------|
//! | [`nmi`] | [0, 1] | 1 | Normalized mutual information |
//! | [`ari`] | [-1, 1] | 1 | Adjusted Rand index; 0 is chance level |
//!
//! Both ignore cluster ids: relabelling a partition does not change its score.
//!
//! # References
//!
//! - Hubert & Arabie (1985). "Comparing partitions" (ARI)
//! - Strehl & Ghosh (2002). "Cluster ensembles" (NMI)

use crate::error::{Error, Result};
use crate::partition::Partition;
use std::collections::HashMap;

/// Normalized mutual information between two partitions.
///
/// ```text
/// NMI(U, V) = 2 * I(U; V) / (H(U) + H(V))
/// ```
///
/// Two single-cluster partitions score 1.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] if the partitions cover different nodes.
pub fn nmi(a: &Partition, b: &Partition) -> Result<f64> {
    check_same_nodes(a, b)?;
    Ok(nmi_memberships(a.membership(), b.membership()))
}

/// Adjusted Rand index between two partitions.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] if the partitions cover different nodes.
pub fn ari(a: &Partition, b: &Partition) -> Result<f64> {
    check_same_nodes(a, b)?;
    Ok(ari_memberships(a.membership(), b.membership()))
}

fn check_same_nodes(a: &Partition, b: &Partition) -> Result<()> {
    if a.labels() != b.labels() {
        return Err(Error::invalid(
            "partition",
            format!(
                "partitions cover different nodes ({} vs {})",
                a.len(),
                b.len()
            ),
        ));
    }
    Ok(())
}

fn entropy(counts: &HashMap<usize, usize>, n: f64) -> f64 {
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            if p > 0.0 {
                -p * p.ln()
            } else {
                0.0
            }
        })
        .sum()
}

fn nmi_memberships(u: &[usize], v: &[usize]) -> f64 {
    if u.is_empty() {
        return 1.0;
    }
    let n = u.len() as f64;
    let joint = build_contingency_table(u, v);
    let (rows, cols) = marginals(&joint);

    let h_u = entropy(&rows, n);
    let h_v = entropy(&cols, n);

    let mut mi = 0.0;
    for (&(i, j), &count) in &joint {
        let p_ij = count as f64 / n;
        let p_i = rows[&i] as f64 / n;
        let p_j = cols[&j] as f64 / n;
        mi += p_ij * (p_ij / (p_i * p_j)).ln();
    }

    let denom = h_u + h_v;
    if denom > 0.0 {
        (2.0 * mi / denom).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn ari_memberships(u: &[usize], v: &[usize]) -> f64 {
    let joint = build_contingency_table(u, v);
    let (rows, cols) = marginals(&joint);

    let sum_comb_ij: f64 = joint.values().map(|&c| comb2(c) as f64).sum();
    let sum_comb_a: f64 = rows.values().map(|&a| comb2(a) as f64).sum();
    let sum_comb_b: f64 = cols.values().map(|&b| comb2(b) as f64).sum();
    let comb_n = comb2(u.len()) as f64;
    if comb_n == 0.0 {
        return 1.0;
    }

    let expected = sum_comb_a * sum_comb_b / comb_n;
    let max_index = (sum_comb_a + sum_comb_b) / 2.0;
    let denom = max_index - expected;
    if denom.abs() < 1e-10 {
        // Both trivial (all singletons or one cluster); agreement is exact
        // only when they are the same trivial partition.
        return if (sum_comb_ij - expected).abs() < 1e-10 { 1.0 } else { 0.0 };
    }
    (sum_comb_ij - expected) / denom
}

fn build_contingency_table(u: &[usize], v: &[usize]) -> HashMap<(usize, usize), usize> {
    let mut table = HashMap::new();
    for (&i, &j) in u.iter().zip(v) {
        *table.entry((i, j)).or_insert(0) += 1;
    }
    table
}

fn marginals(
    joint: &HashMap<(usize, usize), usize>,
) -> (HashMap<usize, usize>, HashMap<usize, usize>) {
    let mut rows = HashMap::new();
    let mut cols = HashMap::new();
    for (&(i, j), &count) in joint {
        *rows.entry(i).or_insert(0) += count;
        *cols.entry(j).or_insert(0) += count;
    }
    (rows, cols)
}

fn comb2(n: usize) -> usize {
    if n < 2 {
        0
    } else {
        n * (n - 1) / 2
    }
}
