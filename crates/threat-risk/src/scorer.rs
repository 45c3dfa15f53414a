//! Risk scoring implementation
//!
//! Risk(t) = likelihood · impact. Aggregations partition the scores by CIA
//! dimension and by (likelihood, impact) cell. Every function is a pure
//! read over its input and preserves the input order unless it says otherwise.

use crate::{CiaDimension, CiaImpact, RiskTier, Threat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores grouped by the CIA dimension they affect
pub type CiaAggregate = BTreeMap<CiaDimension, Vec<RiskScore>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    pub threat_id: String,
    /// likelihood × impact (1-25 for rated threats)
    pub score: u16,
    pub cia: CiaImpact,
    pub tier: RiskTier,
}

/// Score a single threat
pub fn score(threat: &Threat) -> RiskScore {
    let score = u16::from(threat.likelihood) * u16::from(threat.impact);
    RiskScore {
        threat_id: threat.id.clone(),
        score,
        cia: threat.cia,
        tier: RiskTier::from_score(score),
    }
}

/// Score all threats, keeping their order
pub fn score_all<'t>(threats: impl IntoIterator<Item = &'t Threat>) -> Vec<RiskScore> {
    threats.into_iter().map(score).collect()
}

/// Partition scores by CIA dimension.
///
/// Every dimension is present in the result, empty when no threat affects it.
/// A threat affecting several dimensions appears under each of them.
pub fn aggregate<'t>(threats: impl IntoIterator<Item = &'t Threat>) -> CiaAggregate {
    let mut by_dimension: CiaAggregate = CiaDimension::ALL
        .into_iter()
        .map(|d| (d, Vec::new()))
        .collect();

    for threat in threats {
        let scored = score(threat);
        for dimension in threat.cia.dimensions() {
            if let Some(bucket) = by_dimension.get_mut(&dimension) {
                bucket.push(scored.clone());
            }
        }
    }

    by_dimension
}

/// Threats scoring at or above `threshold`, in their original order
pub fn filter_high_risk<'t>(
    threats: impl IntoIterator<Item = &'t Threat>,
    threshold: u16,
) -> Vec<&'t Threat> {
    threats
        .into_iter()
        .filter(|t| score(t).score >= threshold)
        .collect()
}

/// Scores sorted by descending score; ties keep their original order
pub fn rank_by_score<'t>(threats: impl IntoIterator<Item = &'t Threat>) -> Vec<RiskScore> {
    let mut scores = score_all(threats);
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

/// Count of threats at one likelihood × impact position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub likelihood: u8,
    pub impact: u8,
    pub count: usize,
}

/// Occupied likelihood × impact cells, ordered by likelihood then impact
pub fn heatmap<'t>(threats: impl IntoIterator<Item = &'t Threat>) -> Vec<HeatmapCell> {
    let mut counts: BTreeMap<(u8, u8), usize> = BTreeMap::new();
    for threat in threats {
        *counts.entry((threat.likelihood, threat.impact)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((likelihood, impact), count)| HeatmapCell {
            likelihood,
            impact,
            count,
        })
        .collect()
}

/// Score distribution for one CIA dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiaSummary {
    pub dimension: CiaDimension,
    pub count: usize,
    pub min: Option<u16>,
    pub max: Option<u16>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Distribution summary per dimension, in C, I, A order
pub fn cia_summary(aggregate: &CiaAggregate) -> Vec<CiaSummary> {
    CiaDimension::ALL
        .into_iter()
        .map(|dimension| {
            let mut values: Vec<u16> = aggregate
                .get(&dimension)
                .map(|scores| scores.iter().map(|s| s.score).collect())
                .unwrap_or_default();
            values.sort_unstable();

            let count = values.len();
            let mean = (count > 0)
                .then(|| values.iter().map(|&v| f64::from(v)).sum::<f64>() / count as f64);
            let median = match count {
                0 => None,
                n if n % 2 == 1 => Some(f64::from(values[n / 2])),
                n => Some((f64::from(values[n / 2 - 1]) + f64::from(values[n / 2])) / 2.0),
            };

            CiaSummary {
                dimension,
                count,
                min: values.first().copied(),
                max: values.last().copied(),
                mean,
                median,
            }
        })
        .collect()
}
