//! Detection coverage over the kill chain
//!
//! Two read-only tables: per-stage detection coverage, and the finer
//! tactic × technique grid used for the coverage heatmap. Neither depends on
//! the live threat set.

use crate::KillChainStage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoverageLevel {
    None,
    Partial,
    Full,
}

impl CoverageLevel {
    /// 0 = none, 1 = partial, 2 = full
    pub fn score(&self) -> u8 {
        match self {
            CoverageLevel::None => 0,
            CoverageLevel::Partial => 1,
            CoverageLevel::Full => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCell {
    pub technique: KillChainStage,
    pub level: CoverageLevel,
}

/// Detection coverage per kill-chain stage
pub fn coverage_matrix() -> BTreeMap<KillChainStage, CoverageCell> {
    KillChainStage::ALL
        .into_iter()
        .map(|technique| {
            let level = match technique {
                KillChainStage::Reconnaissance => CoverageLevel::Partial,
                KillChainStage::InitialAccess => CoverageLevel::Full,
                KillChainStage::Execution => CoverageLevel::Partial,
                KillChainStage::Persistence => CoverageLevel::None,
                KillChainStage::CommandAndControl => CoverageLevel::Partial,
                KillChainStage::Impact => CoverageLevel::Full,
            };
            (technique, CoverageCell { technique, level })
        })
        .collect()
}

/// Space-flavoured techniques, one row each in the grid
pub const TECHNIQUES: [&str; 6] = [
    "RF Scanning",
    "Phishing Ground Staff",
    "SATCOM Protocol Abuse",
    "Backdoor in Ground SW",
    "C2 via Compromised GS",
    "Orbit/Attitude Manipulation",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechniqueCoverage {
    pub tactic: KillChainStage,
    pub technique: &'static str,
    pub level: CoverageLevel,
}

// Rows follow TECHNIQUES, columns follow KillChainStage::ALL
const GRID: [[CoverageLevel; 6]; 6] = {
    use CoverageLevel::{Full as F, None as N, Partial as P};
    [
        [F, P, N, N, N, P],
        [P, F, P, N, P, N],
        [N, P, P, N, P, P],
        [N, P, P, N, N, N],
        [N, N, P, P, F, P],
        [N, N, N, N, P, F],
    ]
};

/// Tactic × technique coverage, technique-major
pub fn technique_grid() -> Vec<TechniqueCoverage> {
    TECHNIQUES
        .iter()
        .zip(GRID.iter())
        .flat_map(|(&technique, row)| {
            KillChainStage::ALL
                .into_iter()
                .zip(row.iter())
                .map(move |(tactic, &level)| TechniqueCoverage {
                    tactic,
                    technique,
                    level,
                })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechniqueMean {
    pub technique: &'static str,
    /// Mean coverage score across tactics (0-2)
    pub mean_score: f64,
}

/// Mean coverage score per technique, in first-seen order
pub fn mean_coverage_by_technique(grid: &[TechniqueCoverage]) -> Vec<TechniqueMean> {
    let mut order: Vec<&'static str> = Vec::new();
    let mut totals: BTreeMap<&'static str, (u32, u32)> = BTreeMap::new();

    for cell in grid {
        let entry = totals.entry(cell.technique).or_insert_with(|| {
            order.push(cell.technique);
            (0, 0)
        });
        entry.0 += u32::from(cell.level.score());
        entry.1 += 1;
    }

    order
        .into_iter()
        .filter_map(|technique| {
            totals.get(technique).map(|&(sum, n)| TechniqueMean {
                technique,
                mean_score: f64::from(sum) / f64::from(n),
            })
        })
        .collect()
}
