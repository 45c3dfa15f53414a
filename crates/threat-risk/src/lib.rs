//! Satellite Threat Risk Engine
//!
//! Scores a static catalog of synthetic space-system threats, partitions the
//! scores by CIA dimension and maps kill-chain stages to detection coverage.
//!
//! # Scoring Model
//!
//! ```text
//! Risk(t) = L(t) · I(t),   L, I ∈ 1..=5   →   Risk ∈ 1..=25
//! ```
//!
//! | Tier     | Score  |
//! |----------|--------|
//! | Low      | 1–4    |
//! | Moderate | 5–9    |
//! | High     | 10–14  |
//! | Critical | 15–25  |
//!
//! Nothing here holds state between calls: the catalog is built once and
//! borrowed, every score and aggregate is recomputed from it on demand.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod catalog;
pub mod coverage;
pub mod engine;
pub mod loader;
pub mod scorer;

pub use catalog::ThreatCatalog;
pub use coverage::{coverage_matrix, technique_grid, CoverageCell, CoverageLevel, TechniqueCoverage};
pub use engine::{RiskAssessment, RiskEngine};
pub use scorer::{aggregate, filter_high_risk, score, CiaAggregate, HeatmapCell, RiskScore};

/// Lowest likelihood/impact rating
pub const MIN_RATING: u8 = 1;

/// Highest likelihood/impact rating
pub const MAX_RATING: u8 = 5;

/// Default minimum score highlighted as high risk
pub const DEFAULT_RISK_THRESHOLD: u16 = 9;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate threat id: {0}")]
    DuplicateId(String),
    #[error("Threat {id}: {field} must be within 1..=5, got {value}")]
    OutOfRange {
        id: String,
        field: &'static str,
        value: u8,
    },
    #[error("Threat at position {0} has an empty id")]
    EmptyId(usize),
}

pub type Result<T> = std::result::Result<T, RiskError>;

/// Operational segment of a space system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Space,
    Ground,
    Link,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Space => write!(f, "Space Segment"),
            Segment::Ground => write!(f, "Ground Segment"),
            Segment::Link => write!(f, "Link Segment"),
        }
    }
}

/// Segment selector; `All` keeps every threat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentFilter {
    #[default]
    All,
    Only(Segment),
}

impl SegmentFilter {
    pub fn matches(&self, segment: Segment) -> bool {
        match self {
            SegmentFilter::All => true,
            SegmentFilter::Only(s) => *s == segment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiaDimension {
    Confidentiality,
    Integrity,
    Availability,
}

impl CiaDimension {
    pub const ALL: [CiaDimension; 3] = [
        CiaDimension::Confidentiality,
        CiaDimension::Integrity,
        CiaDimension::Availability,
    ];
}

impl fmt::Display for CiaDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CiaDimension::Confidentiality => write!(f, "Confidentiality"),
            CiaDimension::Integrity => write!(f, "Integrity"),
            CiaDimension::Availability => write!(f, "Availability"),
        }
    }
}

/// Which CIA properties a threat affects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CiaImpact {
    #[serde(default)]
    pub confidentiality: bool,
    #[serde(default)]
    pub integrity: bool,
    #[serde(default)]
    pub availability: bool,
}

impl CiaImpact {
    pub const fn new(confidentiality: bool, integrity: bool, availability: bool) -> Self {
        Self {
            confidentiality,
            integrity,
            availability,
        }
    }

    pub fn affects(&self, dimension: CiaDimension) -> bool {
        match dimension {
            CiaDimension::Confidentiality => self.confidentiality,
            CiaDimension::Integrity => self.integrity,
            CiaDimension::Availability => self.availability,
        }
    }

    /// Affected dimensions in C, I, A order
    pub fn dimensions(&self) -> impl Iterator<Item = CiaDimension> {
        let cia = *self;
        CiaDimension::ALL.into_iter().filter(move |d| cia.affects(*d))
    }
}

/// Attack stage, reconnaissance through impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KillChainStage {
    Reconnaissance,
    InitialAccess,
    Execution,
    Persistence,
    CommandAndControl,
    Impact,
}

impl KillChainStage {
    pub const ALL: [KillChainStage; 6] = [
        KillChainStage::Reconnaissance,
        KillChainStage::InitialAccess,
        KillChainStage::Execution,
        KillChainStage::Persistence,
        KillChainStage::CommandAndControl,
        KillChainStage::Impact,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            KillChainStage::Reconnaissance => "Reconnaissance",
            KillChainStage::InitialAccess => "Initial Access",
            KillChainStage::Execution => "Execution",
            KillChainStage::Persistence => "Persistence",
            KillChainStage::CommandAndControl => "Command & Control",
            KillChainStage::Impact => "Impact",
        }
    }
}

impl fmt::Display for KillChainStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A synthetic threat record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    pub id: String,
    pub name: String,
    pub segment: Segment,
    /// 1 (rare) to 5 (almost certain)
    pub likelihood: u8,
    /// 1 (negligible) to 5 (mission loss)
    pub impact: u8,
    pub cia: CiaImpact,
    pub technique: KillChainStage,
}

impl Threat {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        segment: Segment,
        likelihood: u8,
        impact: u8,
        cia: CiaImpact,
        technique: KillChainStage,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            segment,
            likelihood,
            impact,
            cia,
            technique,
        }
    }
}

/// Risk tier classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// 1 - 4
    Low,
    /// 5 - 9
    Moderate,
    /// 10 - 14
    High,
    /// 15 - 25
    Critical,
}

impl RiskTier {
    /// Classify a likelihood × impact score
    pub fn from_score(score: u16) -> Self {
        match score {
            0..=4 => RiskTier::Low,
            5..=9 => RiskTier::Moderate,
            10..=14 => RiskTier::High,
            _ => RiskTier::Critical,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High Risk",
            RiskTier::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
