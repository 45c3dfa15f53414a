//! Risk engine over a borrowed catalog
//!
//! The engine owns nothing but a reference to the catalog. Every call reads
//! the catalog through the given segment filter and recomputes from scratch,
//! so results are safe to rebuild on each interaction.

use crate::coverage::{self, CoverageCell};
use crate::scorer::{self, CiaAggregate, CiaSummary, HeatmapCell, RiskScore};
use crate::{KillChainStage, SegmentFilter, Threat, ThreatCatalog, DEFAULT_RISK_THRESHOLD};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
pub struct RiskEngine<'a> {
    catalog: &'a ThreatCatalog,
}

/// Everything the SOC view needs for one filter/threshold selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub segment: SegmentFilter,
    pub threshold: u16,
    pub threats_considered: usize,
    /// All scores in catalog order
    pub scores: Vec<RiskScore>,
    /// Scores at or above the threshold, highest first
    pub high_risk: Vec<RiskScore>,
    pub cia: CiaAggregate,
    pub cia_summary: Vec<CiaSummary>,
    pub heatmap: Vec<HeatmapCell>,
}

impl<'a> RiskEngine<'a> {
    pub fn new(catalog: &'a ThreatCatalog) -> Self {
        Self { catalog }
    }

    pub fn score(&self, threat: &Threat) -> RiskScore {
        scorer::score(threat)
    }

    pub fn aggregate(&self, filter: SegmentFilter) -> CiaAggregate {
        scorer::aggregate(self.catalog.filtered(filter))
    }

    pub fn filter_high_risk(&self, filter: SegmentFilter, threshold: u16) -> Vec<&'a Threat> {
        scorer::filter_high_risk(self.catalog.filtered(filter), threshold)
    }

    pub fn coverage_matrix(&self) -> BTreeMap<KillChainStage, CoverageCell> {
        coverage::coverage_matrix()
    }

    /// Score, partition and rank the filtered catalog in one pass
    pub fn assess(&self, filter: SegmentFilter, threshold: u16) -> RiskAssessment {
        let threats = self.catalog.filtered(filter);
        let high = scorer::filter_high_risk(threats.iter().copied(), threshold);
        let cia = scorer::aggregate(threats.iter().copied());

        RiskAssessment {
            segment: filter,
            threshold,
            threats_considered: threats.len(),
            scores: scorer::score_all(threats.iter().copied()),
            high_risk: scorer::rank_by_score(high),
            cia_summary: scorer::cia_summary(&cia),
            cia,
            heatmap: scorer::heatmap(threats.iter().copied()),
        }
    }

    /// `assess` with the default highlight threshold
    pub fn assess_default(&self, filter: SegmentFilter) -> RiskAssessment {
        self.assess(filter, DEFAULT_RISK_THRESHOLD)
    }
}
