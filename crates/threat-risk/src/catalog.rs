//! Static threat catalog
//!
//! Reference data, not a live feed. Entries are fixed at construction and
//! only read or filtered afterwards, always in catalog order.

use crate::{
    CiaImpact, KillChainStage, Result, RiskError, Segment, SegmentFilter, Threat, MAX_RATING,
    MIN_RATING,
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatCatalog {
    threats: Vec<Threat>,
}

impl ThreatCatalog {
    /// Build a catalog from records, rejecting empty or duplicate ids and
    /// ratings outside 1..=5. Order is preserved.
    pub fn new(threats: Vec<Threat>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(threats.len());

        for (i, threat) in threats.iter().enumerate() {
            if threat.id.trim().is_empty() {
                return Err(RiskError::EmptyId(i));
            }
            if !seen.insert(threat.id.as_str()) {
                return Err(RiskError::DuplicateId(threat.id.clone()));
            }
            check_rating(&threat.id, "likelihood", threat.likelihood)?;
            check_rating(&threat.id, "impact", threat.impact)?;
        }

        Ok(Self { threats })
    }

    /// Built-in space operations catalog (space, ground and link segments)
    pub fn space_operations() -> Self {
        const C: CiaImpact = CiaImpact::new(true, false, false);
        const CI: CiaImpact = CiaImpact::new(true, true, false);
        const IA: CiaImpact = CiaImpact::new(false, true, true);
        const CA: CiaImpact = CiaImpact::new(true, false, true);
        const A: CiaImpact = CiaImpact::new(false, false, true);
        const CIA: CiaImpact = CiaImpact::new(true, true, true);

        use KillChainStage::*;
        use Segment::*;

        let threats = vec![
            Threat::new("rf-scanning", "RF Scanning", Link, 5, 1, C, Reconnaissance),
            Threat::new("gnss-spoofing", "GNSS Spoofing", Link, 4, 4, IA, Impact),
            Threat::new("uplink-jamming", "Uplink Jamming", Link, 3, 4, A, Impact),
            Threat::new("downlink-jamming", "Downlink Jamming", Link, 4, 3, A, Impact),
            Threat::new("gs-intrusion", "Ground Station Intrusion", Ground, 3, 5, CIA, InitialAccess),
            Threat::new("phishing-ground-staff", "Phishing Ground Staff", Ground, 4, 3, C, InitialAccess),
            Threat::new("supply-chain-malware", "Supply Chain Malware", Ground, 2, 5, CI, Persistence),
            Threat::new("ground-ransomware", "Ransomware in Ground IT", Ground, 4, 4, CA, Impact),
            Threat::new("insider-threat", "Insider Threat", Ground, 2, 4, CI, InitialAccess),
            Threat::new("sat-bus-exploit", "Sat Bus Exploit", Space, 2, 5, IA, Execution),
            Threat::new("command-injection", "Command Injection", Space, 3, 5, IA, Execution),
            Threat::new("data-exfiltration", "Data Exfiltration", Space, 3, 4, C, CommandAndControl),
        ];

        Self { threats }
    }

    pub fn all(&self) -> &[Threat] {
        &self.threats
    }

    pub fn by_segment(&self, segment: Segment) -> Vec<&Threat> {
        self.filtered(SegmentFilter::Only(segment))
    }

    pub fn filtered(&self, filter: SegmentFilter) -> Vec<&Threat> {
        self.threats
            .iter()
            .filter(|t| filter.matches(t.segment))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Threat> {
        self.threats.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.threats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threats.is_empty()
    }
}

impl Default for ThreatCatalog {
    fn default() -> Self {
        Self::space_operations()
    }
}

fn check_rating(id: &str, field: &'static str, value: u8) -> Result<()> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        Ok(())
    } else {
        Err(RiskError::OutOfRange {
            id: id.to_string(),
            field,
            value,
        })
    }
}
