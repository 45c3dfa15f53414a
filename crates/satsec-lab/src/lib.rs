//! Satellite Engineering & Cyber-Risk Lab
//!
//! Assembles the orbital, link budget and threat risk libraries into flat,
//! serializable reports. The `satsec-lab` binary prints them as JSON for the
//! presentation layer.
//!
//! # Reports
//!
//! | Report | Source |
//! |--------|--------|
//! | orbit    | `orbital_mechanics::compute_state` |
//! | sweep    | `orbital_mechanics::sweep` over altitude |
//! | trace    | `orbital_mechanics::orbit_trace` |
//! | link     | `link_budget::breakdown` (+ FSPL from geometry, C/N for a bandwidth) |
//! | threats  | `threat_risk::RiskEngine::assess` |
//! | coverage | kill-chain matrix + tactic × technique grid |

use thiserror::Error;

pub mod report;

pub use report::{
    coverage_report, link_report, orbit_report, path_geometry, sweep_report, threat_report,
    trace_report, CoverageReport, LinkReport, OrbitReport, PathGeometry, ReportMetadata,
    SlantPath, SweepReport, ThreatReport, TraceReport,
};

/// Orbit defaults (700 km sun-synchronous, circular)
pub const DEFAULT_ALTITUDE_KM: f64 = 700.0;
pub const DEFAULT_INCLINATION_DEG: f64 = 98.0;
pub const DEFAULT_ECCENTRICITY: f64 = 0.0;

/// Altitude sweep defaults
pub const DEFAULT_SWEEP_MIN_KM: f64 = 300.0;
pub const DEFAULT_SWEEP_MAX_KM: f64 = 2000.0;
pub const DEFAULT_SWEEP_STEPS: usize = 18;

pub const DEFAULT_TRACE_POINTS: usize = 400;

/// Link budget defaults
pub const DEFAULT_EIRP_DBW: f64 = 45.0;
pub const DEFAULT_PATH_LOSS_DB: f64 = 190.0;
pub const DEFAULT_TX_GAIN_DB: f64 = 0.0;
pub const DEFAULT_RX_GAIN_DB: f64 = 35.0;
pub const DEFAULT_SYSTEM_LOSS_DB: f64 = 3.0;
pub const DEFAULT_NOISE_FIGURE_DB: f64 = 4.0;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Orbital model error: {0}")]
    Orbital(#[from] orbital_mechanics::OrbitalError),
    #[error("Link budget error: {0}")]
    LinkBudget(#[from] link_budget::LinkBudgetError),
    #[error("Threat catalog error: {0}")]
    Risk(#[from] threat_risk::RiskError),
}

pub type Result<T> = std::result::Result<T, LabError>;
