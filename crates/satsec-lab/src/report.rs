//! Report assembly
//!
//! Each report is a flat record built from one core call (or a small group
//! of them) and is ready to serialize without further transformation.

use crate::Result;
use link_budget::{LinkBudgetBreakdown, LinkBudgetParams, LinkBudgetResult};
use orbital_mechanics::{
    OrbitalElements, OrbitalState, SweepExtent, SweepField, SweepPoint, SweepRange,
};
use serde::Serialize;
use threat_risk::coverage::{mean_coverage_by_technique, TechniqueMean};
use threat_risk::{
    CoverageCell, RiskAssessment, RiskEngine, SegmentFilter, TechniqueCoverage, ThreatCatalog,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
}

impl ReportMetadata {
    fn now() -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrbitReport {
    pub elements: OrbitalElements,
    pub state: OrbitalState,
}

pub fn orbit_report(elements: OrbitalElements) -> Result<OrbitReport> {
    let state = orbital_mechanics::compute_state(&elements)?;
    debug!(
        "Orbit {:.0} km / {:.1} deg / e={:.3}: T={:.1} min, v={:.2} km/s",
        elements.altitude_km,
        elements.inclination_deg,
        elements.eccentricity,
        state.period_minutes,
        state.velocity_km_s
    );
    Ok(OrbitReport { elements, state })
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub base: OrbitalElements,
    pub field: SweepField,
    pub range: SweepRange,
    pub steps: usize,
    pub points: Vec<SweepPoint>,
    pub extent: Option<SweepExtent>,
}

pub fn sweep_report(base: OrbitalElements, range: SweepRange, steps: usize) -> Result<SweepReport> {
    info!(
        "Sweeping altitude {:.0}-{:.0} km in {} steps",
        range.min, range.max, steps
    );
    let points = orbital_mechanics::sweep(&base, SweepField::Altitude, range, steps)?;
    let extent = orbital_mechanics::sweep_extent(&points);

    Ok(SweepReport {
        base,
        field: SweepField::Altitude,
        range,
        steps,
        points,
        extent,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceReport {
    pub elements: OrbitalElements,
    pub radius_km: f64,
    /// Earth-centred inertial positions in km
    pub points: Vec<[f64; 3]>,
}

pub fn trace_report(elements: OrbitalElements, points: usize) -> Result<TraceReport> {
    let trace = orbital_mechanics::orbit_trace(&elements, points)?;
    Ok(TraceReport {
        elements,
        radius_km: elements.semi_major_axis_km(),
        points: trace,
    })
}

/// How the ground-to-satellite distance is given
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlantPath {
    Range { range_km: f64 },
    Elevation { elevation_deg: f64, altitude_km: f64 },
}

/// Free space path loss derived from link geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathGeometry {
    pub frequency_ghz: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_km: Option<f64>,
    pub range_km: f64,
    pub path_loss_db: f64,
}

pub fn path_geometry(path: SlantPath, frequency_ghz: f64) -> Result<PathGeometry> {
    let (range_km, elevation_deg, altitude_km) = match path {
        SlantPath::Range { range_km } => (range_km, None, None),
        SlantPath::Elevation {
            elevation_deg,
            altitude_km,
        } => (
            link_budget::slant_range_km(elevation_deg, altitude_km)?,
            Some(elevation_deg),
            Some(altitude_km),
        ),
    };
    let path_loss_db = link_budget::free_space_path_loss_db(range_km, frequency_ghz)?;

    debug!(
        "Slant range {:.1} km at {} GHz: FSPL {:.2} dB",
        range_km, frequency_ghz, path_loss_db
    );

    Ok(PathGeometry {
        frequency_ghz,
        elevation_deg,
        altitude_km,
        range_km,
        path_loss_db,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub params: LinkBudgetParams,
    pub result: LinkBudgetResult,
    pub breakdown: LinkBudgetBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PathGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth_hz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_to_noise_db: Option<f64>,
}

/// Link budget report. A geometry, when given, replaces `path_loss_db`.
pub fn link_report(
    mut params: LinkBudgetParams,
    geometry: Option<PathGeometry>,
    bandwidth_hz: Option<f64>,
) -> Result<LinkReport> {
    if let Some(geometry) = &geometry {
        params.path_loss_db = geometry.path_loss_db;
    }
    let breakdown = link_budget::breakdown(&params)?;
    let result = LinkBudgetResult {
        cn0_dbhz: breakdown.cn0_dbhz,
    };
    let carrier_to_noise_db = bandwidth_hz
        .map(|b| link_budget::carrier_to_noise_db(result.cn0_dbhz, b))
        .transpose()?;

    debug!("Link budget C/N0 = {:.1} dB-Hz", result.cn0_dbhz);

    Ok(LinkReport {
        params,
        result,
        breakdown,
        geometry,
        bandwidth_hz,
        carrier_to_noise_db,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreatReport {
    pub metadata: ReportMetadata,
    pub catalog_size: usize,
    pub assessment: RiskAssessment,
}

pub fn threat_report(catalog: &ThreatCatalog, filter: SegmentFilter, threshold: u16) -> ThreatReport {
    let assessment = RiskEngine::new(catalog).assess(filter, threshold);

    info!(
        "Assessed {} threats ({:?}), {} at or above {}",
        assessment.threats_considered,
        filter,
        assessment.high_risk.len(),
        threshold
    );
    for finding in &assessment.high_risk {
        debug!("{}: score {} ({})", finding.threat_id, finding.score, finding.tier);
    }

    ThreatReport {
        metadata: ReportMetadata::now(),
        catalog_size: catalog.len(),
        assessment,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub metadata: ReportMetadata,
    /// One cell per kill-chain stage, in stage order
    pub matrix: Vec<CoverageCell>,
    pub grid: Vec<TechniqueCoverage>,
    pub technique_means: Vec<TechniqueMean>,
}

pub fn coverage_report(catalog: &ThreatCatalog) -> CoverageReport {
    let matrix = RiskEngine::new(catalog)
        .coverage_matrix()
        .into_values()
        .collect();
    let grid = threat_risk::technique_grid();
    let technique_means = mean_coverage_by_technique(&grid);

    CoverageReport {
        metadata: ReportMetadata::now(),
        matrix,
        grid,
        technique_means,
    }
}
