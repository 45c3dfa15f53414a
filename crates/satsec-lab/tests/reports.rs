use link_budget::LinkBudgetParams;
use orbital_mechanics::{OrbitalElements, SweepRange};
use satsec_lab::*;
use std::io::Write;
use tempfile::NamedTempFile;
use threat_risk::{loader, Segment, SegmentFilter, ThreatCatalog};

fn default_params() -> LinkBudgetParams {
    LinkBudgetParams {
        eirp_dbw: DEFAULT_EIRP_DBW,
        path_loss_db: DEFAULT_PATH_LOSS_DB,
        tx_gain_db: DEFAULT_TX_GAIN_DB,
        rx_gain_db: DEFAULT_RX_GAIN_DB,
        system_loss_db: DEFAULT_SYSTEM_LOSS_DB,
        noise_figure_db: DEFAULT_NOISE_FIGURE_DB,
    }
}

#[test]
fn test_orbit_report_starlink_shell() {
    let elements = OrbitalElements::circular(550.0, 53.0).unwrap();
    let report = orbit_report(elements).unwrap();

    assert!((report.state.period_minutes - 95.6).abs() < 1.0);
    assert!((report.state.velocity_km_s - 7.59).abs() < 0.08);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["elements"]["altitude_km"], 550.0);
    assert!(json["state"]["period_minutes"].is_number());
}

#[test]
fn test_link_report_defaults() {
    let report = link_report(default_params(), None, None).unwrap();
    assert!((report.result.cn0_dbhz - (-117.0)).abs() < 1e-9);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("bandwidth_hz").is_none());
    assert!(json.get("carrier_to_noise_db").is_none());
}

#[test]
fn test_link_report_with_bandwidth() {
    let params = LinkBudgetParams {
        eirp_dbw: 50.0,
        path_loss_db: 190.0,
        tx_gain_db: 0.0,
        rx_gain_db: 55.0,
        system_loss_db: 2.0,
        noise_figure_db: 3.0,
    };
    let report = link_report(params, None, Some(1.0e6)).unwrap();

    assert!((report.result.cn0_dbhz - (-90.0)).abs() < 1e-9);
    let cn = report.carrier_to_noise_db.unwrap();
    assert!((cn - (-150.0)).abs() < 1e-9);
    assert_eq!(report.breakdown.terms.len(), 6);
}

#[test]
fn test_link_report_rejects_bad_bandwidth() {
    assert!(matches!(
        link_report(default_params(), None, Some(0.0)),
        Err(LabError::LinkBudget(_))
    ));
}

#[test]
fn test_link_report_path_loss_from_elevation() {
    let slant = SlantPath::Elevation {
        elevation_deg: 90.0,
        altitude_km: 550.0,
    };
    let geometry = path_geometry(slant, 12.0).unwrap();
    assert!((geometry.range_km - 550.0).abs() < 1e-6);
    // 20·log10(550) + 20·log10(12) + 92.45
    assert!((geometry.path_loss_db - 168.84).abs() < 0.01, "FSPL: {}", geometry.path_loss_db);

    let report = link_report(default_params(), Some(geometry), None).unwrap();
    assert_eq!(report.params.path_loss_db, geometry.path_loss_db);
    let expected = DEFAULT_EIRP_DBW - geometry.path_loss_db + DEFAULT_TX_GAIN_DB + DEFAULT_RX_GAIN_DB
        - DEFAULT_SYSTEM_LOSS_DB
        - DEFAULT_NOISE_FIGURE_DB;
    assert!((report.result.cn0_dbhz - expected).abs() < 1e-9);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["geometry"]["elevation_deg"], 90.0);
}

#[test]
fn test_path_geometry_from_range() {
    let geometry = path_geometry(SlantPath::Range { range_km: 35_786.0 }, 12.0).unwrap();
    assert!((geometry.path_loss_db - 205.1).abs() < 0.2);
    assert!(geometry.elevation_deg.is_none());

    assert!(matches!(
        path_geometry(SlantPath::Range { range_km: 0.0 }, 12.0),
        Err(LabError::LinkBudget(_))
    ));
    let below_horizon = SlantPath::Elevation {
        elevation_deg: -5.0,
        altitude_km: 550.0,
    };
    assert!(matches!(path_geometry(below_horizon, 12.0), Err(LabError::LinkBudget(_))));
}

#[test]
fn test_sweep_report_shape() {
    let base = OrbitalElements::circular(DEFAULT_ALTITUDE_KM, DEFAULT_INCLINATION_DEG).unwrap();
    let report = sweep_report(
        base,
        SweepRange::new(DEFAULT_SWEEP_MIN_KM, DEFAULT_SWEEP_MAX_KM),
        DEFAULT_SWEEP_STEPS,
    )
    .unwrap();

    assert_eq!(report.points.len(), DEFAULT_SWEEP_STEPS);
    assert_eq!(report.points[0].value, DEFAULT_SWEEP_MIN_KM);
    assert_eq!(report.points.last().unwrap().value, DEFAULT_SWEEP_MAX_KM);

    let extent = report.extent.unwrap();
    assert_eq!(extent.longest_period.value, DEFAULT_SWEEP_MAX_KM);
    assert_eq!(extent.fastest.value, DEFAULT_SWEEP_MIN_KM);
}

#[test]
fn test_sweep_report_bad_range() {
    let base = OrbitalElements::circular(700.0, 98.0).unwrap();
    assert!(matches!(
        sweep_report(base, SweepRange::new(2000.0, 300.0), 10),
        Err(LabError::Orbital(_))
    ));
}

#[test]
fn test_trace_report_radius() {
    let elements = OrbitalElements::circular(700.0, 98.0).unwrap();
    let report = trace_report(elements, 64).unwrap();

    assert_eq!(report.points.len(), 64);
    for [x, y, z] in &report.points {
        let r = (x * x + y * y + z * z).sqrt();
        assert!((r - report.radius_km).abs() < 1e-6);
    }
}

#[test]
fn test_threat_report_json_shape() {
    let catalog = ThreatCatalog::space_operations();
    let report = threat_report(&catalog, SegmentFilter::All, 12);

    assert_eq!(report.catalog_size, catalog.len());
    assert!(report.assessment.high_risk.iter().all(|s| s.score >= 12));

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["metadata"]["generated_at"].is_string());
    assert!(json["assessment"]["cia"]["confidentiality"].is_array());
    assert!(json["assessment"]["cia"]["integrity"].is_array());
    assert!(json["assessment"]["cia"]["availability"].is_array());
}

#[test]
fn test_threat_report_segment_filter() {
    let catalog = ThreatCatalog::space_operations();
    let report = threat_report(&catalog, SegmentFilter::Only(Segment::Ground), 1);

    let ground = catalog.by_segment(Segment::Ground).len();
    assert_eq!(report.assessment.threats_considered, ground);
    assert_eq!(report.assessment.high_risk.len(), ground);
}

#[test]
fn test_coverage_report_dimensions() {
    let catalog = ThreatCatalog::space_operations();
    let report = coverage_report(&catalog);

    assert_eq!(report.matrix.len(), 6);
    assert_eq!(report.grid.len(), 36);
    assert_eq!(report.technique_means.len(), 6);
}

#[test]
fn test_threat_report_from_loaded_catalog() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{"threats": [
            {"id": "jam", "name": "Uplink Jamming", "segment": "link", "likelihood": 5, "impact": 5,
             "cia": {"availability": true}, "technique": "impact"},
            {"id": "scan", "name": "RF Scanning", "segment": "link", "likelihood": 1, "impact": 1,
             "cia": {"confidentiality": true}, "technique": "reconnaissance"}
        ]}"#,
    )
    .unwrap();

    let catalog = loader::load_catalog(file.path()).unwrap();
    let report = threat_report(&catalog, SegmentFilter::All, 9);

    assert_eq!(report.catalog_size, 2);
    assert_eq!(report.assessment.high_risk.len(), 1);
    assert_eq!(report.assessment.high_risk[0].threat_id, "jam");
    assert_eq!(report.assessment.high_risk[0].score, 25);
}
