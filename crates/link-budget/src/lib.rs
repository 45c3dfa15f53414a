//! RF Link Budget Calculator
//!
//! Toy carrier-to-noise-density estimate for a satellite downlink.
//! Every term is in dB or a dB-referenced unit, so the budget is a plain
//! linear combination:
//!
//! ```text
//! C/N₀ [dB-Hz] = EIRP − L_path + G_tx + G_rx − L_sys − NF
//! ```
//!
//! Gains add and losses subtract. Bandwidth, system temperature, modulation,
//! coding and rain fade are not modelled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkBudgetError {
    #[error("Non-finite link budget term: {0}")]
    NonFinite(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, LinkBudgetError>;

/// Speed of light term of the free space path loss for km and GHz
const FSPL_CONSTANT_DB: f64 = 92.45;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkBudgetParams {
    pub eirp_dbw: f64,
    pub path_loss_db: f64,
    pub tx_gain_db: f64,
    pub rx_gain_db: f64,
    pub system_loss_db: f64,
    pub noise_figure_db: f64,
}

impl LinkBudgetParams {
    fn check_finite(&self) -> Result<()> {
        let terms = [
            ("eirp_dbw", self.eirp_dbw),
            ("path_loss_db", self.path_loss_db),
            ("tx_gain_db", self.tx_gain_db),
            ("rx_gain_db", self.rx_gain_db),
            ("system_loss_db", self.system_loss_db),
            ("noise_figure_db", self.noise_figure_db),
        ];
        match terms.into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(LinkBudgetError::NonFinite(name)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkBudgetResult {
    pub cn0_dbhz: f64,
}

/// Carrier-to-noise-density ratio in dB-Hz
pub fn compute_cn0(params: &LinkBudgetParams) -> Result<LinkBudgetResult> {
    params.check_finite()?;

    let cn0_dbhz = params.eirp_dbw - params.path_loss_db + params.tx_gain_db + params.rx_gain_db
        - params.system_loss_db
        - params.noise_figure_db;

    Ok(LinkBudgetResult { cn0_dbhz })
}

/// One signed contribution to the budget
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetTerm {
    pub name: &'static str,
    pub value_db: f64,
    /// Contribution with sign applied
    pub contribution_db: f64,
}

/// Detailed link budget breakdown
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinkBudgetBreakdown {
    pub terms: Vec<BudgetTerm>,
    pub cn0_dbhz: f64,
}

/// Get detailed breakdown
pub fn breakdown(params: &LinkBudgetParams) -> Result<LinkBudgetBreakdown> {
    let result = compute_cn0(params)?;

    let term = |name, value_db: f64, sign: f64| BudgetTerm {
        name,
        value_db,
        contribution_db: sign * value_db,
    };

    Ok(LinkBudgetBreakdown {
        terms: vec![
            term("eirp", params.eirp_dbw, 1.0),
            term("path_loss", params.path_loss_db, -1.0),
            term("tx_gain", params.tx_gain_db, 1.0),
            term("rx_gain", params.rx_gain_db, 1.0),
            term("system_loss", params.system_loss_db, -1.0),
            term("noise_figure", params.noise_figure_db, -1.0),
        ],
        cn0_dbhz: result.cn0_dbhz,
    })
}

/// Free space path loss in dB for a slant range (km) and carrier frequency (GHz)
pub fn free_space_path_loss_db(range_km: f64, frequency_ghz: f64) -> Result<f64> {
    if !range_km.is_finite() || range_km <= 0.0 {
        return Err(LinkBudgetError::InvalidInput(format!("range must be positive km, got {}", range_km)));
    }
    if !frequency_ghz.is_finite() || frequency_ghz <= 0.0 {
        return Err(LinkBudgetError::InvalidInput(format!(
            "frequency must be positive GHz, got {}",
            frequency_ghz
        )));
    }
    Ok(20.0 * range_km.log10() + 20.0 * frequency_ghz.log10() + FSPL_CONSTANT_DB)
}

/// Slant range (km) from a ground station to a satellite at `altitude_km`
/// seen at `elevation_deg` above the horizon
pub fn slant_range_km(elevation_deg: f64, altitude_km: f64) -> Result<f64> {
    if !elevation_deg.is_finite() || !(0.0..=90.0).contains(&elevation_deg) {
        return Err(LinkBudgetError::InvalidInput(format!(
            "elevation must be within [0, 90] deg, got {}",
            elevation_deg
        )));
    }
    if !altitude_km.is_finite() || altitude_km <= 0.0 {
        return Err(LinkBudgetError::InvalidInput(format!(
            "altitude must be positive km, got {}",
            altitude_km
        )));
    }

    let sat_r = EARTH_RADIUS_KM + altitude_km;
    let sin_el = elevation_deg.to_radians().sin();

    // Law of cosines on the Earth-centre / station / satellite triangle
    Ok(-EARTH_RADIUS_KM * sin_el + ((EARTH_RADIUS_KM * sin_el).powi(2) + sat_r.powi(2) - EARTH_RADIUS_KM.powi(2)).sqrt())
}

/// Carrier-to-noise ratio (dB) in a receiver bandwidth
pub fn carrier_to_noise_db(cn0_dbhz: f64, bandwidth_hz: f64) -> Result<f64> {
    if !cn0_dbhz.is_finite() {
        return Err(LinkBudgetError::NonFinite("cn0_dbhz"));
    }
    if !bandwidth_hz.is_finite() || bandwidth_hz <= 0.0 {
        return Err(LinkBudgetError::InvalidInput(format!(
            "bandwidth must be positive Hz, got {}",
            bandwidth_hz
        )));
    }
    Ok(cn0_dbhz - 10.0 * bandwidth_hz.log10())
}
