//! Orbital Mechanics Library
//!
//! Two-body period and velocity model, altitude sweeps and orbit traces
//! for the satellite engineering lab.
//!
//! # Model
//!
//! ```text
//! a = R⊕ + h
//! T = 2π·√(a³/μ)
//! v = √(μ·(2/r̄ − 1/a)),  r̄ = a·(1 + e²/2)
//! ```
//!
//! `r̄` is the time-averaged radius of the ellipse, so an eccentric orbit
//! reports a slightly lower mean speed than the circular orbit with the same
//! semi-major axis. For `e = 0` the expression reduces to `v = √(μ/a)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

pub mod constants {
    /// Earth gravitational parameter μ (km³/s²)
    pub const MU_EARTH_KM3_S2: f64 = 398_600.4418;
    /// Mean Earth radius (km)
    pub const EARTH_RADIUS_KM: f64 = 6_371.0;
}

use constants::{EARTH_RADIUS_KM, MU_EARTH_KM3_S2};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrbitalElements {
    pub altitude_km: f64,
    pub inclination_deg: f64,
    pub eccentricity: f64,
}

impl OrbitalElements {
    /// Build and validate a set of elements
    pub fn new(altitude_km: f64, inclination_deg: f64, eccentricity: f64) -> Result<Self> {
        let elements = Self {
            altitude_km,
            inclination_deg,
            eccentricity,
        };
        elements.validate()?;
        Ok(elements)
    }

    pub fn circular(altitude_km: f64, inclination_deg: f64) -> Result<Self> {
        Self::new(altitude_km, inclination_deg, 0.0)
    }

    /// Check structural domain constraints. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        if !self.altitude_km.is_finite() || self.altitude_km <= 0.0 {
            return Err(OrbitalError::InvalidInput(format!(
                "altitude must be a positive number of km, got {}",
                self.altitude_km
            )));
        }
        if !self.inclination_deg.is_finite() || !(0.0..=180.0).contains(&self.inclination_deg) {
            return Err(OrbitalError::InvalidInput(format!(
                "inclination must be within [0, 180] deg, got {}",
                self.inclination_deg
            )));
        }
        if !self.eccentricity.is_finite() || !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitalError::InvalidInput(format!(
                "eccentricity must be within [0, 1), got {}",
                self.eccentricity
            )));
        }
        Ok(())
    }

    /// Semi-major axis in km (altitude is taken as mean altitude)
    pub fn semi_major_axis_km(&self) -> f64 {
        EARTH_RADIUS_KM + self.altitude_km
    }

    pub fn with_altitude(self, altitude_km: f64) -> Self {
        Self {
            altitude_km,
            ..self
        }
    }
}

/// Derived orbital quantities, never stored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrbitalState {
    pub period_minutes: f64,
    pub velocity_km_s: f64,
    pub semi_major_axis_km: f64,
    pub perigee_velocity_km_s: f64,
    pub apogee_velocity_km_s: f64,
}

/// Strategy seam for orbit models. Higher-fidelity propagators implement
/// this instead of special-casing the two-body path.
pub trait OrbitModel {
    fn compute_state(&self, elements: &OrbitalElements) -> Result<OrbitalState>;

    /// Evaluate the model at `steps` evenly spaced values of `field`.
    fn sweep(
        &self,
        base: &OrbitalElements,
        field: SweepField,
        range: SweepRange,
        steps: usize,
    ) -> Result<Vec<SweepPoint>> {
        range
            .values(steps)?
            .map(|value| {
                let elements = field.apply(base, value);
                Ok(SweepPoint {
                    value,
                    state: self.compute_state(&elements)?,
                })
            })
            .collect()
    }
}

/// Keplerian two-body model around a spherical Earth
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoBody;

impl OrbitModel for TwoBody {
    fn compute_state(&self, elements: &OrbitalElements) -> Result<OrbitalState> {
        elements.validate()?;
        Ok(propagation::two_body_state(elements))
    }
}

pub fn compute_state(elements: &OrbitalElements) -> Result<OrbitalState> {
    TwoBody.compute_state(elements)
}

pub fn sweep(
    base: &OrbitalElements,
    field: SweepField,
    range: SweepRange,
    steps: usize,
) -> Result<Vec<SweepPoint>> {
    TwoBody.sweep(base, field, range, steps)
}

pub mod propagation {
    use super::*;
    use std::f64::consts::TAU;

    /// Orbital period in seconds for semi-major axis `a_km`
    pub fn kepler_period_s(a_km: f64) -> f64 {
        TAU * (a_km.powi(3) / MU_EARTH_KM3_S2).sqrt()
    }

    /// Vis-viva speed (km/s) at radius `r_km` on an orbit with semi-major axis `a_km`
    pub fn vis_viva_km_s(r_km: f64, a_km: f64) -> f64 {
        (MU_EARTH_KM3_S2 * (2.0 / r_km - 1.0 / a_km)).sqrt()
    }

    /// Elements must already be validated.
    pub(crate) fn two_body_state(elements: &OrbitalElements) -> OrbitalState {
        let a = elements.semi_major_axis_km();
        let e = elements.eccentricity;

        let mean_radius = a * (1.0 + e * e / 2.0);

        OrbitalState {
            period_minutes: kepler_period_s(a) / 60.0,
            velocity_km_s: vis_viva_km_s(mean_radius, a),
            semi_major_axis_km: a,
            perigee_velocity_km_s: vis_viva_km_s(a * (1.0 - e), a),
            apogee_velocity_km_s: vis_viva_km_s(a * (1.0 + e), a),
        }
    }
}

/// Element varied by a sweep
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SweepField {
    Altitude,
}

impl SweepField {
    fn apply(&self, base: &OrbitalElements, value: f64) -> OrbitalElements {
        match self {
            SweepField::Altitude => base.with_altitude(value),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepRange {
    pub min: f64,
    pub max: f64,
}

impl SweepRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Evenly spaced values from `min` to `max` inclusive.
    ///
    /// The last value is exactly `max`; at least two steps are required so
    /// that both bounds appear in the sequence.
    pub fn values(&self, steps: usize) -> Result<SweepValues> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(OrbitalError::InvalidRange(format!(
                "bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(OrbitalError::InvalidRange(format!(
                "min must be below max, got [{}, {}]",
                self.min, self.max
            )));
        }
        if steps < 2 {
            return Err(OrbitalError::InvalidRange(format!(
                "a sweep needs at least 2 steps, got {}",
                steps
            )));
        }
        let values = SweepValues {
            min: self.min,
            max: self.max,
            steps,
            index: 0,
        };

        // Spacing below f64 resolution repeats values
        let mut previous: Option<f64> = None;
        for value in values.clone() {
            if previous.is_some_and(|p| value <= p) {
                return Err(OrbitalError::InvalidRange(format!(
                    "[{}, {}] is too narrow for {} distinct steps",
                    self.min, self.max, steps
                )));
            }
            previous = Some(value);
        }

        Ok(values)
    }
}

/// Restartable value sequence of a sweep; clone it to iterate again.
#[derive(Debug, Clone)]
pub struct SweepValues {
    min: f64,
    max: f64,
    steps: usize,
    index: usize,
}

impl Iterator for SweepValues {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.steps {
            return None;
        }
        let last = self.steps - 1;
        let value = if self.index == last {
            self.max
        } else {
            self.min + (self.max - self.min) * self.index as f64 / last as f64
        };
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SweepValues {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepPoint {
    /// Swept parameter value (km for altitude)
    pub value: f64,
    #[serde(flatten)]
    pub state: OrbitalState,
}

/// Rows holding the largest period and the largest velocity of a sweep
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepExtent {
    pub longest_period: SweepPoint,
    pub fastest: SweepPoint,
}

pub fn sweep_extent(points: &[SweepPoint]) -> Option<SweepExtent> {
    let longest_period = points
        .iter()
        .max_by(|a, b| a.state.period_minutes.total_cmp(&b.state.period_minutes))?;
    let fastest = points
        .iter()
        .max_by(|a, b| a.state.velocity_km_s.total_cmp(&b.state.velocity_km_s))?;
    Some(SweepExtent {
        longest_period: *longest_period,
        fastest: *fastest,
    })
}

pub mod trace {
    use super::*;
    use nalgebra::{Rotation3, Vector3};
    use std::f64::consts::TAU;

    /// Positions (km, Earth-centred inertial) around one revolution.
    ///
    /// The orbit is drawn as a circle of radius `a` whose plane is tilted
    /// about the x-axis by the inclination. First and last points coincide.
    pub fn orbit_trace(elements: &OrbitalElements, points: usize) -> Result<Vec<[f64; 3]>> {
        elements.validate()?;
        if points < 2 {
            return Err(OrbitalError::InvalidRange(format!(
                "an orbit trace needs at least 2 points, got {}",
                points
            )));
        }

        let radius = elements.semi_major_axis_km();
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inclination_deg.to_radians());
        let last = (points - 1) as f64;

        Ok((0..points)
            .map(|i| {
                let theta = TAU * i as f64 / last;
                let p = tilt * Vector3::new(radius * theta.cos(), radius * theta.sin(), 0.0);
                [p.x, p.y, p.z]
            })
            .collect())
    }
}

pub use trace::orbit_trace;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn starlink_shell() -> OrbitalElements {
        OrbitalElements::new(550.0, 53.0, 0.0).unwrap()
    }

    #[test]
    fn test_starlink_shell_period_and_velocity() {
        let state = compute_state(&starlink_shell()).unwrap();
        assert!((state.period_minutes - 95.6).abs() / 95.6 < 0.01, "period: {}", state.period_minutes);
        assert!((state.velocity_km_s - 7.59).abs() / 7.59 < 0.01, "velocity: {}", state.velocity_km_s);
        assert_eq!(state.semi_major_axis_km, 6921.0);
    }

    #[test]
    fn test_geostationary_period_is_one_sidereal_day() {
        let geo = OrbitalElements::circular(35_786.0, 0.0).unwrap();
        let state = compute_state(&geo).unwrap();
        // Mean Earth radius puts the period a little under 1436 min
        assert!((state.period_minutes - 1436.0).abs() < 20.0, "period: {}", state.period_minutes);
    }

    #[test]
    fn test_circular_orbit_has_uniform_speed() {
        let state = compute_state(&starlink_shell()).unwrap();
        assert_eq!(state.velocity_km_s, state.perigee_velocity_km_s);
        assert_eq!(state.velocity_km_s, state.apogee_velocity_km_s);
    }

    #[test]
    fn test_eccentricity_orders_speeds() {
        let circular = compute_state(&starlink_shell()).unwrap();
        let eccentric = compute_state(&OrbitalElements::new(550.0, 53.0, 0.1).unwrap()).unwrap();

        assert_eq!(circular.period_minutes, eccentric.period_minutes);
        assert!(eccentric.perigee_velocity_km_s > eccentric.velocity_km_s);
        assert!(eccentric.velocity_km_s > eccentric.apogee_velocity_km_s);
        assert!(eccentric.velocity_km_s < circular.velocity_km_s);
    }

    #[test]
    fn test_invalid_elements_rejected() {
        let cases = [
            (0.0, 53.0, 0.0),
            (-100.0, 53.0, 0.0),
            (550.0, 53.0, 1.0),
            (550.0, 53.0, -0.1),
            (550.0, 181.0, 0.0),
            (f64::NAN, 53.0, 0.0),
            (550.0, 53.0, f64::INFINITY),
        ];
        for (alt, inc, ecc) in cases {
            let elements = OrbitalElements {
                altitude_km: alt,
                inclination_deg: inc,
                eccentricity: ecc,
            };
            assert!(
                matches!(compute_state(&elements), Err(OrbitalError::InvalidInput(_))),
                "accepted ({}, {}, {})",
                alt,
                inc,
                ecc
            );
        }
    }

    #[test]
    fn test_sweep_shape() {
        let points = sweep(&starlink_shell(), SweepField::Altitude, SweepRange::new(300.0, 2000.0), 18).unwrap();
        assert_eq!(points.len(), 18);
        assert_eq!(points[0].value, 300.0);
        assert_eq!(points[17].value, 2000.0);
        assert!(points.windows(2).all(|w| w[0].value < w[1].value));
    }

    #[test]
    fn test_sweep_rejects_bad_ranges() {
        let base = starlink_shell();
        for (range, steps) in [
            (SweepRange::new(2000.0, 300.0), 10),
            (SweepRange::new(500.0, 500.0), 10),
            (SweepRange::new(300.0, f64::INFINITY), 10),
            (SweepRange::new(300.0, 2000.0), 1),
            (SweepRange::new(300.0, 2000.0), 0),
        ] {
            assert!(
                matches!(sweep(&base, SweepField::Altitude, range, steps), Err(OrbitalError::InvalidRange(_))),
                "accepted {:?} with {} steps",
                range,
                steps
            );
        }
    }

    #[test]
    fn test_sweep_rejects_range_narrower_than_step_resolution() {
        let base = OrbitalElements::circular(500.0, 53.0).unwrap();
        let max = f64::from_bits(550f64.to_bits() + 2);
        let result = sweep(&base, SweepField::Altitude, SweepRange::new(550.0, max), 5);
        assert!(matches!(result, Err(OrbitalError::InvalidRange(_))));

        // Three representable values fit three steps
        let values: Vec<f64> = SweepRange::new(550.0, max).values(3).unwrap().collect();
        assert_eq!(values.len(), 3);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sweep_below_surface_is_invalid_input() {
        let result = sweep(&starlink_shell(), SweepField::Altitude, SweepRange::new(-100.0, 500.0), 5);
        assert!(matches!(result, Err(OrbitalError::InvalidInput(_))));
    }

    #[test]
    fn test_sweep_values_restart() {
        let values = SweepRange::new(0.0, 1.0).values(5).unwrap();
        assert_eq!(values.len(), 5);
        let first: Vec<f64> = values.clone().collect();
        let second: Vec<f64> = values.collect();
        assert_eq!(first, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sweep_extent() {
        let points = sweep(&starlink_shell(), SweepField::Altitude, SweepRange::new(300.0, 2000.0), 5).unwrap();
        let extent = sweep_extent(&points).unwrap();
        assert_eq!(extent.longest_period.value, 2000.0);
        assert_eq!(extent.fastest.value, 300.0);
        assert!(sweep_extent(&[]).is_none());
    }

    #[test]
    fn test_sweep_point_serializes_flat() {
        let points = sweep(&starlink_shell(), SweepField::Altitude, SweepRange::new(300.0, 400.0), 2).unwrap();
        let json = serde_json::to_value(points[0]).unwrap();
        assert_eq!(json["value"], 300.0);
        assert!(json["period_minutes"].is_number());
        assert!(json.get("state").is_none());
    }

    #[test]
    fn test_orbit_trace_geometry() {
        let polar = OrbitalElements::circular(700.0, 90.0).unwrap();
        let trace = orbit_trace(&polar, 5).unwrap();
        assert_eq!(trace.len(), 5);

        let r = polar.semi_major_axis_km();
        for p in &trace {
            let norm = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((norm - r).abs() < 1e-6);
        }
        // Quarter revolution of a polar orbit sits over the pole
        assert!(trace[1][1].abs() < 1e-6);
        assert!((trace[1][2] - r).abs() < 1e-6);
        // Closed loop
        assert!((trace[0][0] - trace[4][0]).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_trace_needs_two_points() {
        let elements = starlink_shell();
        assert!(matches!(orbit_trace(&elements, 1), Err(OrbitalError::InvalidRange(_))));
    }

    proptest! {
        #[test]
        fn prop_compute_state_is_deterministic(
            alt in 100.0f64..50_000.0,
            inc in 0.0f64..=180.0,
            ecc in 0.0f64..0.9,
        ) {
            let elements = OrbitalElements::new(alt, inc, ecc).unwrap();
            let a = compute_state(&elements).unwrap();
            let b = compute_state(&elements).unwrap();
            prop_assert_eq!(a.period_minutes.to_bits(), b.period_minutes.to_bits());
            prop_assert_eq!(a.velocity_km_s.to_bits(), b.velocity_km_s.to_bits());
        }

        #[test]
        fn prop_period_rises_and_velocity_falls_with_altitude(
            low in 100.0f64..20_000.0,
            delta in 1.0f64..20_000.0,
            inc in 0.0f64..=180.0,
            ecc in 0.0f64..0.9,
        ) {
            let lower = compute_state(&OrbitalElements::new(low, inc, ecc).unwrap()).unwrap();
            let higher = compute_state(&OrbitalElements::new(low + delta, inc, ecc).unwrap()).unwrap();
            prop_assert!(lower.period_minutes < higher.period_minutes);
            prop_assert!(lower.velocity_km_s > higher.velocity_km_s);
        }

        #[test]
        fn prop_sweep_has_exact_endpoints(
            min in 100.0f64..10_000.0,
            span in 1.0f64..30_000.0,
            steps in 2usize..200,
        ) {
            let base = OrbitalElements::circular(500.0, 53.0).unwrap();
            let max = min + span;
            let points = sweep(&base, SweepField::Altitude, SweepRange::new(min, max), steps).unwrap();
            prop_assert_eq!(points.len(), steps);
            prop_assert_eq!(points[0].value, min);
            prop_assert_eq!(points[steps - 1].value, max);
            for w in points.windows(2) {
                prop_assert!(w[0].value < w[1].value);
                prop_assert!(w[0].state.period_minutes < w[1].state.period_minutes);
                prop_assert!(w[0].state.velocity_km_s > w[1].state.velocity_km_s);
            }
        }
    }
}
