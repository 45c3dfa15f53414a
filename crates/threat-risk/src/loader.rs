//! Catalog loading from JSON files
//!
//! Accepts either a bare array of threats or an object with a `threats`
//! field. Records go through the same validation as the built-in catalog.

use crate::{Result, RiskError, Threat, ThreatCatalog};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Load a threat catalog from a JSON file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<ThreatCatalog> {
    let path = path.as_ref();
    info!("Loading threat catalog from {:?}", path);

    let file = File::open(path)?;
    let catalog = read_catalog(BufReader::new(file))?;

    info!("Loaded {} threats", catalog.len());
    Ok(catalog)
}

/// Parse and validate a catalog from any JSON reader
pub fn read_catalog(reader: impl Read) -> Result<ThreatCatalog> {
    let raw: serde_json::Value = serde_json::from_reader(reader)?;

    let threats: Vec<Threat> = if let Some(list) = raw.get("threats") {
        serde_json::from_value(list.clone())?
    } else if raw.is_array() {
        serde_json::from_value(raw)?
    } else {
        return Err(RiskError::Json(serde::de::Error::custom(
            "expected an array of threats or an object with a `threats` field",
        )));
    };

    for threat in &threats {
        debug!(
            "Threat {}: {:?} L{} I{}",
            threat.id, threat.segment, threat.likelihood, threat.impact
        );
    }

    ThreatCatalog::new(threats)
}
