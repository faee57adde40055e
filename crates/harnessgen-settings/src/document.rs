//! Configuration snapshot documents
//!
//! A snapshot is written as a versioned JSON document:
//!
//! ```json
//! {
//!   "version": "3.0",
//!   "tileType": "hexagon",
//!   "parameters": { "circumradius": 50.0, "magnetCount": 6.0 },
//!   "metadata": { "created": "2025-01-01T12:00:00Z", "validated": true }
//! }
//! ```
//!
//! Older files that are a bare name/value object are still accepted. Every
//! value read back goes through the parameter domain checks and is
//! normalized, and unknown names are refused.

use crate::error::{SettingsError, SettingsResult};
use chrono::{DateTime, Utc};
use harnessgen_core::{Param, ParameterSet, TileType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Version written into new documents
pub const DOCUMENT_VERSION: &str = "3.0";

/// Major versions this reader understands
const SUPPORTED_MAJOR: &[&str] = &["3"];

/// Document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub created: DateTime<Utc>,
    /// Whether the snapshot passed validation without errors when written
    pub validated: bool,
}

/// On-disk form of a parameter snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub version: String,
    pub tile_type: TileType,
    pub parameters: BTreeMap<String, f64>,
    pub metadata: Metadata,
}

impl SnapshotDocument {
    /// Capture a parameter set
    ///
    /// The tile type is stored once, at the top level.
    pub fn new(params: &ParameterSet, validated: bool) -> Self {
        let parameters = params
            .iter()
            .filter(|(param, _)| *param != Param::TileType)
            .map(|(param, value)| (param.name().to_string(), value))
            .collect();

        Self {
            version: DOCUMENT_VERSION.to_string(),
            tile_type: params.tile_type(),
            parameters,
            metadata: Metadata {
                created: Utc::now(),
                validated,
            },
        }
    }

    /// Rebuild the parameter set, checking every name and value
    ///
    /// Parameters missing from the document keep their defaults.
    pub fn to_params(&self) -> SettingsResult<ParameterSet> {
        check_version(&self.version)?;
        let params = ParameterSet::from_pairs(
            self.parameters
                .iter()
                .map(|(name, value)| (name.as_str(), *value)),
        )?;
        Ok(params.try_with(Param::TileType, self.tile_type.as_value())?)
    }
}

fn check_version(version: &str) -> SettingsResult<()> {
    let major = version.split('.').next().unwrap_or_default();
    if SUPPORTED_MAJOR.contains(&major) {
        Ok(())
    } else {
        Err(SettingsError::UnsupportedFormat(format!(
            "document version {version}"
        )))
    }
}

/// Serialize a snapshot to pretty JSON
///
/// A set that fails its domain checks is refused, so every document written
/// here can be read back.
pub fn serialize(params: &ParameterSet, validated: bool) -> SettingsResult<String> {
    params.check_domains()?;
    Ok(serde_json::to_string_pretty(&SnapshotDocument::new(
        params, validated,
    ))?)
}

/// Parse a snapshot from JSON, in either the versioned or the legacy form
pub fn deserialize(text: &str) -> SettingsResult<ParameterSet> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(map) = value else {
        return Err(SettingsError::InvalidDocument(
            "expected a JSON object".to_string(),
        ));
    };

    if map.contains_key("parameters") {
        let document: SnapshotDocument = serde_json::from_value(Value::Object(map))?;
        debug!(
            "Reading version {} snapshot ({} parameters)",
            document.version,
            document.parameters.len()
        );
        return document.to_params();
    }

    debug!("Reading legacy flat snapshot ({} entries)", map.len());
    let mut pairs = Vec::with_capacity(map.len());
    for (name, value) in &map {
        pairs.push((name.as_str(), legacy_value(name, value)?));
    }
    Ok(ParameterSet::from_pairs(pairs)?)
}

/// Numeric value of a legacy entry; the tile type may also be spelled out
fn legacy_value(name: &str, value: &Value) -> SettingsResult<f64> {
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| {
            SettingsError::InvalidDocument(format!("'{name}' is not representable"))
        }),
        Value::String(text) if name == Param::TileType.name() => text
            .parse::<TileType>()
            .map(TileType::as_value)
            .map_err(|_| SettingsError::InvalidDocument(format!("unknown tile type '{text}'"))),
        _ => Err(SettingsError::InvalidDocument(format!(
            "'{name}' must be a number"
        ))),
    }
}

/// Write a snapshot document to `path`
pub fn export_to_file(params: &ParameterSet, validated: bool, path: &Path) -> SettingsResult<()> {
    let text = serialize(params, validated)?;
    fs::write(path, text).map_err(|e| SettingsError::io(path, e))?;
    info!("Exported configuration to {}", path.display());
    Ok(())
}

/// Read a snapshot document from `path`
pub fn import_from_file(path: &Path) -> SettingsResult<ParameterSet> {
    let text = fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))?;
    let params = deserialize(&text)?;
    info!("Imported configuration from {}", path.display());
    Ok(params)
}
