use crate::catalog;
use crate::structures::{IndicatorValue, Village, ALL_DISTRICTS};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};

/// The dataset source is unusable. Callers degrade to an empty result set
/// instead of proceeding with partial data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset file not found or unreadable: {path:?}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset file is malformed: {path:?}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw record as found on disk. The converter emits `IDDESA`/`NAMA_KEC`/
/// `NAMA_DESA` while the dashboard export uses the lowercase names, so both
/// spellings are accepted.
#[derive(Deserialize)]
struct RawVillage {
    #[serde(alias = "IDDESA")]
    id_desa: Value,
    #[serde(alias = "NAMA_KEC")]
    nama_kecamatan: String,
    #[serde(alias = "NAMA_DESA")]
    nama_desa: String,
    #[serde(flatten)]
    fields: serde_json::Map<String, Value>,
}

/// Read-only access to the survey dataset. The file is parsed once per
/// repository and the rows are cached for the process lifetime; a failed
/// load is not cached, so a later call re-reads the file.
pub struct DatasetRepository {
    path: PathBuf,
    cache: OnceLock<Vec<Village>>,
}

impl DatasetRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<&[Village], DataError> {
        if let Some(rows) = self.cache.get() {
            return Ok(rows);
        }
        let rows = self.read_rows()?;
        Ok(self.cache.get_or_init(|| rows))
    }

    fn read_rows(&self) -> Result<Vec<Village>, DataError> {
        let text = fs::read_to_string(&self.path).map_err(|source| DataError::Missing {
            path: self.path.clone(),
            source,
        })?;
        let raw: Vec<RawVillage> =
            serde_json::from_str(&text).map_err(|source| DataError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        let villages: Vec<Village> = raw.into_iter().map(normalize).collect();
        info!(villages = villages.len(), path = ?self.path, "dataset loaded");
        Ok(villages)
    }

    /// Sorted distinct district names, prefixed with the ALL sentinel.
    pub fn districts(&self) -> Result<Vec<String>, DataError> {
        let rows = self.load()?;
        let distinct: BTreeSet<&str> = rows.iter().map(|v| v.district.as_str()).collect();
        let mut list = Vec::with_capacity(distinct.len() + 1);
        list.push(ALL_DISTRICTS.to_string());
        list.extend(distinct.into_iter().map(str::to_string));
        Ok(list)
    }

    /// Sorted distinct village names within a district (or all of them for
    /// the ALL sentinel).
    pub fn villages_in(&self, district: &str) -> Result<Vec<String>, DataError> {
        let rows = self.load()?;
        let distinct: BTreeSet<&str> = rows
            .iter()
            .filter(|v| district == ALL_DISTRICTS || v.district == district)
            .map(|v| v.name.as_str())
            .collect();
        Ok(distinct.into_iter().map(str::to_string).collect())
    }
}

fn normalize(raw: RawVillage) -> Village {
    let mut values: HashMap<String, IndicatorValue> = HashMap::new();
    for (key, value) in raw.fields {
        match value {
            Value::Number(n) => {
                values.insert(key, IndicatorValue::Count(number_to_count(&n)));
            }
            Value::String(s) if !s.trim().is_empty() => {
                values.insert(key, IndicatorValue::Status(s));
            }
            // Null, empty strings and nested values carry no indicator data.
            _ => {}
        }
    }

    // Count fields are always present downstream; missing or unreadable
    // values become 0 rather than a missing-value marker.
    for key in catalog::COUNT_FIELDS {
        let coerced = match values.get(*key) {
            Some(v) => v.as_number().unwrap_or_else(|| {
                warn!(village = %raw.nama_desa, field = %key, "non-numeric count value coerced to 0");
                0
            }),
            None => 0,
        };
        values.insert((*key).to_string(), IndicatorValue::Count(coerced));
    }

    Village {
        id: stringify_id(raw.id_desa),
        district: raw.nama_kecamatan,
        name: raw.nama_desa,
        values,
    }
}

fn number_to_count(n: &serde_json::Number) -> i64 {
    n.as_i64()
        .or_else(|| n.as_f64().map(|f| f as i64))
        .unwrap_or(0)
}

fn stringify_id(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
