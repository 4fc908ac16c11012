//! Batch provenance: which upload a staged set came from and when.

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::StampError;
use crate::fields;
use crate::record::StagedRecord;
use crate::value::FieldValue;

/// Batch id reported when a staged row carries none.
pub const UNKNOWN_BATCH_ID: &str = "UNKNOWN";

/// Provenance read from a staged set. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchProvenance {
    /// Opaque batch identifier, or [`UNKNOWN_BATCH_ID`].
    pub batch_id: String,
    /// ISO-8601 load time.
    pub load_timestamp: String,
    /// `batch_id` was absent and defaulted.
    pub batch_id_defaulted: bool,
    /// `load_timestamp` was absent and filled with the inspection time.
    pub load_timestamp_defaulted: bool,
}

/// Outcome of inspecting a staged set.
///
/// `NoData` is distinct from a batch whose id defaulted to `UNKNOWN`; an
/// empty staging area never produces a fabricated batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Provenance {
    NoData,
    Batch(BatchProvenance),
}

impl Provenance {
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    #[must_use]
    pub const fn batch(&self) -> Option<&BatchProvenance> {
        match self {
            Self::NoData => None,
            Self::Batch(b) => Some(b),
        }
    }
}

/// Audit fields stamped onto every row of an upload before it is staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStamp {
    pub batch_id: String,
    pub load_timestamp: DateTime<Utc>,
}

impl BatchStamp {
    /// Stamp for an upload happening now.
    ///
    /// # Errors
    ///
    /// Returns [`StampError`] if the OS random source is unavailable.
    pub fn now() -> Result<Self, StampError> {
        Self::at(Utc::now())
    }

    /// Stamp for an upload at `ts`.
    ///
    /// The id is `BATCH_<yyyymmddHHMMSS>_<micros>_<8 hex>` in UTC. The random
    /// suffix keeps two uploads stamped in the same instant apart.
    ///
    /// # Errors
    ///
    /// Returns [`StampError`] if the OS random source is unavailable.
    pub fn at(ts: DateTime<Utc>) -> Result<Self, StampError> {
        let mut suffix = [0u8; 4];
        getrandom::fill(&mut suffix).map_err(|e| StampError(e.to_string()))?;
        let batch_id = format!(
            "BATCH_{}_{:06}_{:08x}",
            ts.format("%Y%m%d%H%M%S"),
            ts.timestamp_subsec_micros(),
            u32::from_be_bytes(suffix)
        );
        Ok(Self::with_id(batch_id, ts))
    }

    /// Stamp with a caller-chosen id, e.g. to replay a known upload.
    #[must_use]
    pub fn with_id(batch_id: impl Into<String>, ts: DateTime<Utc>) -> Self {
        Self {
            batch_id: batch_id.into(),
            load_timestamp: ts,
        }
    }

    /// ISO-8601 rendering stored in the `load_timestamp` column.
    #[must_use]
    pub fn load_timestamp_iso(&self) -> String {
        self.load_timestamp
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Overwrite the audit fields of one record.
    pub fn apply(&self, record: &mut StagedRecord) {
        record.insert(fields::BATCH_ID, self.batch_id.as_str());
        record.insert(
            fields::LOAD_TIMESTAMP,
            FieldValue::Text(self.load_timestamp_iso()),
        );
    }

    /// Stamp a whole upload.
    #[must_use]
    pub fn stamp(&self, records: impl IntoIterator<Item = StagedRecord>) -> Vec<StagedRecord> {
        records
            .into_iter()
            .map(|mut record| {
                self.apply(&mut record);
                record
            })
            .collect()
    }
}
