//! Field names of the sightings record layout.

/// Observation time.
pub const WHEN: &str = "when";
pub const OBSERVED_BY: &str = "observed_by";
pub const SPECIES: &str = "species";
pub const LOCATION: &str = "location";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const NOTES: &str = "notes";

/// Audit field: identifier of the upload that produced the row.
pub const BATCH_ID: &str = "batch_id";
/// Audit field: ISO-8601 time the upload was staged.
pub const LOAD_TIMESTAMP: &str = "load_timestamp";

/// Observation fields carried by every staged row, in declaration order.
pub const OBSERVATION_FIELDS: [&str; 7] = [
    WHEN,
    OBSERVED_BY,
    SPECIES,
    LOCATION,
    LATITUDE,
    LONGITUDE,
    NOTES,
];

/// Columns copied into the final store on promotion.
///
/// `batch_id` travels with the row so the destination can answer which
/// batches it already holds.
pub const FINAL_PROJECTION: [&str; 8] = [
    WHEN,
    OBSERVED_BY,
    SPECIES,
    LOCATION,
    LATITUDE,
    LONGITUDE,
    NOTES,
    BATCH_ID,
];

/// Fields that make a staged row admissible for promotion.
pub const ADMISSIBLE_REQUIRED: [&str; 3] = [SPECIES, LOCATION, WHEN];
