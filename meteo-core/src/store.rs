use crate::{
    error::StoreError,
    model::{Observation, Station},
};
use chrono::{DateTime, Utc};
use std::fmt::Debug;

pub mod sqlite;

pub use sqlite::SqliteObservationStore;

/// Persistence of stations and their observations.
///
/// The acquisition service treats `save` as best-effort; the browse
/// operations back the read side. Implementations are synchronous and
/// blocking by design.
pub trait ObservationStore: Send + Sync + Debug {
    /// Upsert the station's country (by code) and the station itself (by its
    /// name + coordinates identity, within [`crate::model::COORD_TOLERANCE_DEG`]),
    /// then append one row per observation. All rows of one call succeed or
    /// none do.
    fn save(&self, station: &Station) -> Result<(), StoreError>;

    /// All known station names, alphabetical.
    fn station_names(&self) -> Result<Vec<String>, StoreError>;

    /// Observation timestamps for a station, newest first.
    fn timestamps(&self, station_name: &str) -> Result<Vec<DateTime<Utc>>, StoreError>;

    /// The observation within the calendar second of `at` (half-open window
    /// `[t, t+1s)`); the most recent one wins when several fall in the
    /// window.
    fn find_observation(
        &self,
        station_name: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Observation>, StoreError>;

    /// Projection of a stored station: coordinates and country, no
    /// observations.
    fn find_by_name(&self, station_name: &str) -> Result<Option<Station>, StoreError>;
}
