//! SQLite-backed observation storage.
//!
//! Three tables: `countries` (code unique), `stations` (identity = name +
//! coordinates, FK to country, optional provider id) and `observations`
//! (FK to station, one row per measurement). Timestamps are stored as
//! RFC 3339 text in one fixed format, so range comparisons on the column
//! are lexicographically sound.

use chrono::{DateTime, Duration, SecondsFormat, Timelike, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;

use crate::{
    error::StoreError,
    model::{COORD_TOLERANCE_DEG, Country, Observation, Station},
};

use super::ObservationStore;

#[derive(Debug)]
pub struct SqliteObservationStore {
    // rusqlite connections are not Sync; the store is shared behind a mutex.
    conn: Mutex<Connection>,
}

impl SqliteObservationStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory database, for tests and ephemeral runs.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.lock().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS countries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                name TEXT
            );

            CREATE TABLE IF NOT EXISTS stations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                latitude REAL,
                longitude REAL,
                provider_id INTEGER,
                country_id INTEGER REFERENCES countries(id)
            );

            CREATE TABLE IF NOT EXISTS observations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                station_id INTEGER NOT NULL REFERENCES stations(id),
                measured_at TEXT NOT NULL,
                temperature REAL,
                pressure REAL,
                humidity REAL,
                visibility INTEGER,
                precipitation REAL,
                condition TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_stations_name ON stations(name);
            CREATE INDEX IF NOT EXISTS idx_observations_station_time
                ON observations(station_id, measured_at);
            "#,
        )?;
        Ok(())
    }
}

impl ObservationStore for SqliteObservationStore {
    fn save(&self, station: &Station) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let country_id = station
            .country
            .as_ref()
            .map(|country| upsert_country(&tx, country))
            .transpose()?;
        let station_id = upsert_station(&tx, station, country_id)?;
        for observation in &station.observations {
            insert_observation(&tx, station_id, observation)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn station_names(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT DISTINCT name FROM stations ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for name in rows {
            names.push(name?);
        }
        Ok(names)
    }

    fn timestamps(&self, station_name: &str) -> Result<Vec<DateTime<Utc>>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT o.measured_at
             FROM observations o
             JOIN stations s ON s.id = o.station_id
             WHERE s.name = ?1
             ORDER BY o.measured_at DESC, o.id DESC",
        )?;
        let rows = stmt.query_map(params![station_name], |row| row.get::<_, String>(0))?;

        let mut timestamps = Vec::new();
        for raw in rows {
            timestamps.push(parse_ts(&raw?)?);
        }
        Ok(timestamps)
    }

    fn find_observation(
        &self,
        station_name: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Observation>, StoreError> {
        let start = at.with_nanosecond(0).unwrap_or(at);
        let end = start + Duration::seconds(1);

        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT o.measured_at, o.temperature, o.pressure, o.humidity,
                        o.visibility, o.precipitation, o.condition
                 FROM observations o
                 JOIN stations s ON s.id = o.station_id
                 WHERE s.name = ?1 AND o.measured_at >= ?2 AND o.measured_at < ?3
                 ORDER BY o.measured_at DESC, o.id DESC
                 LIMIT 1",
                params![station_name, fmt_ts(start), fmt_ts(end)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<f64>>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                        row.get::<_, Option<f64>>(3)?,
                        row.get::<_, Option<i64>>(4)?,
                        row.get::<_, Option<f64>>(5)?,
                        row.get::<_, Option<String>>(6)?,
                    ))
                },
            )
            .optional()?;

        row.map(
            |(raw, temperature, pressure, humidity, visibility_m, precipitation_mm, condition)| {
                Ok(Observation {
                    measured_at: parse_ts(&raw)?,
                    temperature,
                    pressure,
                    humidity,
                    visibility_m,
                    precipitation_mm,
                    condition,
                })
            },
        )
        .transpose()
    }

    fn find_by_name(&self, station_name: &str) -> Result<Option<Station>, StoreError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT s.name, s.latitude, s.longitude, s.provider_id, c.code, c.name
                 FROM stations s
                 LEFT JOIN countries c ON c.id = s.country_id
                 WHERE s.name = ?1
                 ORDER BY s.id DESC
                 LIMIT 1",
                params![station_name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<f64>>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(name, latitude, longitude, provider_id, code, country_name)| Station {
            name,
            latitude,
            longitude,
            provider_id,
            country: code.map(|code| Country { code, name: country_name }),
            observations: Vec::new(),
        }))
    }
}

fn upsert_country(tx: &Transaction<'_>, country: &Country) -> Result<i64, StoreError> {
    // A name already on record is never replaced by an absent one.
    tx.execute(
        "INSERT INTO countries (code, name) VALUES (?1, ?2)
         ON CONFLICT(code) DO UPDATE SET name = COALESCE(excluded.name, countries.name)",
        params![country.code, country.name],
    )?;
    let id =
        tx.query_row("SELECT id FROM countries WHERE code = ?1", params![country.code], |row| {
            row.get(0)
        })?;
    Ok(id)
}

fn upsert_station(
    tx: &Transaction<'_>,
    station: &Station,
    country_id: Option<i64>,
) -> Result<i64, StoreError> {
    let existing: Option<i64> = match station.coordinates() {
        Some((lat, lon)) => tx
            .query_row(
                "SELECT id FROM stations
                 WHERE name = ?1
                   AND latitude IS NOT NULL AND longitude IS NOT NULL
                   AND ABS(latitude - ?2) <= ?4 AND ABS(longitude - ?3) <= ?4
                 ORDER BY id DESC
                 LIMIT 1",
                params![station.name, lat, lon, COORD_TOLERANCE_DEG],
                |row| row.get(0),
            )
            .optional()?,
        None => tx
            .query_row(
                "SELECT id FROM stations
                 WHERE name = ?1 AND latitude IS NULL AND longitude IS NULL
                 ORDER BY id DESC
                 LIMIT 1",
                params![station.name],
                |row| row.get(0),
            )
            .optional()?,
    };

    match existing {
        Some(id) => {
            tx.execute(
                "UPDATE stations
                 SET provider_id = COALESCE(?2, provider_id),
                     country_id = COALESCE(?3, country_id)
                 WHERE id = ?1",
                params![id, station.provider_id, country_id],
            )?;
            Ok(id)
        }
        None => {
            tx.execute(
                "INSERT INTO stations (name, latitude, longitude, provider_id, country_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    station.name,
                    station.latitude,
                    station.longitude,
                    station.provider_id,
                    country_id
                ],
            )?;
            Ok(tx.last_insert_rowid())
        }
    }
}

fn insert_observation(
    tx: &Transaction<'_>,
    station_id: i64,
    observation: &Observation,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO observations
             (station_id, measured_at, temperature, pressure, humidity,
              visibility, precipitation, condition)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            station_id,
            fmt_ts(observation.measured_at),
            observation.temperature,
            observation.pressure,
            observation.humidity,
            observation.visibility_m,
            observation.precipitation_mm,
            observation.condition
        ],
    )?;
    Ok(())
}

fn fmt_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidTimestamp(raw.to_string()))
}
