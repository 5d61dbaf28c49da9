//! The acquisition service: one weather fetch, a best-effort country
//! enrichment, a best-effort save.
//!
//! Only the weather fetch can fail the operation. Everything downstream
//! degrades to "best available data": a failed resolution falls back to the
//! local name table, a failed save is logged and swallowed.

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    country::{CountryResolver, CountryServiceClient, fallback},
    error::AcquisitionError,
    model::{Country, Observation, Station},
    provider::{WeatherProvider, openweather::OpenWeatherMapClient},
    store::{ObservationStore, SqliteObservationStore},
};

/// What happened to the persistence step of one acquisition.
///
/// `Failed` and `Skipped` are indistinguishable in the returned station;
/// the explicit value exists so callers and tests can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceOutcome {
    /// All rows committed.
    Saved,
    /// The store reported an error; it was logged and ignored.
    Failed,
    /// No store is configured.
    Skipped,
}

/// Result of one acquisition: the enriched station plus the persistence
/// outcome.
#[derive(Debug)]
pub struct Acquisition {
    pub station: Station,
    pub persistence: PersistenceOutcome,
}

/// Orchestrates the weather provider, the country resolver and the optional
/// observation store.
#[derive(Debug)]
pub struct AcquisitionService {
    provider: Box<dyn WeatherProvider>,
    resolver: Box<dyn CountryResolver>,
    store: Option<Box<dyn ObservationStore>>,
}

impl AcquisitionService {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        resolver: Box<dyn CountryResolver>,
        store: Option<Box<dyn ObservationStore>>,
    ) -> Self {
        Self { provider, resolver, store }
    }

    /// Fetch current weather for a coordinate, enrich the country name and
    /// persist when a store is configured.
    pub async fn acquire(
        &self,
        latitude: f64,
        longitude: f64,
        lang: Option<&str>,
    ) -> Result<Acquisition, AcquisitionError> {
        let mut station = self.provider.fetch(latitude, longitude, lang).await?;
        self.enrich_country(&mut station, lang).await;
        let persistence = self.persist(&station);
        Ok(Acquisition { station, persistence })
    }

    /// [`Self::acquire`] without the persistence outcome.
    pub async fn acquire_and_process(
        &self,
        latitude: f64,
        longitude: f64,
        lang: Option<&str>,
    ) -> Result<Station, AcquisitionError> {
        Ok(self.acquire(latitude, longitude, lang).await?.station)
    }

    /// Fresh fetch at the last-known coordinates of a stored station. Not a
    /// cache read: this appends a new observation and persists it.
    pub async fn acquire_for_known_station(
        &self,
        station_name: &str,
        lang: Option<&str>,
    ) -> Result<Acquisition, AcquisitionError> {
        let store = self.store.as_ref().ok_or(AcquisitionError::StoreRequired)?;

        let known = store
            .find_by_name(station_name)?
            .ok_or_else(|| AcquisitionError::UnknownStation(station_name.to_string()))?;
        let Some((latitude, longitude)) = known.coordinates() else {
            return Err(AcquisitionError::UnknownStation(station_name.to_string()));
        };

        self.acquire(latitude, longitude, lang).await
    }

    /// Names of the stored stations; empty when no store is configured or
    /// the read fails.
    pub fn saved_station_names(&self) -> Vec<String> {
        let Some(store) = self.store.as_ref() else {
            return Vec::new();
        };
        match store.station_names() {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, "listing stored stations failed");
                Vec::new()
            }
        }
    }

    /// Stored observation timestamps for a station, newest first.
    pub fn observation_dates(&self, station_name: &str) -> Vec<DateTime<Utc>> {
        let Some(store) = self.store.as_ref() else {
            return Vec::new();
        };
        match store.timestamps(station_name) {
            Ok(timestamps) => timestamps,
            Err(err) => {
                tracing::warn!(station = station_name, error = %err, "listing stored timestamps failed");
                Vec::new()
            }
        }
    }

    /// The stored observation within the calendar second of `at`.
    pub fn observation_at(&self, station_name: &str, at: DateTime<Utc>) -> Option<Observation> {
        let store = self.store.as_ref()?;
        match store.find_observation(station_name, at) {
            Ok(observation) => observation,
            Err(err) => {
                tracing::warn!(station = station_name, error = %err, "reading stored observation failed");
                None
            }
        }
    }

    async fn enrich_country(&self, station: &mut Station, lang: Option<&str>) {
        let Some(country) = station.country.as_mut() else {
            return;
        };
        let code = country.code.trim().to_string();
        if code.is_empty() {
            return;
        }

        match self.resolver.resolve(&code, lang).await {
            Ok(resolved) if resolved.has_name() => {
                tracing::debug!(code = %code, name = resolved.label(), "country resolved");
                *country = resolved;
            }
            Ok(_) => apply_local_fallback(country, &code, lang),
            Err(err) => {
                tracing::warn!(code = %code, error = %err, "country resolution failed, using local fallback");
                apply_local_fallback(country, &code, lang);
            }
        }
    }

    fn persist(&self, station: &Station) -> PersistenceOutcome {
        let Some(store) = self.store.as_ref() else {
            return PersistenceOutcome::Skipped;
        };
        match store.save(station) {
            Ok(()) => PersistenceOutcome::Saved,
            Err(err) => {
                tracing::warn!(station = %station.name, error = %err, "saving observations failed, continuing without persistence");
                PersistenceOutcome::Failed
            }
        }
    }
}

/// The name is only ever set, never cleared: a station whose code resolves
/// nowhere keeps the bare code, which is not an error.
fn apply_local_fallback(country: &mut Country, code: &str, lang: Option<&str>) {
    match fallback::display_name(code, lang) {
        Some(name) => {
            tracing::debug!(code, name, "using local country name");
            country.name = Some(name.to_string());
        }
        None => tracing::debug!(code, "no local country name, keeping bare code"),
    }
}

/// Construct the full service from config.
pub fn service_from_config(config: &Config) -> anyhow::Result<AcquisitionService> {
    let api_key = config.weather_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
             Hint: run `meteo configure` and enter your API key."
        )
    })?;

    let provider =
        Box::new(OpenWeatherMapClient::new(config.weather.base_url.clone(), api_key.to_owned()));
    let resolver = Box::new(CountryServiceClient::new(config.country.base_url.clone()));

    let store: Option<Box<dyn ObservationStore>> = match &config.database {
        Some(path) => {
            let store = SqliteObservationStore::open(path)
                .with_context(|| format!("Failed to open database: {}", path.display()))?;
            Some(Box::new(store))
        }
        None => None,
    };

    Ok(AcquisitionService::new(provider, resolver, store))
}
