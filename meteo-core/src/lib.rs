//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The domain model (stations, observations, countries)
//! - HTTP adapters for the weather and country-name services
//! - SQLite-backed observation storage
//! - The acquisition service sequencing fetch, enrichment and persistence
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod country;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;

pub use config::Config;
pub use country::{CountryResolver, CountryServiceClient};
pub use error::{AcquisitionError, ProviderError, ResolutionError, StoreError};
pub use model::{Country, Observation, Station};
pub use provider::{WeatherProvider, openweather::OpenWeatherMapClient};
pub use service::{Acquisition, AcquisitionService, PersistenceOutcome, service_from_config};
pub use store::{ObservationStore, SqliteObservationStore};
