use crate::{error::ProviderError, model::Station};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current-weather observations.
///
/// One invocation performs one outbound call. The returned station carries
/// exactly one observation, and a country holding only its code: resolving
/// the display name is the caller's job, not the provider's.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        lang: Option<&str>,
    ) -> Result<Station, ProviderError>;
}
