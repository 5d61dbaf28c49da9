use crate::{error::ResolutionError, model::Country};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod client;
pub mod fallback;

pub use client::CountryServiceClient;

/// Turns an ISO alpha-2 code into a country with a display name.
///
/// One outbound call per invocation, no retries. The acquisition service
/// treats any failure here as a cue to use [`fallback`], never as fatal.
#[async_trait]
pub trait CountryResolver: Send + Sync + Debug {
    async fn resolve(&self, alpha2: &str, lang: Option<&str>) -> Result<Country, ResolutionError>;
}
