use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::ResolutionError, model::Country};

use super::CountryResolver;

/// Client for the country-name service: `GET {base}/{alpha2}?lang=..`,
/// answering `{"code": "...", "name": "..."}`.
#[derive(Debug, Clone)]
pub struct CountryServiceClient {
    base_url: String,
    http: Client,
}

impl CountryServiceClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl CountryResolver for CountryServiceClient {
    async fn resolve(&self, alpha2: &str, lang: Option<&str>) -> Result<Country, ResolutionError> {
        // The service expects the code lowercase in the path.
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            alpha2.trim().to_lowercase()
        );

        let mut req = self.http.get(&url);
        if let Some(lang) = lang.map(str::trim).filter(|l| !l.is_empty()) {
            req = req.query(&[("lang", lang)]);
        }

        let res = req.send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ResolutionError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: CountryDto = serde_json::from_str(&body)?;

        Ok(Country {
            code: parsed
                .code
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| alpha2.trim().to_uppercase()),
            name: parsed.name.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CountryDto {
    code: Option<String>,
    name: Option<String>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
