use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ProviderError,
    model::{Country, Observation, Station},
};

use super::WeatherProvider;

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherMapClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherMapClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        lang: Option<&str>,
    ) -> Result<Station, ProviderError> {
        let mut query = vec![
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];
        if let Some(lang) = lang.map(str::trim).filter(|l| !l.is_empty()) {
            query.push(("lang", lang.to_string()));
        }

        let res = self.http.get(&self.base_url).query(&query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwmResponse = serde_json::from_str(&body)?;

        Ok(parsed.into_station())
    }
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

/// Rain section, only present when there is precipitation.
#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: Option<String>,
    id: Option<i64>,
    coord: Option<OwmCoord>,
    weather: Option<Vec<OwmWeather>>,
    main: Option<OwmMain>,
    visibility: Option<i64>,
    sys: Option<OwmSys>,
    rain: Option<OwmRain>,
}

impl OwmResponse {
    /// Station with exactly one observation. The observation is stamped with
    /// the capture instant, never with the provider's `dt` field.
    fn into_station(self) -> Station {
        let country = self
            .sys
            .and_then(|sys| sys.country.as_deref().and_then(Country::from_code));

        let observation = Observation {
            measured_at: Utc::now(),
            temperature: self.main.as_ref().and_then(|m| m.temp),
            pressure: self.main.as_ref().and_then(|m| m.pressure),
            humidity: self.main.as_ref().and_then(|m| m.humidity),
            visibility_m: self.visibility,
            precipitation_mm: self.rain.and_then(|r| r.one_hour),
            condition: self
                .weather
                .and_then(|w| w.into_iter().next())
                .and_then(|w| w.description),
        };

        let mut station = Station {
            name: self.name.unwrap_or_default(),
            latitude: self.coord.as_ref().and_then(|c| c.lat),
            longitude: self.coord.as_ref().and_then(|c| c.lon),
            provider_id: self.id,
            country,
            observations: Vec::new(),
        };
        station.add_observation(observation);
        station
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geneva_json() -> &'static str {
        r#"{
            "coord": {"lon": 6.1457, "lat": 46.2022},
            "weather": [{"main": "Clouds", "description": "couvert", "icon": "04d"}],
            "main": {"temp": 21.4, "feels_like": 21.1, "pressure": 1018, "humidity": 62},
            "visibility": 10000,
            "dt": 946684800,
            "sys": {"country": "CH"},
            "rain": {"1h": 0.4},
            "id": 2660646,
            "name": "Geneva"
        }"#
    }

    #[test]
    fn maps_full_payload() {
        let parsed: OwmResponse = serde_json::from_str(geneva_json()).expect("payload should parse");
        let station = parsed.into_station();

        assert_eq!(station.name, "Geneva");
        assert_eq!(station.latitude, Some(46.2022));
        assert_eq!(station.longitude, Some(6.1457));
        assert_eq!(station.provider_id, Some(2660646));
        assert_eq!(station.country.as_ref().map(|c| c.code.as_str()), Some("CH"));
        assert!(station.country.as_ref().is_some_and(|c| c.name.is_none()));

        assert_eq!(station.observations.len(), 1);
        let obs = &station.observations[0];
        assert_eq!(obs.temperature, Some(21.4));
        assert_eq!(obs.pressure, Some(1018.0));
        assert_eq!(obs.humidity, Some(62.0));
        assert_eq!(obs.visibility_m, Some(10000));
        assert_eq!(obs.precipitation_mm, Some(0.4));
        assert_eq!(obs.condition.as_deref(), Some("couvert"));
    }

    #[test]
    fn timestamp_is_capture_instant_not_provider_dt() {
        // dt above is 2000-01-01; the observation must be stamped "now".
        let parsed: OwmResponse = serde_json::from_str(geneva_json()).expect("payload should parse");
        let station = parsed.into_station();
        let age = Utc::now() - station.observations[0].measured_at;
        assert!(age.num_seconds().abs() < 5);
    }

    #[test]
    fn missing_sections_map_to_absent_fields() {
        let parsed: OwmResponse =
            serde_json::from_str(r#"{"name": "Nowhere"}"#).expect("payload should parse");
        let station = parsed.into_station();

        assert_eq!(station.name, "Nowhere");
        assert_eq!(station.coordinates(), None);
        assert_eq!(station.country, None);

        let obs = &station.observations[0];
        assert_eq!(obs.temperature, None);
        assert_eq!(obs.pressure, None);
        assert_eq!(obs.humidity, None);
        assert_eq!(obs.visibility_m, None);
        assert_eq!(obs.precipitation_mm, None);
        assert_eq!(obs.condition, None);
    }

    #[test]
    fn blank_country_code_is_dropped() {
        let parsed: OwmResponse =
            serde_json::from_str(r#"{"name": "X", "sys": {"country": "  "}}"#)
                .expect("payload should parse");
        assert_eq!(parsed.into_station().country, None);
    }
}
