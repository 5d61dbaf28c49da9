//! End-to-end pipeline test: fetch from a mock weather service, enrich from
//! a mock country service, persist to an in-memory store, query back.

use meteo_core::{
    AcquisitionService, CountryServiceClient, OpenWeatherMapClient, PersistenceOutcome,
    SqliteObservationStore,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_backend() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "coord": {"lon": 6.1457, "lat": 46.2022},
            "weather": [{"description": "couvert"}],
            "main": {"temp": 21.4, "pressure": 1018, "humidity": 62},
            "visibility": 10000,
            "sys": {"country": "CH"},
            "id": 2660646,
            "name": "Geneva"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/country/ch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "ch",
            "name": "Suisse"
        })))
        .mount(&mock_server)
        .await;

    mock_server
}

fn service(server: &MockServer) -> AcquisitionService {
    AcquisitionService::new(
        Box::new(OpenWeatherMapClient::new(
            format!("{}/weather", server.uri()),
            "test-key".to_string(),
        )),
        Box::new(CountryServiceClient::new(format!("{}/country", server.uri()))),
        Some(Box::new(SqliteObservationStore::in_memory().expect("in-memory store should open"))),
    )
}

#[tokio::test]
async fn acquired_station_is_enriched_persisted_and_queryable() {
    let mock_server = mock_backend().await;
    let svc = service(&mock_server);

    let acquisition = svc.acquire(46.2022, 6.1457, Some("fr")).await.unwrap();

    assert_eq!(acquisition.persistence, PersistenceOutcome::Saved);
    let country = acquisition.station.country.as_ref().expect("country should be present");
    assert_eq!(country.code, "CH");
    assert_eq!(country.name.as_deref(), Some("Suisse"));

    assert_eq!(svc.saved_station_names(), vec!["Geneva".to_string()]);

    let dates = svc.observation_dates("Geneva");
    assert_eq!(dates.len(), 1);

    let stored = svc.observation_at("Geneva", dates[0]).expect("observation should be stored");
    assert_eq!(stored.temperature, Some(21.4));
    assert_eq!(stored.condition.as_deref(), Some("couvert"));
}

#[tokio::test]
async fn refetching_a_known_station_appends_an_observation() {
    let mock_server = mock_backend().await;
    let svc = service(&mock_server);

    svc.acquire(46.2022, 6.1457, Some("fr")).await.unwrap();
    let acquisition = svc.acquire_for_known_station("Geneva", Some("fr")).await.unwrap();

    assert_eq!(acquisition.persistence, PersistenceOutcome::Saved);
    assert_eq!(svc.saved_station_names(), vec!["Geneva".to_string()]);
    assert_eq!(svc.observation_dates("Geneva").len(), 2);
}

#[tokio::test]
async fn unreachable_country_service_degrades_to_local_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sys": {"country": "CH"},
            "name": "Geneva"
        })))
        .mount(&mock_server)
        .await;

    // No /country mock: every resolution attempt gets a 404.
    let svc = service(&mock_server);

    let acquisition = svc.acquire(46.2022, 6.1457, Some("fr")).await.unwrap();
    let country = acquisition.station.country.as_ref().expect("country should be present");

    assert_eq!(country.code, "CH");
    assert_eq!(country.name.as_deref(), Some("Suisse"));
}
