//! Integration tests for the country-name service adapter.

use meteo_core::{CountryResolver, CountryServiceClient, ResolutionError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CountryServiceClient {
    CountryServiceClient::new(format!("{}/ws/country", server.uri()))
}

#[tokio::test]
async fn resolves_code_to_named_country() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/country/ch"))
        .and(query_param("lang", "fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "ch",
            "name": "Suisse"
        })))
        .mount(&mock_server)
        .await;

    let country = client(&mock_server).resolve("CH", Some("fr")).await.unwrap();

    assert_eq!(country.code, "CH");
    assert_eq!(country.name.as_deref(), Some("Suisse"));
}

#[tokio::test]
async fn lang_parameter_is_omitted_when_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/country/ch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "ch",
            "name": "Switzerland"
        })))
        .mount(&mock_server)
        .await;

    client(&mock_server).resolve("CH", None).await.unwrap();

    let requests = mock_server.received_requests().await.expect("requests should be recorded");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.query_pairs().any(|(key, _)| key == "lang"));
}

#[tokio::test]
async fn blank_name_in_response_maps_to_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/country/xx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "xx",
            "name": "  "
        })))
        .mount(&mock_server)
        .await;

    let country = client(&mock_server).resolve("XX", None).await.unwrap();

    assert_eq!(country.code, "XX");
    assert_eq!(country.name, None);
}

#[tokio::test]
async fn non_success_status_is_a_resolution_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/country/zz"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such country"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).resolve("ZZ", None).await.unwrap_err();

    match err {
        ResolutionError::Status { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("no such country"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
