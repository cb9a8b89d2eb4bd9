//! End-to-end search through configuration, token exchange, provider
//! clients and the aggregation engine against mocked provider APIs.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use flight_aggregator::application::error::ApplicationError;
use flight_aggregator::application::services::AggregationEngine;
use flight_aggregator::domain::entities::{
    DiagnosticKind, Passenger, PassengerDetails, SearchRequest,
};
use flight_aggregator::domain::value_objects::{CabinClass, Gender, PassengerType, ProviderId};
use flight_aggregator::infrastructure::config::AppConfig;
use flight_aggregator::infrastructure::providers::ProviderRegistry;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_config(flyhub: &MockServer, bdfare: &MockServer) -> AppConfig {
    let toml = format!(
        r#"
        [retry]
        max_retries = 1
        base_delay_ms = 1
        max_jitter_ms = 1

        [aggregation]
        timeout_ms = 10000

        [[providers]]
        id = "flyhub"
        kind = "flyhub"
        base_url = "{flyhub}/api/v1/"
        token_url = "{flyhub}/Authenticate"
        client_id = "fh-client"
        client_secret = "fh-secret"

        [[providers]]
        id = "bdfare"
        kind = "bdfare"
        base_url = "{bdfare}/api/enterprise/"
        token_url = "{bdfare}/oauth/token"
        client_id = "bd-client"
        client_secret = "bd-secret"
        "#,
        flyhub = flyhub.uri(),
        bdfare = bdfare.uri(),
    );

    let config: AppConfig = config::Config::builder()
        .add_source(config::File::from_str(&toml, config::FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap();
    config.validate().unwrap();
    config
}

fn engine(config: &AppConfig) -> AggregationEngine {
    AggregationEngine::new(
        ProviderRegistry::from_config(config).unwrap(),
        config.aggregation.engine_config(),
    )
}

fn request() -> SearchRequest {
    let lead = Passenger::new(PassengerDetails {
        title: "Mr".to_string(),
        first_name: "Rahim".to_string(),
        last_name: "Uddin".to_string(),
        pax_type: PassengerType::Adult,
        date_of_birth: NaiveDate::from_ymd_opt(1988, 6, 15).unwrap(),
        gender: Gender::Male,
        address1: "House 12, Road 5".to_string(),
        address2: None,
        country_code: "BD".to_string(),
        nationality: "BD".to_string(),
        contact_number: "+8801712345678".to_string(),
        email: "rahim@example.com".to_string(),
        is_lead_passenger: true,
        passport: None,
        frequent_flyer: None,
    })
    .unwrap();

    SearchRequest::builder(
        "DAC",
        "DXB",
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        CabinClass::Economy,
    )
    .passenger(lead)
    .try_build()
    .unwrap()
}

async fn mount_token(server: &MockServer, token_path: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path(token_path))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

async fn mount_flyhub_results(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/AirSearch"))
        .and(header("authorization", "Bearer fh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [
                {
                    "ResultID": "FH-2",
                    "IsRefundable": false,
                    "TotalFare": 45000,
                    "Currency": "BDT",
                    "Segments": [{
                        "Origin": {"AirportCode": "DAC"},
                        "Destination": {"AirportCode": "DXB"},
                        "Airline": {"AirlineCode": "EK", "AirlineName": "Emirates"},
                        "FlightNumber": "583",
                        "DepartureDateTime": "2024-04-01T19:40:00",
                        "ArrivalDateTime": "2024-04-01T23:05:00",
                        "CabinClass": "1"
                    }]
                },
                {
                    "ResultID": "FH-1",
                    "IsRefundable": true,
                    "TotalFare": 31500,
                    "Currency": "BDT",
                    "Segments": [{
                        "Origin": {"AirportCode": "DAC"},
                        "Destination": {"AirportCode": "DXB"},
                        "Airline": {"AirlineCode": "BG", "AirlineName": "Biman Bangladesh"},
                        "FlightNumber": "147",
                        "DepartureDateTime": "2024-04-01T10:00:00",
                        "ArrivalDateTime": "2024-04-01T13:30:00",
                        "Baggage": "30KG",
                        "CabinClass": "1"
                    }]
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_bdfare_results(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/enterprise/AirShopping"))
        .and(header("authorization", "Bearer bd-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "offersGroup": [{
                    "offer": {
                        "offerId": "BD-1",
                        "refundable": false,
                        "seatsRemaining": 5,
                        "price": {"totalPayable": {"total": 38000, "currency": "BDT"}},
                        "paxSegmentList": [{"paxSegment": {
                            "departure": {"iatA_LocationCode": "DAC", "aircraftScheduledDateTime": "2024-04-01T08:00:00"},
                            "arrival": {"iatA_LocationCode": "DXB", "aircraftScheduledDateTime": "2024-04-01T11:45:00"},
                            "marketingCarrierInfo": {"carrierDesigCode": "BS", "carrierName": "US-Bangla"},
                            "flightNumber": "341",
                            "cabinType": "Economy"
                        }}]
                    }
                }]
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn merges_both_providers_by_fare() {
    let (flyhub, bdfare) = (MockServer::start().await, MockServer::start().await);
    mount_token(&flyhub, "/Authenticate", "fh-token").await;
    mount_token(&bdfare, "/oauth/token", "bd-token").await;
    mount_flyhub_results(&flyhub).await;
    mount_bdfare_results(&bdfare).await;

    let response = engine(&app_config(&flyhub, &bdfare))
        .search(&request(), &[])
        .await
        .unwrap();

    let ids: Vec<&str> = response.offers().iter().map(|o| o.id().as_str()).collect();
    assert_eq!(ids, vec!["FH-1", "BD-1", "FH-2"]);
    assert_eq!(response.providers_responded(), 2);
    assert!(!response.is_partial());

    let bd = &response.offers()[1];
    assert_eq!(bd.provider_id().as_str(), "bdfare");
    assert_eq!(bd.segments()[0].flight_number(), "BS341");
    assert_eq!(bd.segments()[0].baggage(), "N/A");
}

#[tokio::test]
async fn failing_provider_leaves_partial_result() {
    let (flyhub, bdfare) = (MockServer::start().await, MockServer::start().await);
    mount_token(&flyhub, "/Authenticate", "fh-token").await;
    mount_token(&bdfare, "/oauth/token", "bd-token").await;
    mount_flyhub_results(&flyhub).await;
    Mock::given(method("POST"))
        .and(path("/api/enterprise/AirShopping"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&bdfare)
        .await;

    let response = engine(&app_config(&flyhub, &bdfare))
        .search(&request(), &[])
        .await
        .unwrap();

    assert_eq!(response.offers().len(), 2);
    assert!(response.is_partial());
    let diagnostic = &response.diagnostics()[0];
    assert_eq!(diagnostic.provider_id, ProviderId::new("bdfare"));
    assert_eq!(diagnostic.kind, DiagnosticKind::Failed);
    assert!(diagnostic.message.contains("2 attempts"));
}

#[tokio::test]
async fn rejected_credentials_fail_only_that_provider() {
    let (flyhub, bdfare) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path("/Authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid client"))
        .mount(&flyhub)
        .await;
    mount_token(&bdfare, "/oauth/token", "bd-token").await;
    mount_bdfare_results(&bdfare).await;

    let response = engine(&app_config(&flyhub, &bdfare))
        .search(&request(), &[])
        .await
        .unwrap();

    assert_eq!(response.offers().len(), 1);
    assert_eq!(response.diagnostics()[0].provider_id.as_str(), "flyhub");
}

#[tokio::test]
async fn every_provider_failing_is_an_error() {
    let (flyhub, bdfare) = (MockServer::start().await, MockServer::start().await);
    mount_token(&flyhub, "/Authenticate", "fh-token").await;
    mount_token(&bdfare, "/oauth/token", "bd-token").await;
    for (server, search_path) in [
        (&flyhub, "/api/v1/AirSearch"),
        (&bdfare, "/api/enterprise/AirShopping"),
    ] {
        Mock::given(method("POST"))
            .and(path(search_path))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }

    let err = engine(&app_config(&flyhub, &bdfare))
        .search(&request(), &[])
        .await
        .unwrap_err();

    assert!(matches!(&err, ApplicationError::AllProvidersFailed(errors) if errors.len() == 2));
}

#[tokio::test]
async fn token_is_reused_across_searches() {
    let (flyhub, bdfare) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path("/Authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fh-token",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&flyhub)
        .await;
    mount_flyhub_results(&flyhub).await;

    let engine = engine(&app_config(&flyhub, &bdfare));
    let only_flyhub = [ProviderId::new("flyhub")];
    for _ in 0..3 {
        let response = engine.search(&request(), &only_flyhub).await.unwrap();
        assert_eq!(response.offers().len(), 2);
    }
}
