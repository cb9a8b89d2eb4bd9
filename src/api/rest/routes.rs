//! # REST Routes
//!
//! Router assembly for the flight endpoints.

use crate::api::rest::handlers::{
    cancel_booking, create_booking, get_booking, health_check, search_flights, verify_price,
    AppState,
};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let flights = Router::new()
        .route("/search", post(search_flights))
        .route("/verify-price", post(verify_price))
        .route("/create-booking", post(create_booking))
        .route("/{booking_id}", get(get_booking).delete(cancel_booking));

    Router::new()
        .nest("/api/v1/flights", flights)
        .route("/api/v1/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::rest::handlers::{ErrorResponse, HealthResponse};
    use crate::application::services::{AggregationConfig, AggregationEngine};
    use crate::domain::entities::offer::tests::test_offer;
    use crate::domain::entities::{Offer, SearchRequest};
    use crate::domain::value_objects::ProviderId;
    use crate::infrastructure::providers::error::ProviderResult;
    use crate::infrastructure::providers::registry::ProviderRegistry;
    use crate::infrastructure::providers::traits::{FlightProvider, ProviderKind};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[derive(Debug)]
    struct Fixed(ProviderId);

    #[async_trait]
    impl FlightProvider for Fixed {
        fn provider_id(&self) -> &ProviderId {
            &self.0
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::BdFare
        }

        async fn search_offers(&self, _request: &SearchRequest) -> ProviderResult<Vec<Offer>> {
            Ok(vec![
                test_offer(self.0.as_str(), "b", 300),
                test_offer(self.0.as_str(), "a", 100),
            ])
        }
    }

    fn router() -> Router {
        let registry = ProviderRegistry::new().with(Arc::new(Fixed(ProviderId::new("bdfare"))));
        let engine = AggregationEngine::new(registry, AggregationConfig::default());
        create_router(Arc::new(AppState::new(Arc::new(engine))))
    }

    fn passenger() -> Value {
        json!({
            "title": "Mr",
            "first_name": "John",
            "last_name": "Doe",
            "pax_type": "ADT",
            "date_of_birth": "1990-01-01",
            "gender": "M",
            "address1": "123 Street",
            "country_code": "BD",
            "nationality": "BD",
            "contact_number": "1234567890",
            "email": "john@example.com",
            "is_lead_passenger": true
        })
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn search_returns_sorted_offers() {
        let body = json!({
            "origin": "DAC",
            "destination": "DXB",
            "departure_date": "2024-04-01",
            "passengers": [passenger()]
        });

        let (status, value) = send(router(), "POST", "/api/v1/flights/search", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        let offers = value["offers"].as_array().unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0]["id"], "a");
        assert_eq!(value["currency"], "BDT");
    }

    #[tokio::test]
    async fn unrecognised_cabin_and_trip_still_search() {
        let body = json!({
            "origin": "DAC",
            "destination": "DXB",
            "departure_date": "2024-04-01",
            "cabin_class": "economy_plus",
            "trip_type": "circle",
            "passengers": [passenger()]
        });

        let (status, value) = send(router(), "POST", "/api/v1/flights/search", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["offers"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn same_origin_and_destination_is_bad_request() {
        let body = json!({
            "origin": "DAC",
            "destination": "DAC",
            "departure_date": "2024-04-01",
            "passengers": [passenger()]
        });

        let (status, value) = send(router(), "POST", "/api/v1/flights/search", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_value(value).unwrap();
        assert!(error
            .details
            .contains(&"origin and destination cannot be the same".to_string()));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (status, value) = send(
            router(),
            "POST",
            "/api/v1/flights/search",
            Some(json!({"origin": "DAC"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "malformed request body");
    }

    #[tokio::test]
    async fn unknown_provider_is_bad_gateway() {
        let body = json!({
            "origin": "DAC",
            "destination": "DXB",
            "departure_date": "2024-04-01",
            "passengers": [passenger()],
            "providers": ["sabre"]
        });

        let (status, value) = send(router(), "POST", "/api/v1/flights/search", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(value["details"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn booking_endpoints_are_not_implemented() {
        let (status, _) = send(router(), "GET", "/api/v1/flights/BK123", None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

        let body = json!({"offer_id": "R1", "passengers": [passenger()]});
        let (status, _) = send(router(), "POST", "/api/v1/flights/create-booking", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

        let body = json!({"search_id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "offer_id": " "});
        let (status, value) = send(router(), "POST", "/api/v1/flights/verify-price", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["details"][0], "offer id is required");
    }

    #[tokio::test]
    async fn health_lists_providers() {
        let (status, value) = send(router(), "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_value(value).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.providers.len(), 1);
        assert_eq!(health.providers[0].kind, ProviderKind::BdFare);
    }
}
