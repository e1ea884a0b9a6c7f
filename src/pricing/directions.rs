//! Directions provider client for route distance resolution.
//!
//! A single request to the Google Directions API turns an ordered route
//! (origin, optional stops, destination) into one aggregate distance: the
//! sum of every leg of the first returned route. Multi-stop routes need no
//! extra handling because each stop boundary is a leg.
//!
//! An incomplete route (missing origin or destination) resolves to zero
//! distance without contacting the provider. That leniency is deliberate:
//! the booking form shows incremental quote progress while the customer is
//! still filling in places.

use std::env;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::round_km;

/// Errors from the directions provider boundary.
///
/// Never retried internally; the caller decides whether to retry, fall back
/// to a cached distance, or fail the quote request.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directions provider returned HTTP {0}")]
    Status(u16),

    #[error("directions payload failed validation: {0}")]
    InvalidPayload(String),
}

/// A distance/duration pair as the provider formats it.
///
/// `value` is meters for distances and seconds for durations; `text` is the
/// provider's human-readable rendering, stored untouched on quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One provider-returned segment of a route, bounded by two consecutive
/// stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance: TextValue,
    pub duration: TextValue,
    pub start_location: Coordinates,
    pub end_location: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsRoute {
    pub legs: Vec<RouteLeg>,
}

/// Validated directions payload.
///
/// Only leg distances feed the pricing engine; the remaining fields are
/// passed through for quote persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub routes: Vec<DirectionsRoute>,
}

impl DirectionsResponse {
    /// The first leg of the first route, when the provider returned one.
    pub fn first_leg(&self) -> Option<&RouteLeg> {
        self.routes.first().and_then(|r| r.legs.first())
    }
}

/// Sum of all leg distances of the first route, in kilometers rounded to
/// 3 decimal places. Zero when the provider returned no routes or no legs.
pub fn total_distance_km(response: &DirectionsResponse) -> Decimal {
    let meters: i64 = response
        .routes
        .first()
        .map(|route| route.legs.iter().map(|leg| leg.distance.value).sum())
        .unwrap_or(0);
    round_km(Decimal::from(meters) / Decimal::from(1000))
}

/// Outcome of a distance resolution.
///
/// `response` is `None` when the route was incomplete and the provider was
/// never contacted.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub distance_km: Decimal,
    pub response: Option<DirectionsResponse>,
}

impl ResolvedRoute {
    fn empty() -> Self {
        Self {
            distance_km: Decimal::ZERO,
            response: None,
        }
    }
}

/// HTTP client for the directions provider.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl DirectionsClient {
    /// Build a client for the given API key.
    ///
    /// The host defaults to the public Google endpoint and can be overridden
    /// through `GOOGLE_MAPS_API_BASE` (useful for pointing tests at a stub).
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        let api_base =
            env::var("GOOGLE_MAPS_API_BASE").unwrap_or_else(|_| "maps.googleapis.com".to_string());
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_base,
            api_key,
        })
    }

    /// Resolve the total travel distance for an ordered route.
    ///
    /// Returns zero distance immediately when origin or destination is
    /// empty. Otherwise issues one directions request and sums the legs of
    /// the first returned route.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_distance(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[String],
    ) -> Result<ResolvedRoute, ProviderError> {
        if origin.is_empty() || destination.is_empty() {
            return Ok(ResolvedRoute::empty());
        }

        let url = format!("https://{}/maps/api/directions/json", self.api_base);
        let mut request = self
            .http
            .get(url)
            .query(&[("origin", format!("place_id:{origin}"))])
            .query(&[("destination", format!("place_id:{destination}"))]);

        if !waypoints.is_empty() {
            let joined = waypoints
                .iter()
                .map(|p| format!("place_id:{p}"))
                .collect::<Vec<_>>()
                .join("|");
            request = request.query(&[("waypoints", joined)]);
        }

        let response = request.query(&[("key", self.api_key.as_str())]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let validated: DirectionsResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidPayload(e.to_string()))?;

        let distance_km = total_distance_km(&validated);
        tracing::debug!(%distance_km, "resolved route distance");

        Ok(ResolvedRoute {
            distance_km,
            response: Some(validated),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn leg(meters: i64) -> serde_json::Value {
        serde_json::json!({
            "distance": { "text": format!("{} km", meters / 1000), "value": meters },
            "duration": { "text": "20 mins", "value": 1200 },
            "start_location": { "lat": 43.6426, "lng": -79.3871 },
            "end_location": { "lat": 43.6777, "lng": -79.6248 }
        })
    }

    fn payload(legs_per_route: &[&[i64]]) -> DirectionsResponse {
        let routes: Vec<serde_json::Value> = legs_per_route
            .iter()
            .map(|legs| {
                serde_json::json!({
                    "legs": legs.iter().map(|m| leg(*m)).collect::<Vec<_>>()
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({ "routes": routes })).unwrap()
    }

    #[test]
    fn test_distance_sums_all_legs_of_first_route() {
        // Two stops -> three legs; the second route is ignored
        let response = payload(&[&[12_000, 8_500, 4_250], &[99_000]]);
        assert_eq!(total_distance_km(&response), dec!(24.750));
    }

    #[test]
    fn test_distance_zero_when_no_routes() {
        let response = payload(&[]);
        assert_eq!(total_distance_km(&response), Decimal::ZERO);
    }

    #[test]
    fn test_distance_zero_when_route_has_no_legs() {
        let response = payload(&[&[]]);
        assert_eq!(total_distance_km(&response), Decimal::ZERO);
    }

    #[test]
    fn test_distance_rounds_to_three_decimals() {
        // 1234 m + 5678 m = 6.912 km
        let response = payload(&[&[1_234, 5_678]]);
        assert_eq!(total_distance_km(&response), dec!(6.912));
    }

    #[test]
    fn test_payload_shape_mismatch_is_rejected() {
        // Legs without a distance field must fail validation, not default
        let raw = r#"{ "routes": [ { "legs": [ { "duration": { "text": "x", "value": 1 } } ] } ] }"#;
        let parsed: Result<DirectionsResponse, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_first_leg_accessor() {
        let response = payload(&[&[12_000, 8_500]]);
        assert_eq!(response.first_leg().unwrap().distance.value, 12_000);
        assert!(payload(&[]).first_leg().is_none());
    }

    #[tokio::test]
    async fn test_incomplete_route_resolves_to_zero_without_provider() {
        // Key and host are never used for an incomplete route
        let client = DirectionsClient::new("test-key".to_string()).unwrap();

        let resolved = client.resolve_distance("", "place-b", &[]).await.unwrap();
        assert_eq!(resolved.distance_km, Decimal::ZERO);
        assert!(resolved.response.is_none());

        let resolved = client.resolve_distance("place-a", "", &[]).await.unwrap();
        assert_eq!(resolved.distance_km, Decimal::ZERO);
        assert!(resolved.response.is_none());
    }
}
