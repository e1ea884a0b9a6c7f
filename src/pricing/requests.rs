//! Request DTOs for the quote API.

use serde::Deserialize;

/// A place as selected in the booking form's autocomplete.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceInput {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub formatted_address: String,
    /// Provider place type tags, e.g. `airport`, `establishment`.
    #[serde(default)]
    pub types: Vec<String>,
}

impl PlaceInput {
    /// Whether the provider tagged this place as an airport.
    pub fn is_airport(&self) -> bool {
        self.types.iter().any(|t| t == "airport")
    }

    /// Display name combining the place name with its formatted address.
    pub fn full_name(&self) -> String {
        match (self.name.is_empty(), self.formatted_address.is_empty()) {
            (true, _) => self.formatted_address.clone(),
            (_, true) => self.name.clone(),
            _ => format!("{}, {}", self.name, self.formatted_address),
        }
    }
}

/// Request to compute and persist a quote
#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,

    pub origin: PlaceInput,
    pub destination: PlaceInput,
    #[serde(default)]
    pub stops: Vec<PlaceInput>,

    pub vehicle_number: i32,
    pub service_number: i32,
    #[serde(default)]
    pub selected_hours: i32,
    #[serde(default)]
    pub selected_passengers: i32,
    #[serde(default)]
    pub is_round_trip: bool,

    #[serde(default)]
    pub pickup_date: Option<String>,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default)]
    pub return_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(types: &[&str]) -> PlaceInput {
        PlaceInput {
            place_id: "ChIJkdM3wUc1K4gRXbbx-nv9dZk".to_string(),
            name: "Toronto Pearson International Airport".to_string(),
            formatted_address: "6301 Silver Dart Dr, Mississauga, ON".to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_is_airport() {
        assert!(place(&["airport", "establishment"]).is_airport());
        assert!(!place(&["establishment"]).is_airport());
        assert!(!place(&[]).is_airport());
    }

    #[test]
    fn test_full_name_joins_name_and_address() {
        assert_eq!(
            place(&[]).full_name(),
            "Toronto Pearson International Airport, 6301 Silver Dart Dr, Mississauga, ON"
        );

        let mut nameless = place(&[]);
        nameless.name.clear();
        assert_eq!(nameless.full_name(), "6301 Silver Dart Dr, Mississauga, ON");
    }

    #[test]
    fn test_request_defaults() {
        let req: CreateQuoteRequest = serde_json::from_value(serde_json::json!({
            "first_name": "Ava",
            "last_name": "Singh",
            "email_address": "ava@example.com",
            "phone_number": "+1 416 555 0199",
            "origin": { "place_id": "place-a" },
            "destination": { "place_id": "place-b" },
            "vehicle_number": 1,
            "service_number": 2
        }))
        .unwrap();

        assert!(req.stops.is_empty());
        assert_eq!(req.selected_hours, 0);
        assert!(!req.is_round_trip);
        assert!(req.pickup_date.is_none());
    }
}
