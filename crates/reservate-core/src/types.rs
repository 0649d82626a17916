//! Core data types for service reservations

use crate::utils::{deserialize_code, lenient_datetime, null_as_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Backend-assigned reservation identifier
pub type ReservationId = i64;

/// Client identifier
pub type ClientId = i64;

/// Service identifier
pub type ServiceId = i64;

/// Mechanic identifier
pub type MechanicId = i64;

/// Lifecycle state of a reservation
///
/// Any state may be replaced by any other; no transition graph is enforced.
/// Values the backend sends outside the known set are preserved as
/// [`ReservationState::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReservationState {
    /// Booked, awaiting confirmation
    Pending,
    /// Confirmed by the workshop
    Confirmed,
    /// Vehicle is being worked on
    InProgress,
    /// Work finished
    Completed,
    /// Called off
    Cancelled,
    /// A value outside the known lifecycle, kept verbatim
    Unrecognized(String),
}

impl ReservationState {
    /// All known states, in lifecycle order
    pub const KNOWN: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Map a wire value onto a state, keeping unknown values
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|state| state.as_str() == value)
            .unwrap_or_else(|| Self::Unrecognized(value.to_string()))
    }
}

impl fmt::Display for ReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationState {
    type Err = crate::Error;

    /// Strict parsing for user input: only known states are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_wire(s.trim()) {
            Self::Unrecognized(raw) => Err(crate::Error::InvalidState(raw)),
            state => Ok(state),
        }
    }
}

impl Serialize for ReservationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReservationState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

/// A workshop client. Read-only from this system's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Client ID
    pub id: ClientId,

    /// External client code
    #[serde(default, deserialize_with = "deserialize_code")]
    pub code: String,

    /// First name
    #[serde(default)]
    pub name: String,

    /// Last name
    #[serde(default)]
    pub last_name: String,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

impl Client {
    /// "first last" as shown in lists and used for sorting
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// A billable workshop service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service ID
    pub id: ServiceId,

    /// External service code
    #[serde(default, deserialize_with = "deserialize_code")]
    pub code: String,

    /// Title shown to users and matched by search
    #[serde(default)]
    pub title: String,

    /// Longer description
    #[serde(default)]
    pub description: Option<String>,

    /// Price; expected non-negative but not enforced
    #[serde(default)]
    pub price: f64,
}

/// A mechanic that may be assigned to a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mechanic {
    /// Mechanic ID
    pub id: MechanicId,

    /// Employee code
    #[serde(default, deserialize_with = "deserialize_code")]
    pub employee_code: String,

    /// First name
    #[serde(default)]
    pub name: String,

    /// Last name
    #[serde(default)]
    pub last_name: String,

    /// Experience level
    #[serde(default)]
    pub experience_level: Option<String>,
}

/// A service reservation as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Internal identifier, display-only
    pub id: ReservationId,

    /// External key used for lookups, updates and deletes
    #[serde(deserialize_with = "deserialize_code")]
    pub code: String,

    /// When the reservation takes place
    #[serde(with = "lenient_datetime")]
    pub reservation_date: DateTime<Utc>,

    /// Sum of the selected services' prices at save time
    #[serde(default)]
    pub total_price: f64,

    /// Lifecycle state
    pub state: ReservationState,

    /// Owning client
    #[serde(default)]
    pub client: Option<Client>,

    /// Assigned mechanic
    #[serde(default)]
    pub mechanic: Option<Mechanic>,

    /// Selected services
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
}

impl Reservation {
    /// Client "first last", empty when no client is attached
    #[must_use]
    pub fn client_name(&self) -> String {
        self.client.as_ref().map(Client::full_name).unwrap_or_default()
    }

    /// IDs of the attached services
    #[must_use]
    pub fn service_ids(&self) -> Vec<ServiceId> {
        self.services.iter().map(|service| service.id).collect()
    }
}

/// Sum of the prices of `services`
#[must_use]
pub fn total_price(services: &[Service]) -> f64 {
    services.iter().fold(0.0, |total, service| total + service.price)
}

/// Body of `POST /reservate/create`
///
/// Carries the client and services as embedded objects alongside their ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservation {
    /// Client-supplied reservation code
    pub code: i64,

    /// When the reservation takes place
    #[serde(with = "lenient_datetime")]
    pub reservation_date: DateTime<Utc>,

    /// Initial state
    pub state: ReservationState,

    /// Pre-computed total
    pub total_price: f64,

    /// Selected client id
    pub client_id: ClientId,

    /// Selected service ids
    pub service_ids: Vec<ServiceId>,

    /// Selected client, embedded
    pub client: Client,

    /// Selected services, embedded
    pub services: Vec<Service>,
}

/// Body of `PATCH /reservate/{code}/update`
///
/// Only supplied fields are changed; absent fields are omitted from the JSON.
/// Relations are sent as bare ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservation {
    /// New reservation date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_date: Option<DateTime<Utc>>,

    /// New state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ReservationState>,

    /// New total price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,

    /// New client id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,

    /// New service ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ids: Option<Vec<ServiceId>>,

    /// New mechanic id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<MechanicId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn service(id: ServiceId, price: f64) -> Service {
        Service {
            id,
            code: format!("S{id}"),
            title: format!("Service {id}"),
            description: None,
            price,
        }
    }

    #[rstest]
    #[case("pending", ReservationState::Pending)]
    #[case("confirmed", ReservationState::Confirmed)]
    #[case("in_progress", ReservationState::InProgress)]
    #[case("completed", ReservationState::Completed)]
    #[case("cancelled", ReservationState::Cancelled)]
    fn test_state_parses_known_values(#[case] raw: &str, #[case] expected: ReservationState) {
        assert_eq!(raw.parse::<ReservationState>().unwrap(), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn test_state_strict_parse_rejects_unknown() {
        assert!("archived".parse::<ReservationState>().is_err());
        assert!("Pending".parse::<ReservationState>().is_err());
    }

    #[test]
    fn test_state_deserialization_keeps_unknown() {
        let state: ReservationState = serde_json::from_value(json!("unknown_x")).unwrap();
        assert_eq!(state, ReservationState::Unrecognized("unknown_x".to_string()));
        assert_eq!(serde_json::to_value(&state).unwrap(), json!("unknown_x"));
    }

    #[test]
    fn test_reservation_deserialization() {
        let reservation: Reservation = serde_json::from_value(json!({
            "id": 7,
            "code": 1001,
            "reservationDate": "2024-05-01T09:30:00Z",
            "totalPrice": 45.5,
            "state": "in_progress",
            "client": {"id": 3, "code": "C3", "name": "Ana", "lastName": "Lopez",
                       "phone": "555-0101", "email": "ana@example.com"},
            "mechanic": null,
            "services": [{"id": 1, "code": "S1", "title": "Oil change", "price": 45.5}]
        }))
        .unwrap();

        assert_eq!(reservation.code, "1001");
        assert_eq!(reservation.state, ReservationState::InProgress);
        assert_eq!(reservation.client_name(), "Ana Lopez");
        assert_eq!(reservation.service_ids(), vec![1]);
        assert_eq!(
            reservation.reservation_date,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_reservation_tolerates_missing_relations() {
        let reservation: Reservation = serde_json::from_value(json!({
            "id": 8,
            "code": "R-8",
            "reservationDate": "2024-05-02T10:00",
            "state": "pending",
            "services": null
        }))
        .unwrap();

        assert!(reservation.client.is_none());
        assert!(reservation.services.is_empty());
        assert_eq!(reservation.client_name(), "");
        assert_eq!(reservation.total_price, 0.0);
    }

    #[test]
    fn test_total_price_sums_selection() {
        let services = vec![service(1, 10.0), service(2, 15.5), service(3, 4.0)];
        assert_eq!(total_price(&services), 29.5);
        assert_eq!(total_price(&[]), 0.0);
    }

    #[test]
    fn test_total_price_of_nothing_is_positive_zero() {
        let total = total_price(&[]);
        assert!(total.is_sign_positive());
        assert_eq!(total.to_string(), "0");
    }

    #[test]
    fn test_update_payload_omits_absent_fields() {
        let update = UpdateReservation {
            state: Some(ReservationState::Completed),
            service_ids: Some(vec![1, 2]),
            ..UpdateReservation::default()
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"state": "completed", "serviceIds": [1, 2]})
        );
    }

    #[test]
    fn test_create_payload_embeds_relations() {
        let client = Client {
            id: 3,
            code: "C3".to_string(),
            name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            phone: None,
            email: None,
        };
        let payload = CreateReservation {
            code: 1001,
            reservation_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            state: ReservationState::Pending,
            total_price: 10.0,
            client_id: 3,
            service_ids: vec![1],
            client,
            services: vec![service(1, 10.0)],
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["reservationDate"], json!("2024-05-01T09:30:00+00:00"));
        assert_eq!(value["clientId"], json!(3));
        assert_eq!(value["client"]["lastName"], json!("Lopez"));
        assert_eq!(value["services"][0]["title"], json!("Service 1"));
    }
}
