//! In-memory reservation backend for testing

use crate::error::{ServiceError, ServiceResult};
use crate::service::ReservationService;
use async_trait::async_trait;
use reservate_core::{Client, CreateReservation, Reservation, Service, UpdateReservation};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::{Duration, sleep};
use tracing::{error, info};

/// Calls recorded by [`MockReservationService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    /// `get_all_reservations`
    ListReservations,
    /// `get_reservation_by_code`
    GetReservation,
    /// `create_reservation`
    CreateReservation,
    /// `update_reservation`
    UpdateReservation,
    /// `delete_reservation`
    DeleteReservation,
    /// `get_all_clients`
    ListClients,
    /// `get_all_services`
    ListServices,
}

#[derive(Debug, Default)]
struct MockState {
    reservations: Vec<Reservation>,
    clients: Vec<Client>,
    services: Vec<Service>,
    calls: Vec<MockOperation>,
}

/// Mock reservation backend
///
/// Behaves like the REST backend against an in-memory store: creates assign
/// ids, updates resolve `clientId`/`serviceIds` against the catalogues and
/// deletes remove the record. Clones share the same store.
#[derive(Debug, Clone)]
pub struct MockReservationService {
    /// Shared store
    state: Arc<Mutex<MockState>>,

    /// Mock latency per call
    delay_ms: u64,

    /// Operations that fail with a 500
    failing: HashSet<MockOperation>,

    /// Failure message
    failure_message: String,
}

impl Default for MockReservationService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReservationService {
    /// Create an empty mock backend
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            delay_ms: 0,
            failing: HashSet::new(),
            failure_message: "Mock failure".to_string(),
        }
    }

    /// Seed reservations
    #[must_use]
    pub fn with_reservations(self, reservations: Vec<Reservation>) -> Self {
        self.lock().reservations = reservations;
        self
    }

    /// Seed the client catalogue
    #[must_use]
    pub fn with_clients(self, clients: Vec<Client>) -> Self {
        self.lock().clients = clients;
        self
    }

    /// Seed the service catalogue
    #[must_use]
    pub fn with_services(self, services: Vec<Service>) -> Self {
        self.lock().services = services;
        self
    }

    /// Set latency for every call
    #[must_use]
    pub const fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Make `operation` fail with a 500 carrying `message`
    #[must_use]
    pub fn with_failure(mut self, operation: MockOperation, message: impl Into<String>) -> Self {
        self.failing.insert(operation);
        self.failure_message = message.into();
        self
    }

    /// Current reservations
    pub fn reservations(&self) -> Vec<Reservation> {
        self.lock().reservations.clone()
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<MockOperation> {
        self.lock().calls.clone()
    }

    /// Number of calls made for `operation`
    pub fn call_count(&self, operation: MockOperation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call, wait out the delay, then apply failure injection
    async fn begin(&self, operation: MockOperation) -> ServiceResult<()> {
        self.lock().calls.push(operation);

        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        if self.failing.contains(&operation) {
            error!(?operation, message = %self.failure_message, "Mock failure injected");
            return Err(ServiceError::status(
                format!("mock://{operation:?}"),
                500,
                self.failure_message.clone(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationService for MockReservationService {
    async fn get_all_reservations(&self) -> ServiceResult<Vec<Reservation>> {
        self.begin(MockOperation::ListReservations).await?;
        Ok(self.reservations())
    }

    async fn get_reservation_by_code(&self, code: &str) -> ServiceResult<Reservation> {
        self.begin(MockOperation::GetReservation).await?;
        self.lock()
            .reservations
            .iter()
            .find(|reservation| reservation.code == code)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                code: code.to_string(),
            })
    }

    async fn create_reservation(&self, data: &CreateReservation) -> ServiceResult<Reservation> {
        self.begin(MockOperation::CreateReservation).await?;

        let mut state = self.lock();
        let code = data.code.to_string();
        if state.reservations.iter().any(|r| r.code == code) {
            return Err(ServiceError::status(
                "mock://CreateReservation",
                409,
                format!("Reservation {code} already exists"),
            ));
        }

        let id = state.reservations.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let reservation = Reservation {
            id,
            code,
            reservation_date: data.reservation_date,
            total_price: data.total_price,
            state: data.state.clone(),
            client: Some(data.client.clone()),
            mechanic: None,
            services: data.services.clone(),
        };
        state.reservations.push(reservation.clone());
        drop(state);

        info!(code = %reservation.code, id, "Mock reservation created");
        Ok(reservation)
    }

    async fn update_reservation(
        &self,
        code: &str,
        data: &UpdateReservation,
    ) -> ServiceResult<Reservation> {
        self.begin(MockOperation::UpdateReservation).await?;

        let mut guard = self.lock();
        let MockState {
            reservations,
            clients,
            services,
            ..
        } = &mut *guard;

        let reservation = reservations
            .iter_mut()
            .find(|reservation| reservation.code == code)
            .ok_or_else(|| ServiceError::NotFound {
                code: code.to_string(),
            })?;

        if let Some(date) = data.reservation_date {
            reservation.reservation_date = date;
        }
        if let Some(state) = &data.state {
            reservation.state = state.clone();
        }
        if let Some(total) = data.total_price {
            reservation.total_price = total;
        }
        if let Some(client_id) = data.client_id {
            reservation.client = clients.iter().find(|c| c.id == client_id).cloned();
        }
        if let Some(ids) = &data.service_ids {
            reservation.services = services
                .iter()
                .filter(|service| ids.contains(&service.id))
                .cloned()
                .collect();
        }

        Ok(reservation.clone())
    }

    async fn delete_reservation(&self, code: &str) -> ServiceResult<()> {
        self.begin(MockOperation::DeleteReservation).await?;

        let mut state = self.lock();
        let before = state.reservations.len();
        state.reservations.retain(|reservation| reservation.code != code);
        if state.reservations.len() == before {
            return Err(ServiceError::NotFound {
                code: code.to_string(),
            });
        }
        Ok(())
    }

    async fn get_all_clients(&self) -> ServiceResult<Vec<Client>> {
        self.begin(MockOperation::ListClients).await?;
        Ok(self.lock().clients.clone())
    }

    async fn get_all_services(&self) -> ServiceResult<Vec<Service>> {
        self.begin(MockOperation::ListServices).await?;
        Ok(self.lock().services.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use reservate_core::ReservationState;

    fn client() -> Client {
        Client {
            id: 1,
            code: "C1".to_string(),
            name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            phone: None,
            email: None,
        }
    }

    fn service(id: i64, price: f64) -> Service {
        Service {
            id,
            code: format!("S{id}"),
            title: format!("Service {id}"),
            description: None,
            price,
        }
    }

    fn create_payload(code: i64) -> CreateReservation {
        CreateReservation {
            code,
            reservation_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            state: ReservationState::Pending,
            total_price: 10.0,
            client_id: 1,
            service_ids: vec![1],
            client: client(),
            services: vec![service(1, 10.0)],
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let mock = MockReservationService::new();
        let created = mock.create_reservation(&create_payload(500)).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.code, "500");

        let fetched = mock.get_reservation_by_code("500").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let mock = MockReservationService::new();
        mock.create_reservation(&create_payload(1)).await.unwrap();
        let err = mock.create_reservation(&create_payload(1)).await.unwrap_err();
        assert_eq!(err.status_code(), Some(409));
    }

    #[tokio::test]
    async fn test_update_resolves_ids_against_catalogues() {
        let mock = MockReservationService::new()
            .with_clients(vec![client()])
            .with_services(vec![service(1, 10.0), service(2, 5.0)]);
        mock.create_reservation(&create_payload(9)).await.unwrap();

        let update = UpdateReservation {
            service_ids: Some(vec![2]),
            total_price: Some(5.0),
            state: Some(ReservationState::Confirmed),
            ..UpdateReservation::default()
        };
        let updated = mock.update_reservation("9", &update).await.unwrap();

        assert_eq!(updated.service_ids(), vec![2]);
        assert_eq!(updated.total_price, 5.0);
        assert_eq!(updated.state, ReservationState::Confirmed);
    }

    #[tokio::test]
    async fn test_missing_code_is_not_found() {
        let mock = MockReservationService::new();
        let err = mock.get_reservation_by_code("404").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert!(mock.delete_reservation("404").await.is_err());
    }

    #[tokio::test]
    async fn test_failure_injection_and_call_log() {
        let mock = MockReservationService::new()
            .with_failure(MockOperation::ListReservations, "backend down");

        let err = mock.get_all_reservations().await.unwrap_err();
        assert_eq!(err.detail().as_deref(), Some("backend down"));
        assert!(mock.get_all_clients().await.is_ok());
        assert_eq!(
            mock.calls(),
            vec![MockOperation::ListReservations, MockOperation::ListClients]
        );
        assert_eq!(mock.call_count(MockOperation::ListReservations), 1);
    }
}
