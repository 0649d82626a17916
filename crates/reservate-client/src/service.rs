//! Core service trait for the reservation backend

use crate::error::ServiceResult;
use async_trait::async_trait;
use reservate_core::{Client, CreateReservation, Reservation, Service, UpdateReservation};

/// Calls the admin views make against the backend
///
/// Every method is a single request/response pair. Implementations log
/// failures and return them untouched; recovery is the caller's business.
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// `GET /reservate`: every reservation, in backend order
    async fn get_all_reservations(&self) -> ServiceResult<Vec<Reservation>>;

    /// `GET /reservate/{code}`
    async fn get_reservation_by_code(&self, code: &str) -> ServiceResult<Reservation>;

    /// `POST /reservate/create` with embedded client and service objects
    async fn create_reservation(&self, data: &CreateReservation) -> ServiceResult<Reservation>;

    /// `PATCH /reservate/{code}/update`; only supplied fields change
    async fn update_reservation(
        &self,
        code: &str,
        data: &UpdateReservation,
    ) -> ServiceResult<Reservation>;

    /// `DELETE /reservate/{code}/delete`
    async fn delete_reservation(&self, code: &str) -> ServiceResult<()>;

    /// `GET /client`: the client catalogue
    async fn get_all_clients(&self) -> ServiceResult<Vec<Client>>;

    /// `GET /service`: the service catalogue
    async fn get_all_services(&self) -> ServiceResult<Vec<Service>>;

    /// Backend name, for logs
    fn name(&self) -> &str;
}
