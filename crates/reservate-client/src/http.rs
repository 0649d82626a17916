//! reqwest-backed implementation of [`ReservationService`]

use crate::error::{ServiceError, ServiceResult};
use crate::service::ReservationService;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use reservate_core::config::ApiConfig;
use reservate_core::{Client, CreateReservation, Reservation, Service, UpdateReservation};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};

/// HTTP client for the reservation backend
///
/// Holds one pooled [`reqwest::Client`]. Dropping a pending call's future
/// aborts the underlying request.
#[derive(Debug, Clone)]
pub struct HttpReservationService {
    /// HTTP client
    client: reqwest::Client,

    /// `{base}/reservate`
    reservation_url: String,

    /// `{base}/client`
    client_url: String,

    /// `{base}/service`
    service_url: String,
}

impl HttpReservationService {
    /// Create a client with the configured timeouts
    pub fn new(config: &ApiConfig) -> ServiceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| ServiceError::Configuration {
                message: e.to_string(),
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Create a service around an existing HTTP client
    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            client,
            reservation_url: config.reservation_url(),
            client_url: config.client_url(),
            service_url: config.service_url(),
        }
    }

    /// `{base}/reservate/{code}[/{action}]` with the code percent-encoded
    fn code_url(&self, code: &str, action: Option<&str>) -> String {
        let encoded = urlencoding::encode(code);
        match action {
            Some(action) => format!("{}/{encoded}/{action}", self.reservation_url),
            None => format!("{}/{encoded}", self.reservation_url),
        }
    }

    /// Send `request` and decode a JSON body
    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &str,
        request: RequestBuilder,
    ) -> ServiceResult<T> {
        let response = Self::send(operation, url, request).await?;

        let body = response.text().await.map_err(|source| {
            error!(operation, url, error = %source, "Failed to read response body");
            ServiceError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        serde_json::from_str(&body).map_err(|e| {
            error!(operation, url, error = %e, "Failed to decode response body");
            ServiceError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Send `request` and check for a success status
    async fn send(
        operation: &'static str,
        url: &str,
        request: RequestBuilder,
    ) -> ServiceResult<Response> {
        debug!(operation, url, "Sending request");

        let response = request.send().await.map_err(|source| {
            error!(operation, url, error = %source, "Request failed");
            ServiceError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        error!(
            operation,
            url,
            status = status.as_u16(),
            body = %message,
            "Backend returned error status"
        );
        Err(ServiceError::status(url, status.as_u16(), message))
    }
}

#[async_trait]
impl ReservationService for HttpReservationService {
    async fn get_all_reservations(&self) -> ServiceResult<Vec<Reservation>> {
        let url = self.reservation_url.as_str();
        let reservations: Vec<Reservation> = self
            .fetch("get_all_reservations", url, self.client.get(url))
            .await?;
        debug!(count = reservations.len(), "Fetched reservations");
        Ok(reservations)
    }

    async fn get_reservation_by_code(&self, code: &str) -> ServiceResult<Reservation> {
        let url = self.code_url(code, None);
        self.fetch("get_reservation_by_code", &url, self.client.get(&url))
            .await
    }

    async fn create_reservation(&self, data: &CreateReservation) -> ServiceResult<Reservation> {
        let url = format!("{}/create", self.reservation_url);
        let created: Reservation = self
            .fetch("create_reservation", &url, self.client.post(&url).json(data))
            .await?;
        info!(code = %created.code, id = created.id, "Reservation created");
        Ok(created)
    }

    async fn update_reservation(
        &self,
        code: &str,
        data: &UpdateReservation,
    ) -> ServiceResult<Reservation> {
        let url = self.code_url(code, Some("update"));
        let updated: Reservation = self
            .fetch("update_reservation", &url, self.client.patch(&url).json(data))
            .await?;
        info!(code, "Reservation updated");
        Ok(updated)
    }

    async fn delete_reservation(&self, code: &str) -> ServiceResult<()> {
        let url = self.code_url(code, Some("delete"));
        Self::send("delete_reservation", &url, self.client.delete(&url)).await?;
        info!(code, "Reservation deleted");
        Ok(())
    }

    async fn get_all_clients(&self) -> ServiceResult<Vec<Client>> {
        let url = self.client_url.as_str();
        self.fetch("get_all_clients", url, self.client.get(url)).await
    }

    async fn get_all_services(&self) -> ServiceResult<Vec<Service>> {
        let url = self.service_url.as_str();
        self.fetch("get_all_services", url, self.client.get(url)).await
    }

    fn name(&self) -> &str {
        "http"
    }
}
