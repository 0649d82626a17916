//! Shared context handed to every view

use crate::notify::{Notifier, TerminalNotifier};
use reservate_client::{HttpReservationService, ReservationService, ServiceResult};
use reservate_core::AdminConfig;
use std::sync::Arc;

/// Configuration plus the backend and notification sink the views talk to
#[derive(Clone)]
pub struct AdminContext {
    /// Application configuration
    pub config: AdminConfig,
    /// Reservation backend
    pub service: Arc<dyn ReservationService>,
    /// Notification sink
    pub notifier: Arc<dyn Notifier>,
}

impl AdminContext {
    /// Context backed by the HTTP service and terminal notifications
    pub fn new(config: AdminConfig) -> ServiceResult<Self> {
        let service = HttpReservationService::new(&config.api)?;

        Ok(Self {
            config,
            service: Arc::new(service),
            notifier: Arc::new(TerminalNotifier),
        })
    }

    /// Context with explicit collaborators
    pub const fn with_parts(
        config: AdminConfig,
        service: Arc<dyn ReservationService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            service,
            notifier,
        }
    }
}

impl std::fmt::Debug for AdminContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminContext")
            .field("base_url", &self.config.api.base_url)
            .field("service", &self.service.name())
            .field("notifier", &self.notifier)
            .finish()
    }
}
