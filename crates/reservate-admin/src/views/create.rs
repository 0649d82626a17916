//! New reservation form

use super::{ServiceSelection, SubmitOutcome, validate_state};
use crate::route::Route;
use crate::state::AdminContext;
use chrono::{DateTime, Utc};
use reservate_core::{
    Client, ClientId, CreateReservation, ReservationState, Service, ServiceId,
};
use tracing::{error, info};
use validator::Validate;

/// Raw field values of the create form
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct CreateReservationInput {
    /// Positive reservation code
    #[validate(
        required(message = "Code is required"),
        range(min = 1, message = "Code must be a positive integer")
    )]
    pub code: Option<i64>,

    /// Reservation date
    #[validate(required(message = "Reservation date is required"))]
    pub reservation_date: Option<DateTime<Utc>>,

    /// Initial state, as its wire value
    #[validate(
        length(min = 1, message = "State is required"),
        custom(function = "validate_state")
    )]
    pub state: String,

    /// Selected client
    #[validate(required(message = "Client is required"))]
    pub client_id: Option<ClientId>,

    /// Selected services
    #[validate(length(min = 1, message = "Select at least one service"))]
    pub service_ids: Vec<ServiceId>,
}

/// State of the create form
#[derive(Debug)]
pub struct CreateForm {
    context: AdminContext,
    clients: Vec<Client>,
    services: Vec<Service>,
    selection: ServiceSelection,
    loading: bool,
    /// Field values
    pub input: CreateReservationInput,
}

impl CreateForm {
    /// Blank form bound to `context`
    #[must_use]
    pub fn new(context: AdminContext) -> Self {
        Self {
            context,
            clients: Vec::new(),
            services: Vec::new(),
            selection: ServiceSelection::default(),
            loading: false,
            input: CreateReservationInput {
                state: ReservationState::Pending.as_str().to_string(),
                ..CreateReservationInput::default()
            },
        }
    }

    /// Fetch the client and service catalogues
    ///
    /// A failed catalogue stays empty and raises an error notification.
    pub async fn load(&mut self) {
        self.loading = true;
        let service = &self.context.service;
        let (clients, services) = tokio::join!(service.get_all_clients(), service.get_all_services());

        match clients {
            Ok(clients) => self.clients = clients,
            Err(e) => {
                error!(error = %e, "Failed to load clients");
                self.context.notifier.error("Error loading clients");
            }
        }
        match services {
            Ok(services) => self.services = services,
            Err(e) => {
                error!(error = %e, "Failed to load services");
                self.context.notifier.error("Error loading services");
            }
        }
        self.loading = false;
    }

    /// Whether the catalogues are being fetched
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Client catalogue
    #[must_use]
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Service catalogue
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Tick or untick a service
    pub fn toggle_service(&mut self, id: ServiceId) {
        if self.selection.toggle(&self.services, id) {
            self.input.service_ids = self.selection.ids();
        }
    }

    /// Select exactly `ids`
    ///
    /// Repeated ids are selected once; ids missing from the catalogue fail
    /// validation on submit.
    pub fn select_services(&mut self, ids: &[ServiceId]) {
        self.selection.replace(&self.services, ids);
        self.input.service_ids = self.selection.ids();
    }

    /// Services currently ticked
    #[must_use]
    pub fn selected_services(&self) -> &[Service] {
        self.selection.services()
    }

    /// Sum of the ticked services' prices
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.selection.total()
    }

    /// Validate and send the new reservation
    ///
    /// Backend failures and an unknown client are logged only.
    pub async fn submit(&self) -> SubmitOutcome {
        if let Err(errors) = self.selection.validate_with(&self.input) {
            return SubmitOutcome::Invalid(errors);
        }

        let (Some(code), Some(reservation_date), Some(client_id)) = (
            self.input.code,
            self.input.reservation_date,
            self.input.client_id,
        ) else {
            return SubmitOutcome::Failed {
                reason: "Incomplete form".to_string(),
            };
        };

        let Some(client) = self.clients.iter().find(|c| c.id == client_id) else {
            error!(client_id, "Selected client not found");
            return SubmitOutcome::Failed {
                reason: "Client not found".to_string(),
            };
        };

        let state = match self.input.state.parse::<ReservationState>() {
            Ok(state) => state,
            Err(e) => {
                return SubmitOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let payload = CreateReservation {
            code,
            reservation_date,
            state,
            total_price: self.total_price(),
            client_id,
            service_ids: self.input.service_ids.clone(),
            client: client.clone(),
            services: self.selection.services().to_vec(),
        };

        match self.context.service.create_reservation(&payload).await {
            Ok(reservation) => {
                info!(code = %reservation.code, "Created reservation");
                SubmitOutcome::Saved {
                    reservation: Box::new(reservation),
                    navigate_to: Route::List,
                }
            }
            Err(e) => {
                error!(code, error = %e, "Failed to create reservation");
                SubmitOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
