//! Edit form for an existing reservation

use super::{ServiceSelection, SubmitOutcome, validate_state};
use crate::notify::describe_failure;
use crate::route::Route;
use crate::state::AdminContext;
use chrono::{DateTime, Utc};
use reservate_core::{
    Client, ClientId, Reservation, ReservationState, Service, ServiceId, UpdateReservation,
};
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Editable field values of the update form
///
/// `total_price` is kept as text the way the form field holds it.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateReservationInput {
    /// Reservation date
    #[validate(required(message = "Reservation date is required"))]
    pub reservation_date: Option<DateTime<Utc>>,

    /// State, as its wire value
    #[validate(
        length(min = 1, message = "State is required"),
        custom(function = "validate_state")
    )]
    pub state: String,

    /// Total price as typed
    #[validate(custom(function = "validate_price"))]
    pub total_price: String,

    /// Selected client
    #[validate(required(message = "Client is required"))]
    pub client_id: Option<ClientId>,

    /// Selected services
    #[validate(length(min = 1, message = "Select at least one service"))]
    pub service_ids: Vec<ServiceId>,
}

impl UpdateReservationInput {
    fn from_reservation(reservation: &Reservation) -> Self {
        Self {
            reservation_date: Some(reservation.reservation_date),
            state: reservation.state.as_str().to_string(),
            total_price: reservation.total_price.to_string(),
            client_id: reservation.client.as_ref().map(|c| c.id),
            service_ids: reservation.service_ids(),
        }
    }
}

fn validate_price(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(()),
        _ => Err(ValidationError::new("invalid_price")),
    }
}

/// State of the update form for one reservation
#[derive(Debug)]
pub struct UpdateForm {
    context: AdminContext,
    code: String,
    clients: Vec<Client>,
    services: Vec<Service>,
    selection: ServiceSelection,
    /// Editable field values
    pub input: UpdateReservationInput,
}

impl UpdateForm {
    /// Load the catalogues and the reservation `code` together and populate
    /// the form
    ///
    /// Without a code nothing is fetched. If any of the three loads fails
    /// none of them is applied. Either way an error notification is raised
    /// and the returned `Err` names the route to go back to.
    pub async fn open(context: AdminContext, code: Option<&str>) -> Result<Self, Route> {
        let Some(code) = code.filter(|c| !c.trim().is_empty()) else {
            context.notifier.error("Reservation code is required");
            return Err(Route::List);
        };

        let service = &context.service;
        let loaded = tokio::try_join!(
            service.get_all_clients(),
            service.get_all_services(),
            service.get_reservation_by_code(code),
        );

        let (clients, services, reservation) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                error!(code, error = %e, "Failed to load reservation for editing");
                context
                    .notifier
                    .error(&describe_failure("Error loading reservation", &e));
                return Err(Route::List);
            }
        };

        info!(code, "Loaded reservation for editing");
        Ok(Self {
            input: UpdateReservationInput::from_reservation(&reservation),
            selection: ServiceSelection::from_services(reservation.services.clone()),
            code: code.to_string(),
            clients,
            services,
            context,
        })
    }

    /// Code of the reservation being edited; not editable
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
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

    /// Services currently ticked
    #[must_use]
    pub fn selected_services(&self) -> &[Service] {
        self.selection.services()
    }

    /// Tick or untick a service; the total field is overwritten with the new sum
    pub fn toggle_service(&mut self, id: ServiceId) {
        if self.selection.toggle(&self.services, id) {
            self.input.service_ids = self.selection.ids();
            self.input.total_price = self.selection.total().to_string();
        }
    }

    /// Replace the whole selection, recomputing the total
    ///
    /// Repeated ids are selected once; ids missing from the catalogue fail
    /// validation on submit.
    pub fn select_services(&mut self, ids: &[ServiceId]) {
        self.selection.replace(&self.services, ids);
        self.input.service_ids = self.selection.ids();
        self.input.total_price = self.selection.total().to_string();
    }

    /// Type into the total field
    pub fn set_total_price(&mut self, value: impl Into<String>) {
        self.input.total_price = value.into();
    }

    /// Validate and send the changes
    pub async fn submit(&self) -> SubmitOutcome {
        if let Err(errors) = self.selection.validate_with(&self.input) {
            return SubmitOutcome::Invalid(errors);
        }

        let Some(client_id) = self
            .input
            .client_id
            .filter(|id| self.clients.iter().any(|c| c.id == *id))
        else {
            error!(client_id = ?self.input.client_id, "Selected client not found");
            self.context.notifier.error("Client not found");
            return SubmitOutcome::Failed {
                reason: "Client not found".to_string(),
            };
        };

        let (Ok(state), Ok(total_price)) = (
            self.input.state.parse::<ReservationState>(),
            self.input.total_price.trim().parse::<f64>(),
        ) else {
            return SubmitOutcome::Failed {
                reason: "Invalid form values".to_string(),
            };
        };

        let changes = UpdateReservation {
            reservation_date: self.input.reservation_date,
            state: Some(state),
            total_price: Some(total_price),
            client_id: Some(client_id),
            service_ids: Some(self.input.service_ids.clone()),
            mechanic_id: None,
        };

        match self
            .context
            .service
            .update_reservation(&self.code, &changes)
            .await
        {
            Ok(reservation) => {
                info!(code = %self.code, "Updated reservation");
                self.context
                    .notifier
                    .success("Reservation updated successfully");
                SubmitOutcome::Saved {
                    reservation: Box::new(reservation),
                    navigate_to: Route::List,
                }
            }
            Err(e) => {
                error!(code = %self.code, error = %e, "Failed to update reservation");
                let message = describe_failure("Error updating reservation", &e);
                self.context.notifier.error(&message);
                SubmitOutcome::Failed { reason: message }
            }
        }
    }
}
