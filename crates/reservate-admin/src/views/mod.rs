//! Headless view models: list, create form, update form and dashboard

mod create;
mod list;
mod summary;
mod update;

pub use create::{CreateForm, CreateReservationInput};
pub use list::ListView;
pub use summary::{ReservationSummary, SummaryView};
pub use update::{UpdateForm, UpdateReservationInput};

use crate::route::Route;
use reservate_core::{Reservation, ReservationState, Service, ServiceId, types};
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

/// Result of submitting a form
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The backend accepted the change
    Saved {
        /// Reservation as persisted
        reservation: Box<Reservation>,
        /// Where the interface goes next
        navigate_to: Route,
    },
    /// Field validation failed; nothing was sent
    Invalid(ValidationErrors),
    /// The change was not saved
    Failed {
        /// What went wrong
        reason: String,
    },
}

impl SubmitOutcome {
    /// Whether the change was saved
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Services ticked in a form, in selection order
///
/// Ids that are not in the catalogue are remembered so that submitting the
/// form can reject them instead of silently dropping them.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ServiceSelection {
    selected: Vec<Service>,
    unknown: Vec<ServiceId>,
}

impl ServiceSelection {
    pub(crate) const fn from_services(services: Vec<Service>) -> Self {
        Self {
            selected: services,
            unknown: Vec::new(),
        }
    }

    /// Select `id` from `catalogue`, or deselect it if already selected.
    /// Returns `false` when the id is unknown.
    pub(crate) fn toggle(&mut self, catalogue: &[Service], id: ServiceId) -> bool {
        if let Some(position) = self.selected.iter().position(|s| s.id == id) {
            self.selected.remove(position);
            return true;
        }
        if let Some(position) = self.unknown.iter().position(|unknown| *unknown == id) {
            self.unknown.remove(position);
            return false;
        }

        match catalogue.iter().find(|s| s.id == id) {
            Some(service) => {
                self.selected.push(service.clone());
                true
            }
            None => {
                debug!(service_id = id, "Unknown service selected");
                self.unknown.push(id);
                false
            }
        }
    }

    /// Select exactly `ids`, in order; repeated ids are selected once
    pub(crate) fn replace(&mut self, catalogue: &[Service], ids: &[ServiceId]) {
        self.selected.clear();
        self.unknown.clear();

        for &id in ids {
            if self.selected.iter().any(|s| s.id == id) || self.unknown.contains(&id) {
                continue;
            }
            match catalogue.iter().find(|s| s.id == id) {
                Some(service) => self.selected.push(service.clone()),
                None => self.unknown.push(id),
            }
        }
    }

    pub(crate) fn services(&self) -> &[Service] {
        &self.selected
    }

    pub(crate) fn ids(&self) -> Vec<ServiceId> {
        self.selected.iter().map(|s| s.id).collect()
    }

    pub(crate) fn total(&self) -> f64 {
        types::total_price(&self.selected)
    }

    /// `input`'s field errors plus one for every requested id missing from
    /// the catalogue
    pub(crate) fn validate_with(&self, input: &impl Validate) -> Result<(), ValidationErrors> {
        let mut errors = input.validate().err().unwrap_or_default();

        if !self.unknown.is_empty() {
            let ids = self
                .unknown
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let mut error = ValidationError::new("unknown_service")
                .with_message(format!("Unknown service ids: {ids}").into());
            error.add_param("ids".into(), &self.unknown);
            errors.add("service_ids", error);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Form-level check that `state` names a known lifecycle state
fn validate_state(state: &str) -> Result<(), ValidationError> {
    state
        .parse::<ReservationState>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_state"))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn service(id: ServiceId, price: f64) -> Service {
        Service {
            id,
            code: format!("S{id}"),
            title: format!("Service {id}"),
            description: None,
            price,
        }
    }

    #[test]
    fn test_selection_total_follows_toggles() {
        let catalogue = vec![service(1, 10.0), service(2, 15.5), service(3, 4.0)];
        let mut selection = ServiceSelection::default();

        assert!(selection.toggle(&catalogue, 1));
        assert!(selection.toggle(&catalogue, 2));
        assert!(selection.toggle(&catalogue, 3));
        assert_eq!(selection.total(), 29.5);

        assert!(selection.toggle(&catalogue, 2));
        assert_eq!(selection.total(), 14.0);
        assert_eq!(selection.ids(), vec![1, 3]);
    }

    #[test]
    fn test_selection_remembers_unknown_service() {
        let mut selection = ServiceSelection::default();
        assert!(!selection.toggle(&[service(1, 10.0)], 9));
        assert!(selection.services().is_empty());
        assert_eq!(selection.unknown, vec![9]);

        assert!(!selection.toggle(&[service(1, 10.0)], 9));
        assert!(selection.unknown.is_empty());
    }

    #[test]
    fn test_replace_selects_repeated_ids_once() {
        let catalogue = vec![service(1, 10.0), service(2, 15.5)];
        let mut selection = ServiceSelection::from_services(vec![service(1, 10.0)]);

        selection.replace(&catalogue, &[2, 2, 7, 7]);

        assert_eq!(selection.ids(), vec![2]);
        assert_eq!(selection.total(), 15.5);
        assert_eq!(selection.unknown, vec![7]);
    }

    #[test]
    fn test_empty_selection_total_is_positive_zero() {
        let selection = ServiceSelection::default();
        assert_eq!(selection.total().to_string(), "0");
    }

    #[test]
    fn test_validate_state() {
        assert!(validate_state("in_progress").is_ok());
        assert!(validate_state("archived").is_err());
    }
}
