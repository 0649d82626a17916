//! Reservation list with search, state filter, sorting and delete dialog

use crate::engine::{ListQuery, SortField, SortOrder, StateFilter};
use crate::notify::describe_failure;
use crate::state::AdminContext;
use reservate_core::Reservation;
use tracing::{debug, error, info};

/// Last derived list and the inputs it was computed from
#[derive(Debug, Clone)]
struct Derived {
    query: ListQuery,
    generation: u64,
    items: Vec<Reservation>,
}

/// State of the reservation list screen
///
/// The filtered and sorted rows are recomputed lazily, and only when the
/// query or the loaded records changed since the last computation.
#[derive(Debug)]
pub struct ListView {
    context: AdminContext,
    reservations: Vec<Reservation>,
    query: ListQuery,
    loading: bool,
    pending_delete: Option<String>,
    generation: u64,
    derived: Option<Derived>,
    recomputations: usize,
}

impl ListView {
    /// Empty list bound to `context`
    #[must_use]
    pub fn new(context: AdminContext) -> Self {
        Self {
            context,
            reservations: Vec::new(),
            query: ListQuery::default(),
            loading: false,
            pending_delete: None,
            generation: 0,
            derived: None,
            recomputations: 0,
        }
    }

    /// Fetch every reservation
    ///
    /// On failure the list is emptied and an error notification is raised.
    pub async fn load(&mut self) {
        self.loading = true;

        self.reservations = match self.context.service.get_all_reservations().await {
            Ok(reservations) => {
                info!(count = reservations.len(), "Loaded reservations");
                reservations
            }
            Err(e) => {
                error!(error = %e, "Failed to load reservations");
                self.context.notifier.error("Error loading reservations");
                Vec::new()
            }
        };
        self.generation += 1;
        self.loading = false;
    }

    /// Whether a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Records as returned by the backend
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Current selection inputs
    #[must_use]
    pub const fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Replace the search term
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.search_term = term.into();
    }

    /// Replace the state filter
    pub fn set_state_filter(&mut self, filter: StateFilter) {
        self.query.state_filter = filter;
    }

    /// Set the sort key and direction
    pub const fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.query.sort_field = field;
        self.query.sort_order = order;
    }

    /// Column header click: the active column flips direction, any other
    /// column becomes active in ascending order
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.query.sort_field == field {
            self.query.sort_order = self.query.sort_order.toggled();
        } else {
            self.query.sort_field = field;
            self.query.sort_order = SortOrder::Ascending;
        }
    }

    /// Filtered and sorted rows
    pub fn rows(&mut self) -> &[Reservation] {
        let fresh = self
            .derived
            .as_ref()
            .is_some_and(|d| d.generation == self.generation && d.query == self.query);

        if !fresh {
            self.recomputations += 1;
            self.derived = Some(Derived {
                query: self.query.clone(),
                generation: self.generation,
                items: self.query.apply(&self.reservations),
            });
        }

        self.derived.as_ref().map_or(&[], |d| d.items.as_slice())
    }

    /// How many times the rows have been derived
    #[must_use]
    pub const fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// The row's delete button; currently inert
    #[allow(clippy::unused_self)]
    pub fn press_delete_button(&self, code: &str) {
        debug!(code, "Delete is temporarily disabled");
    }

    /// Ask for confirmation before deleting `code`
    pub fn open_delete_dialog(&mut self, code: impl Into<String>) {
        self.pending_delete = Some(code.into());
    }

    /// Code awaiting confirmation, if the dialog is open
    #[must_use]
    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Close the dialog without deleting
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the reservation the dialog was opened for, then re-fetch
    ///
    /// Returns whether a reservation was deleted.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(code) = self.pending_delete.take() else {
            return false;
        };

        match self.context.service.delete_reservation(&code).await {
            Ok(()) => {
                info!(code = %code, "Deleted reservation");
                self.context
                    .notifier
                    .success("Reservation deleted successfully");
                self.load().await;
                true
            }
            Err(e) => {
                error!(code = %code, error = %e, "Failed to delete reservation");
                self.context
                    .notifier
                    .error(&describe_failure("Error deleting reservation", &e));
                false
            }
        }
    }
}
