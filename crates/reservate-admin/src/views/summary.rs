//! Dashboard counters

use crate::notify::describe_failure;
use crate::state::AdminContext;
use reservate_core::{Reservation, ReservationState};
use serde::Serialize;
use tracing::{error, info, warn};

/// Reservation counts per state and overall revenue
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReservationSummary {
    /// Pending reservations
    pub pending: usize,
    /// Confirmed reservations
    pub confirmed: usize,
    /// Reservations in progress
    pub in_progress: usize,
    /// Completed reservations
    pub completed: usize,
    /// Cancelled reservations
    pub cancelled: usize,
    /// Every reservation, including unrecognized states
    pub total: usize,
    /// Sum of `total_price` over every reservation
    pub revenue: f64,
}

impl ReservationSummary {
    /// Fold `reservations` into counters
    ///
    /// A state outside the known lifecycle only counts toward `total`.
    #[must_use]
    pub fn from_reservations(reservations: &[Reservation]) -> Self {
        reservations.iter().fold(Self::default(), |mut summary, r| {
            match &r.state {
                ReservationState::Pending => summary.pending += 1,
                ReservationState::Confirmed => summary.confirmed += 1,
                ReservationState::InProgress => summary.in_progress += 1,
                ReservationState::Completed => summary.completed += 1,
                ReservationState::Cancelled => summary.cancelled += 1,
                ReservationState::Unrecognized(raw) => {
                    warn!(code = %r.code, state = %raw, "Unrecognized reservation state");
                }
            }
            summary.total += 1;
            summary.revenue += r.total_price;
            summary
        })
    }
}

/// State of the dashboard
#[derive(Debug)]
pub struct SummaryView {
    context: AdminContext,
    summary: ReservationSummary,
    loading: bool,
}

impl SummaryView {
    /// Dashboard bound to `context`, with zeroed counters
    #[must_use]
    pub fn new(context: AdminContext) -> Self {
        Self {
            context,
            summary: ReservationSummary::default(),
            loading: false,
        }
    }

    /// Fetch every reservation and recompute the counters
    pub async fn load(&mut self) {
        self.loading = true;

        self.summary = match self.context.service.get_all_reservations().await {
            Ok(reservations) => {
                let summary = ReservationSummary::from_reservations(&reservations);
                info!(total = summary.total, "Computed reservation summary");
                summary
            }
            Err(e) => {
                error!(error = %e, "Failed to load reservation summary");
                self.context
                    .notifier
                    .error(&describe_failure("Error loading summary", &e));
                ReservationSummary::default()
            }
        };
        self.loading = false;
    }

    /// Whether a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current counters
    #[must_use]
    pub const fn summary(&self) -> &ReservationSummary {
        &self.summary
    }
}
