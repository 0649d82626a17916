//! Filtering and sorting of the reservation list
//!
//! [`ListQuery::apply`] is a pure function of the loaded records and the three
//! selection inputs: a search term, a state filter and a sort key with its
//! direction.

use clap::ValueEnum;
use reservate_core::utils::{locale_compare, parse_code_number};
use reservate_core::{Reservation, ReservationState};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column the list is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Reservation code, compared numerically
    Code,
    /// Reservation date
    #[default]
    Date,
    /// Client "first last"
    Client,
    /// Total price
    Total,
    /// Lifecycle state
    State,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first
    #[value(name = "asc")]
    Ascending,
    /// Largest first
    #[default]
    #[value(name = "desc")]
    Descending,
}

impl SortOrder {
    /// The opposite direction
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Exact-match predicate on the reservation state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StateFilter {
    /// Every state passes
    #[default]
    All,
    /// Only this state passes
    Only(ReservationState),
}

impl StateFilter {
    /// Whether `state` passes the filter
    #[must_use]
    pub fn matches(&self, state: &ReservationState) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == state,
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(state) => write!(f, "{state}"),
        }
    }
}

impl FromStr for StateFilter {
    type Err = reservate_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Selection inputs of the list view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring searched in names, code and service titles
    pub search_term: String,
    /// State predicate
    pub state_filter: StateFilter,
    /// Sort key
    pub sort_field: SortField,
    /// Sort direction
    pub sort_order: SortOrder,
}

impl ListQuery {
    /// Whether `reservation` passes both the search and the state filter
    #[must_use]
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.state_filter.matches(&reservation.state)
            && matches_search(reservation, &self.search_term.to_lowercase())
    }

    /// Filter `reservations` and order the survivors
    ///
    /// Ties keep no particular order.
    #[must_use]
    pub fn apply(&self, reservations: &[Reservation]) -> Vec<Reservation> {
        let term = self.search_term.to_lowercase();
        let mut filtered: Vec<Reservation> = reservations
            .iter()
            .filter(|r| self.state_filter.matches(&r.state) && matches_search(r, &term))
            .cloned()
            .collect();

        filtered.sort_unstable_by(|a, b| {
            let ordering = compare(a, b, self.sort_field);
            match self.sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        filtered
    }
}

/// Search across client first and last name, code and service titles
///
/// `term` must already be lowercase. A missing client never matches.
fn matches_search(reservation: &Reservation, term: &str) -> bool {
    let client_matches = reservation.client.as_ref().is_some_and(|client| {
        client.name.to_lowercase().contains(term) || client.last_name.to_lowercase().contains(term)
    });

    client_matches
        || reservation.code.to_lowercase().contains(term)
        || reservation
            .services
            .iter()
            .any(|service| service.title.to_lowercase().contains(term))
}

/// Ascending comparison of two reservations on `field`
#[must_use]
pub fn compare(a: &Reservation, b: &Reservation, field: SortField) -> Ordering {
    match field {
        SortField::Code => parse_code_number(&a.code).cmp(&parse_code_number(&b.code)),
        SortField::Date => a
            .reservation_date
            .timestamp_millis()
            .cmp(&b.reservation_date.timestamp_millis()),
        SortField::Client => locale_compare(&a.client_name(), &b.client_name()),
        SortField::Total => a.total_price.total_cmp(&b.total_price),
        SortField::State => locale_compare(a.state.as_str(), b.state.as_str()),
    }
}
