//! Administrative views for service reservations
//!
//! Each view owns the state a browser component would keep (loading flag,
//! dialog visibility, filter and sort selection, form fields) and talks to the
//! backend through [`reservate_client::ReservationService`]. Derived data such
//! as the filtered list or the dashboard counters is recomputed purely from
//! the fetched records.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::missing_errors_doc)]

pub mod engine;
pub mod notify;
pub mod render;
pub mod route;
pub mod state;
pub mod views;

pub use engine::{ListQuery, SortField, SortOrder, StateFilter};
pub use notify::{Notification, Notifier, RecordingNotifier, TerminalNotifier};
pub use route::Route;
pub use state::AdminContext;
pub use views::{
    CreateForm, ListView, ReservationSummary, SubmitOutcome, SummaryView, UpdateForm,
};
