//! REST client for the reservation backend
//!
//! The [`ReservationService`] trait describes the calls the admin views make:
//! the five reservation operations on `/reservate` plus the client and service
//! catalogues used by the forms. [`HttpReservationService`] talks to the real
//! backend; [`MockReservationService`] keeps everything in memory for tests.
//!
//! No call is retried, cached or deduplicated. Failures are logged and handed
//! back to the caller unchanged.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod http;
pub mod mock;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use http::HttpReservationService;
pub use mock::{MockOperation, MockReservationService};
pub use service::ReservationService;
