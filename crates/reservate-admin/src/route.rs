//! Navigation targets between views

use std::fmt;

/// A view the admin interface can navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Reservation list
    List,
    /// New reservation form
    Create,
    /// Edit form for the reservation with this code
    Update(String),
    /// Dashboard
    Summary,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "/reservations"),
            Self::Create => write!(f, "/reservations/create"),
            Self::Update(code) => write!(f, "/reservations/{code}/update"),
            Self::Summary => write!(f, "/"),
        }
    }
}
