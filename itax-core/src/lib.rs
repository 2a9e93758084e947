//! Income-tax computation for Indian salaried employees.
//!
//! Rate schedules are data: a [`RateCatalogue`] maps an assessment year and
//! regime to a [`RateSchedule`], and every calculator borrows the schedule it
//! runs against. Inputs are validated at the boundary and all failures are
//! reported as [`ValidationError`].

pub mod calculations;
mod error;
pub mod models;
pub mod schedules;
mod validation;

pub use error::ValidationError;
pub use models::*;
pub use schedules::RateCatalogue;
