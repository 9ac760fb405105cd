//! Storefront checkout library.
//!
//! Drives the dependent shipping selection of a checkout against the
//! commerce API.
//!
//! ## Structure
//!
//! - `use_cases/` - Checkout preparation, the chain resolver, and submission
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by the unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
