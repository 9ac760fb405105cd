//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the checkout crate. Ports exist for:
//! - Option lists of a selection chain (could swap commerce API -> fixtures)
//! - The commerce API itself (tokens, locale data, shipping options, carts,
//!   order capture)

mod error;
mod external;

pub use error::{CommerceError, ProviderError};
pub use external::{CommercePort, OptionProviderPort};

#[cfg(test)]
pub use external::{MockCommercePort, MockOptionProviderPort};
