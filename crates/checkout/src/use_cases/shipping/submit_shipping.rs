//! Submit shipping use case.
//!
//! Combines the address form with the selections of a complete shipping
//! chain into the payload for the next checkout step.

use storefront_domain::{
    ChainSnapshot, CheckoutTokenId, DomainError, SelectionError, ShippingDetails, ShippingStage,
};
use storefront_shared::ShippingSubmission;

use super::prepare_checkout::PreparedCheckout;
use super::resolver::ResolverError;

#[derive(Debug, Default)]
pub struct SubmitShipping;

impl SubmitShipping {
    pub fn new() -> Self {
        Self
    }

    /// Build the shipping submission for `checkout`.
    ///
    /// The chain must be complete; the details are trimmed and validated.
    pub async fn execute(
        &self,
        checkout: &PreparedCheckout,
        details: ShippingDetails,
    ) -> Result<ShippingSubmission, SubmitShippingError> {
        let snapshot = checkout.shipping.snapshot().await?;
        let details = details.validated()?;
        let submission = build_submission(&checkout.checkout_token, details, &snapshot)?;

        tracing::info!(
            checkout_token = %checkout.checkout_token,
            country = %submission.shipping_country,
            subdivision = %submission.shipping_subdivision,
            shipping_option = %submission.shipping_option,
            "Shipping details submitted"
        );
        Ok(submission)
    }
}

fn build_submission(
    checkout_token: &CheckoutTokenId,
    details: ShippingDetails,
    snapshot: &ChainSnapshot,
) -> Result<ShippingSubmission, SelectionError> {
    let selected = |stage: ShippingStage| {
        snapshot
            .get(stage.as_str())
            .map(|key| key.to_string())
            .ok_or_else(|| SelectionError::incomplete(&stage.stage_id()))
    };

    Ok(ShippingSubmission {
        checkout_token_id: checkout_token.to_string(),
        first_name: details.first_name,
        last_name: details.last_name,
        address1: details.address1,
        email: details.email,
        city: details.city,
        zip_code: details.zip_code,
        shipping_country: selected(ShippingStage::Country)?,
        shipping_subdivision: selected(ShippingStage::Subdivision)?,
        shipping_option: selected(ShippingStage::ShippingMethod)?,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitShippingError {
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("Invalid shipping details: {0}")]
    Domain(#[from] DomainError),
}

impl SubmitShippingError {
    /// The chain has not resolved every stage yet.
    pub fn is_incomplete(&self) -> bool {
        match self {
            Self::Resolver(e) => e.is_incomplete(),
            Self::Selection(e) => e.is_incomplete(),
            Self::Domain(_) => false,
        }
    }
}
