//! Option provider for the shipping chain, backed by the commerce API

use async_trait::async_trait;
use std::sync::Arc;
use storefront_domain::{
    CheckoutTokenId, OptionKey, ResolutionContext, SelectionOption, ShippingStage, StageId,
};
use storefront_shared::ShippingOptionsQuery;

use crate::infrastructure::ports::{CommercePort, OptionProviderPort, ProviderError};

/// Serves the country, subdivision and shipping method stages of one checkout.
pub struct ShippingOptionProvider {
    commerce: Arc<dyn CommercePort>,
    checkout_token: CheckoutTokenId,
}

impl ShippingOptionProvider {
    pub fn new(commerce: Arc<dyn CommercePort>, checkout_token: CheckoutTokenId) -> Self {
        Self {
            commerce,
            checkout_token,
        }
    }

    async fn countries(&self) -> Result<Vec<SelectionOption>, ProviderError> {
        let response = self
            .commerce
            .list_shipping_countries(&self.checkout_token)
            .await?;
        Ok(pairs_to_options(response.countries))
    }

    async fn subdivisions(
        &self,
        context: &ResolutionContext,
    ) -> Result<Vec<SelectionOption>, ProviderError> {
        let country = required(context, ShippingStage::Country)?;
        let response = self.commerce.list_subdivisions(country.as_str()).await?;
        Ok(pairs_to_options(response.subdivisions))
    }

    async fn shipping_methods(
        &self,
        context: &ResolutionContext,
    ) -> Result<Vec<SelectionOption>, ProviderError> {
        let query = ShippingOptionsQuery {
            country: required(context, ShippingStage::Country)?.to_string(),
            region: context
                .get_str(ShippingStage::Subdivision.as_str())
                .map(OptionKey::to_string),
        };
        let options = self
            .commerce
            .get_shipping_options(&self.checkout_token, &query)
            .await?;
        Ok(options
            .iter()
            .map(|option| SelectionOption::new(option.id.as_str(), option.label()))
            .collect())
    }
}

#[async_trait]
impl OptionProviderPort for ShippingOptionProvider {
    async fn fetch_options(
        &self,
        stage: &StageId,
        context: &ResolutionContext,
    ) -> Result<Vec<SelectionOption>, ProviderError> {
        let shipping_stage =
            ShippingStage::try_from(stage).map_err(|e| ProviderError::rejected(e.to_string()))?;

        match shipping_stage {
            ShippingStage::Country => self.countries().await,
            ShippingStage::Subdivision => self.subdivisions(context).await,
            ShippingStage::ShippingMethod => self.shipping_methods(context).await,
        }
    }
}

fn required(context: &ResolutionContext, stage: ShippingStage) -> Result<&OptionKey, ProviderError> {
    context
        .get_str(stage.as_str())
        .ok_or_else(|| ProviderError::rejected(format!("missing {} selection", stage)))
}

fn pairs_to_options(pairs: Vec<(String, String)>) -> Vec<SelectionOption> {
    pairs
        .into_iter()
        .map(|(code, name)| SelectionOption::new(code, name))
        .collect()
}
