//! Test fixtures for the shipping chain.
//!
//! - [`StageFixtures`]: option lists for the country, subdivision and
//!   shipping stages
//! - [`us_ca_scenario_provider`]: a mock provider answering instantly
//! - [`GatedProvider`]: a provider whose answers the test releases by hand,
//!   for ordering and race tests
//! - [`CartFixtures`]: carts and a submission ready for capture

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use storefront_domain::{
    ResolutionContext, SelectionChain, SelectionOption, ShippingStage, StageId,
};
use storefront_shared::{CartData, LineItemData, PriceData, ShippingSubmission};
use tokio::sync::{mpsc, oneshot};

use crate::infrastructure::ports::{MockOptionProviderPort, OptionProviderPort, ProviderError};

/// How long a test waits for the resolver to issue a request.
const CALL_TIMEOUT: Duration = Duration::from_secs(2);

/// A fresh `[country, subdivision, shipping]` chain.
pub fn shipping_chain() -> SelectionChain {
    SelectionChain::new(ShippingStage::chain_ids()).unwrap()
}

// =============================================================================
// Option lists
// =============================================================================

pub struct StageFixtures;

impl StageFixtures {
    pub fn countries() -> Vec<SelectionOption> {
        vec![
            SelectionOption::new("US", "United States"),
            SelectionOption::new("CA", "Canada"),
        ]
    }

    pub fn us_subdivisions() -> Vec<SelectionOption> {
        vec![
            SelectionOption::new("CA", "California"),
            SelectionOption::new("NY", "New York"),
        ]
    }

    pub fn ca_subdivisions() -> Vec<SelectionOption> {
        vec![
            SelectionOption::new("ON", "Ontario"),
            SelectionOption::new("QC", "Quebec"),
        ]
    }

    pub fn shipping() -> Vec<SelectionOption> {
        vec![
            SelectionOption::new("std", "Standard - ($5.00)"),
            SelectionOption::new("exp", "Express - ($15.00)"),
        ]
    }
}

/// Mock provider for the US/Canada storefront, answering immediately.
pub fn us_ca_scenario_provider() -> MockOptionProviderPort {
    let mut provider = MockOptionProviderPort::new();
    provider
        .expect_fetch_options()
        .returning(|stage, context| match stage.as_str() {
            "country" => Ok(StageFixtures::countries()),
            "subdivision" => match context.get_str("country").map(|k| k.as_str()) {
                Some("US") => Ok(StageFixtures::us_subdivisions()),
                Some("CA") => Ok(StageFixtures::ca_subdivisions()),
                other => Err(ProviderError::rejected(format!("no subdivisions for {other:?}"))),
            },
            "shipping" => Ok(StageFixtures::shipping()),
            other => Err(ProviderError::rejected(format!("unknown stage {other}"))),
        });
    provider
}

// =============================================================================
// Gated provider
// =============================================================================

/// A request the resolver made, waiting for the test to answer it.
pub struct PendingFetch {
    pub stage: StageId,
    pub context: ResolutionContext,
    reply: oneshot::Sender<Result<Vec<SelectionOption>, ProviderError>>,
}

impl PendingFetch {
    pub fn respond(self, options: Vec<SelectionOption>) {
        let _ = self.reply.send(Ok(options));
    }

    pub fn fail(self, error: ProviderError) {
        let _ = self.reply.send(Err(error));
    }
}

/// Provider that parks every request until the test answers it.
pub struct GatedProvider {
    calls: mpsc::UnboundedSender<PendingFetch>,
}

impl GatedProvider {
    pub fn new() -> (Arc<Self>, GatedCalls) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { calls }), GatedCalls { rx })
    }
}

#[async_trait]
impl OptionProviderPort for GatedProvider {
    async fn fetch_options(
        &self,
        stage: &StageId,
        context: &ResolutionContext,
    ) -> Result<Vec<SelectionOption>, ProviderError> {
        let (reply, answer) = oneshot::channel();
        self.calls
            .send(PendingFetch {
                stage: stage.clone(),
                context: context.clone(),
                reply,
            })
            .map_err(|_| ProviderError::unavailable("test harness gone"))?;
        answer
            .await
            .map_err(|_| ProviderError::unavailable("request dropped by test"))?
    }
}

/// Test side of a [`GatedProvider`].
pub struct GatedCalls {
    rx: mpsc::UnboundedReceiver<PendingFetch>,
}

impl GatedCalls {
    /// The next request the resolver made, in issue order.
    ///
    /// # Panics
    ///
    /// Panics if no request arrives within a couple of seconds.
    pub async fn next(&mut self) -> PendingFetch {
        tokio::time::timeout(CALL_TIMEOUT, self.rx.recv())
            .await
            .expect("resolver issued no request")
            .expect("gated provider dropped")
    }

    /// No request is waiting to be answered.
    pub fn is_idle(&mut self) -> bool {
        self.rx.try_recv().is_err()
    }
}

// =============================================================================
// Carts
// =============================================================================

pub struct CartFixtures;

impl CartFixtures {
    pub fn price(raw: f64) -> PriceData {
        PriceData {
            raw,
            formatted: format!("{raw:.2}"),
            formatted_with_symbol: format!("${raw:.2}"),
        }
    }

    /// Cart `id` holding `quantity` mugs at $10.00.
    pub fn mugs(id: &str, quantity: u32) -> CartData {
        CartData {
            id: id.to_string(),
            total_items: quantity,
            total_unique_items: 1,
            subtotal: Self::price(10.0 * f64::from(quantity)),
            line_items: vec![LineItemData {
                id: "item_mug".into(),
                product_id: "prod_mug".into(),
                name: "Mug".into(),
                quantity,
                price: Self::price(10.0),
                line_total: Self::price(10.0 * f64::from(quantity)),
            }],
        }
    }

    pub fn empty(id: &str) -> CartData {
        CartData {
            id: id.to_string(),
            total_items: 0,
            total_unique_items: 0,
            subtotal: Self::price(0.0),
            line_items: Vec::new(),
        }
    }

    /// Submission for a US/California standard shipment.
    pub fn submission() -> ShippingSubmission {
        ShippingSubmission {
            checkout_token_id: "chkt_1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            address1: "12 Analytical Row".into(),
            email: "ada@example.com".into(),
            city: "San Francisco".into(),
            zip_code: "94107".into(),
            shipping_country: "US".into(),
            shipping_subdivision: "CA".into(),
            shipping_option: "ship_std".into(),
        }
    }
}
