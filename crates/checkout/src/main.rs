//! Storefront checkout - prepares a checkout for a cart and resolves its
//! default shipping selection.

use std::sync::Arc;

use anyhow::Context;
use storefront_checkout::infrastructure::commerce::CommerceClient;
use storefront_checkout::infrastructure::settings::{
    CheckoutSettings, ENV_CART_ID, ENV_PUBLIC_KEY,
};
use storefront_checkout::App;
use storefront_domain::{CartId, StageStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/checkout`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_checkout=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting storefront checkout");

    // Load configuration
    let settings = CheckoutSettings::from_env();
    let public_key = settings
        .public_key
        .clone()
        .with_context(|| format!("{ENV_PUBLIC_KEY} must be set"))?;
    let cart_id = settings
        .cart_id
        .clone()
        .with_context(|| format!("{ENV_CART_ID} must be set"))?;

    tracing::info!(api_url = %settings.api_url, "Using commerce API");
    let commerce = CommerceClient::new(&settings.api_url, &public_key, settings.request_timeout)?;
    let app = App::new(Arc::new(commerce), settings.retry.clone());

    let cart_id = CartId::from(cart_id);
    let cart = app.use_cases.cart.manage.retrieve(&cart_id).await?;
    tracing::info!(
        cart_id = %cart.id,
        total_items = cart.total_items,
        subtotal = %cart.subtotal.formatted_with_symbol,
        "Cart loaded"
    );

    let checkout = app.use_cases.shipping.prepare.execute(&cart_id).await?;
    let view = checkout.shipping.wait_until_settled().await?;

    for stage in &view.stages {
        tracing::info!(
            stage = %stage.id,
            status = %stage.status,
            options = stage.options.len(),
            selected = stage.selected.as_ref().map(|k| k.as_str()).unwrap_or("-"),
            "Stage settled"
        );
    }

    if let Some(failed) = view
        .stages
        .iter()
        .find(|stage| stage.status == StageStatus::Failed)
    {
        anyhow::bail!(
            "stage '{}' failed: {}",
            failed.id,
            failed.error.as_deref().unwrap_or("unknown error")
        );
    }

    let snapshot = checkout.shipping.snapshot().await?;
    let output = serde_json::json!({
        "checkoutTokenId": checkout.checkout_token,
        "totalItems": cart.total_items,
        "chainId": view.chain_id,
        "shipping": snapshot,
        "stages": view.stages,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
