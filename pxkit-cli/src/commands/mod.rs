//! Subcommand handlers. Results go to stdout as JSON, logs to stderr.

pub mod checkout;
pub mod discount;
pub mod payment_methods;
pub mod preference;

use pxkit_sdk::objects::{CheckoutPreference, Site};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::context::AppContext;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Fetch a preference and settle the site it runs on.
async fn load_preference(
    ctx: &AppContext,
    preference_id: &str,
) -> anyhow::Result<(CheckoutPreference, Site)> {
    let mut preference = ctx.provider.get_checkout_preference(preference_id).await?;
    let site = ctx.site_for(preference.site_id).ok_or_else(|| {
        anyhow::anyhow!("preference {preference_id} has no site and none is configured")
    })?;
    preference.site_id = Some(site);
    ctx.start_tracking(site);
    Ok((preference, site))
}

fn total_amount(preference: &CheckoutPreference) -> anyhow::Result<Decimal> {
    preference
        .total_amount()
        .ok_or_else(|| anyhow::anyhow!("preference {} total amount overflows", preference.id))
}
