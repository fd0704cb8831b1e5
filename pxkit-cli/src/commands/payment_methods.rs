use crate::commands::{load_preference, print_json, total_amount};
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, preference_id: &str) -> anyhow::Result<()> {
    let (preference, site) = load_preference(ctx, preference_id).await?;
    let amount = total_amount(&preference)?;
    let result = ctx
        .provider
        .get_payment_method_search(
            amount,
            &preference.payment_methods,
            &preference.payer,
            site,
        )
        .await?;

    match &result.customer {
        Some(Ok(customer)) => tracing::info!(
            customer_id = %customer.id,
            cards = result.search.cards.len(),
            "Customer cards attached"
        ),
        Some(Err(e)) => tracing::warn!(error = %e, "Customer cards unavailable"),
        None => {}
    }
    print_json(&result.search)
}
