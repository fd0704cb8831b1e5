use crate::commands::{print_json, total_amount};
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let preference = ctx.provider.get_checkout_preference(id).await?;
    let total_amount = total_amount(&preference)?;
    tracing::info!(
        preference_id = %preference.id,
        %total_amount,
        "Preference loaded"
    );
    print_json(&preference)
}
