use pxkit_core::presenters::discounts::discount_error_message;
use rust_decimal::Decimal;

use crate::commands::print_json;
use crate::context::AppContext;

pub async fn run(
    ctx: &AppContext,
    amount: Decimal,
    email: &str,
    code: Option<&str>,
) -> anyhow::Result<()> {
    let result = match code {
        Some(code) => ctx.provider.resolve_discount_by_code(amount, email, code).await,
        None => ctx.provider.resolve_discount(amount, email).await,
    };
    let discount = match result {
        Ok(discount) => discount,
        Err(e) if code.is_some() => anyhow::bail!("{}", discount_error_message(&e)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        discount_id = discount.id,
        amount_with_discount = %discount.amount_with_discount(amount),
        "Discount resolved"
    );
    print_json(&discount)
}
