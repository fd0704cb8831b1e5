//! Full checkout: discount, additional steps and payment creation.

use anyhow::{Context as _, anyhow, bail};
use clap::Args;
use pxkit_core::flow::{
    CheckoutAccumulator, FinishReason, FlowConfig, NO_ADDITIONAL_STEP, StepFlowController,
    merchant_payment,
};
use pxkit_core::presenters::{
    AdditionalStepPresenter, DiscountsPresenter, EntityTypesPresenter,
    FinancialInstitutionsPresenter, ViewHandle,
};
use pxkit_core::providers::SiteEntityTypes;
use pxkit_sdk::objects::{
    Discount, EntityType, FinancialInstitution, Issuer, PayerCost, PaymentMethod, Site, Token,
};
use rust_decimal::Decimal;

use crate::commands::{load_preference, print_json, total_amount};
use crate::context::AppContext;
use crate::views::{DiscountView, SelectionView, StepPrompt, StepView};

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Preference id
    pub preference_id: String,

    /// Payment method id, e.g. `pse` or `visa`
    #[arg(long)]
    pub payment_method: String,

    /// Entity type id, when the method asks for one
    #[arg(long)]
    pub entity_type: Option<String>,

    /// Financial institution id, when the method asks for one
    #[arg(long)]
    pub financial_institution: Option<String>,

    /// Card token id
    #[arg(long)]
    pub token: Option<String>,

    #[arg(long)]
    pub installments: Option<u32>,

    /// Card issuer id
    #[arg(long)]
    pub issuer: Option<i64>,

    /// Coupon code, tried when no direct discount applies
    #[arg(long)]
    pub code: Option<String>,

    /// Print the payment body instead of creating the payment
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(ctx: &AppContext, args: CheckoutArgs) -> anyhow::Result<()> {
    let (preference, site) = load_preference(ctx, &args.preference_id).await?;
    let amount = total_amount(&preference)?;
    let prefetch = ctx
        .provider
        .prefetch(&preference, ctx.checkout.direct_discount)
        .await;
    let search = prefetch
        .search
        .context("failed to search payment methods")?;

    let payment_method = search
        .search
        .payment_method_by_id(&args.payment_method)
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "payment method {} is not available for this preference",
                args.payment_method
            )
        })?;
    if !payment_method.is_amount_allowed(amount) {
        bail!("payment method {} does not accept {amount}", payment_method.id);
    }

    let discount = resolve_discount(
        ctx,
        &preference.payer.email.clone().unwrap_or_default(),
        amount,
        prefetch.discount.and_then(Result::ok),
        args.code.as_deref(),
    )
    .await;

    let mut accumulator = CheckoutAccumulator::new(Some(payment_method.clone()))
        .with_binary_mode(ctx.checkout.binary_mode);
    if let Some(Ok(customer)) = &search.customer {
        accumulator = accumulator.with_customer_id(customer.id.clone());
    }
    if let Some(token) = &args.token {
        accumulator = accumulator.with_token(Token {
            id: token.clone(),
            last_four_digits: None,
        });
    }
    if let Some(installments) = args.installments {
        accumulator = accumulator.with_payer_cost(PayerCost {
            installments,
            installment_amount: None,
            total_amount: None,
            recommended_message: None,
        });
    }
    if let Some(issuer) = args.issuer {
        accumulator = accumulator.with_issuer(Issuer {
            id: issuer,
            name: String::new(),
        });
    }

    let config = FlowConfig::new(ctx.provider.public_key(), site);
    let step_view = ViewHandle::new(StepView::default());
    let controller = StepFlowController::new(config, accumulator);
    let mut steps = AdditionalStepPresenter::new(controller, step_view.clone());
    if let Some(tracker) = &ctx.tracker {
        steps = steps.with_tracker(tracker.clone());
    }
    steps.apply_discount(discount);

    steps.start();
    loop {
        let prompt = step_view.with(|v| v.prompt.take()).flatten();
        match prompt {
            Some(StepPrompt::EntityType) => {
                match select_entity_type(ctx, site, &payment_method, &args).await? {
                    Some(entity_type) => steps.on_entity_type_selected(entity_type),
                    None => {
                        steps.cancel();
                        bail!("checkout cancelled at the entity type step");
                    }
                }
            }
            Some(StepPrompt::FinancialInstitution) => {
                match select_financial_institution(ctx, &payment_method, &args).await? {
                    Some(institution) => steps.on_financial_institution_selected(institution),
                    None => {
                        steps.cancel();
                        bail!("checkout cancelled at the financial institution step");
                    }
                }
            }
            Some(StepPrompt::Finished(FinishReason::Success)) => break,
            Some(StepPrompt::Finished(FinishReason::Cancelled)) => bail!("checkout cancelled"),
            // Methods without additional steps go straight to payment.
            Some(StepPrompt::Invalid(message)) if message == NO_ADDITIONAL_STEP => break,
            Some(StepPrompt::Invalid(message)) => bail!("checkout cannot start: {message}"),
            None => bail!("checkout stopped without a result"),
        }
    }

    if args.dry_run {
        if ctx.provider.service_preference().has_create_payment_url() {
            return print_json(&merchant_payment(&steps.into_accumulator())?);
        }
        return print_json(&steps.into_payment_body(&preference)?);
    }

    let accumulator = steps.into_accumulator();
    let payment = ctx.provider.create_payment(&preference, &accumulator).await?;

    if let Some(tracker) = &ctx.tracker {
        if let Some(token) = &accumulator.token {
            tracker.track_token(&token.id);
        }
        let payment_type_id = payment
            .payment_type_id
            .as_deref()
            .unwrap_or(&payment_method.payment_type_id);
        tracker.track_payment(payment.id, payment_type_id);
    }
    print_json(&payment)
}

/// Run the discount screen and return the discount it settled on.
async fn resolve_discount(
    ctx: &AppContext,
    payer_email: &str,
    amount: Decimal,
    prefetched: Option<Discount>,
    code: Option<&str>,
) -> Option<Discount> {
    let view = ViewHandle::new(DiscountView::default());
    let mut presenter =
        DiscountsPresenter::new(ctx.provider.clone(), amount, payer_email, view.clone())
            .with_discount(prefetched)
            // The prefetch already made the direct lookup when it is enabled.
            .with_direct_discount_enabled(false);
    if let Some(tracker) = &ctx.tracker {
        presenter = presenter.with_tracker(tracker.clone());
    }

    presenter.initialize().await;
    let code_requested = view.with(|v| v.code_requested).unwrap_or(false);
    if let (true, Some(code)) = (code_requested, code) {
        presenter.validate_discount_code_input(code).await;
        if let Some(Some(error)) = view.with(|v| v.code_error.clone()) {
            tracing::warn!(code, "Coupon code not applied: {error}");
        }
    }
    presenter.finish();

    let view = view.detach()?;
    if let Some(total) = view.summary {
        tracing::info!(%total, "Total with discount");
    }
    view.result
}

async fn select_entity_type(
    ctx: &AppContext,
    site: Site,
    payment_method: &PaymentMethod,
    args: &CheckoutArgs,
) -> anyhow::Result<Option<EntityType>> {
    let view = ViewHandle::new(SelectionView::<EntityType>::default());
    let mut presenter = EntityTypesPresenter::new(
        SiteEntityTypes,
        Some(site),
        Some(payment_method.clone()),
        view.clone(),
    );
    if let Some(tracker) = &ctx.tracker {
        presenter = presenter.with_tracker(tracker.clone());
    }
    presenter.start().await;

    let options = view.with(|v| v.options.clone()).unwrap_or_default();
    let wanted = args.entity_type.as_deref();
    match options.iter().find(|option| Some(option.id.as_str()) == wanted) {
        Some(option) => presenter.on_item_selected(option),
        None if !options.is_empty() => {
            let ids: Vec<&str> = options.iter().map(|option| option.id.as_str()).collect();
            tracing::warn!("Pick an entity type with --entity-type: {}", ids.join(", "));
            presenter.on_back_pressed();
        }
        None => {}
    }

    let view = view.detach().ok_or_else(|| anyhow!("entity type screen closed"))?;
    if let Some(error) = view.error {
        bail!("entity types unavailable: {error}");
    }
    Ok(view.chosen)
}

async fn select_financial_institution(
    ctx: &AppContext,
    payment_method: &PaymentMethod,
    args: &CheckoutArgs,
) -> anyhow::Result<Option<FinancialInstitution>> {
    let view = ViewHandle::new(SelectionView::<FinancialInstitution>::default());
    let mut presenter = FinancialInstitutionsPresenter::new(
        ctx.provider.clone(),
        Some(payment_method.clone()),
        view.clone(),
    );
    if let Some(tracker) = &ctx.tracker {
        presenter = presenter.with_tracker(tracker.clone());
    }
    presenter.start().await;

    let options = view.with(|v| v.options.clone()).unwrap_or_default();
    let wanted = args.financial_institution.as_deref();
    match options.iter().find(|option| Some(option.id.as_str()) == wanted) {
        Some(option) => presenter.on_item_selected(option),
        None if !options.is_empty() => {
            let listed: Vec<String> = options
                .iter()
                .map(|option| format!("{} ({})", option.id, option.description))
                .collect();
            tracing::warn!(
                "Pick a financial institution with --financial-institution: {}",
                listed.join(", ")
            );
            presenter.on_back_pressed();
        }
        None => {}
    }

    let view = view
        .detach()
        .ok_or_else(|| anyhow!("financial institution screen closed"))?;
    if let Some(error) = view.error {
        bail!("financial institutions unavailable: {error}");
    }
    Ok(view.chosen)
}
