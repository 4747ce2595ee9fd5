//! Subscription plans, checkout orders and payment confirmation.

use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use auth_service_lib::service::PaymentConfirmation;
use common::{ActionResponse, AppResult};
use domain::{PaymentOrder, Subscription, SubscriptionPlan};

use crate::extractors::{ActionJson, ActionRequest};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Subscription function request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SubscriptionAction {
    GetPlans,
    /// Open an order before checkout; the widget is given its id
    CreateOrder {
        #[serde(alias = "planId")]
        plan_id: Uuid,
    },
    VerifyPayment {
        #[serde(alias = "razorpay_payment_id")]
        payment_id: String,
        #[serde(alias = "razorpay_order_id")]
        order_id: String,
        #[serde(alias = "razorpay_signature")]
        signature: String,
        #[serde(alias = "planId")]
        plan_id: Uuid,
    },
    Current,
}

impl ActionRequest for SubscriptionAction {
    const ACTIONS: &'static [&'static str] = &["get_plans", "create_order", "verify_payment", "current"];
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlansPayload {
    pub plans: Vec<SubscriptionPlan>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderPayload {
    pub order: PaymentOrder,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionPayload {
    pub subscription: Option<Subscription>,
}

/// Subscription function: `get_plans`, `create_order`, `verify_payment`, `current`
#[utoipa::path(
    post,
    path = "/functions/subscription",
    tag = "Subscriptions",
    security(("user_id" = [])),
    request_body = SubscriptionAction,
    responses(
        (status = 200, description = "Action succeeded"),
        (status = 400, description = "Invalid action or failed verification"),
        (status = 404, description = "Unknown plan"),
        (status = 409, description = "Order already paid or payment already used"),
        (status = 500, description = "Payment secret not configured")
    )
)]
pub async fn subscription_function(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ActionJson(action): ActionJson<SubscriptionAction>,
) -> AppResult<Response> {
    let subscriptions = &state.services.subscriptions;

    let response = match action {
        SubscriptionAction::GetPlans => {
            let plans = subscriptions.plans().await?;
            ActionResponse::ok(PlansPayload { plans }).into_response()
        }
        SubscriptionAction::CreateOrder { plan_id } => {
            let order = subscriptions.create_order(&actor, plan_id).await?;
            ActionResponse::ok(OrderPayload { order }).into_response()
        }
        SubscriptionAction::VerifyPayment {
            payment_id,
            order_id,
            signature,
            plan_id,
        } => {
            let subscription = subscriptions
                .verify_payment(
                    &actor,
                    PaymentConfirmation {
                        payment_id,
                        order_id,
                        signature,
                        plan_id,
                    },
                )
                .await?;
            ActionResponse::ok(SubscriptionPayload {
                subscription: Some(subscription),
            })
            .into_response()
        }
        SubscriptionAction::Current => {
            let subscription = subscriptions.current_subscription(&actor).await?;
            ActionResponse::ok(SubscriptionPayload { subscription }).into_response()
        }
    };

    Ok(response)
}
