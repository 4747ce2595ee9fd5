//! OpenAPI documentation.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::admin_handler::{AdminAction, UserPayload, UsersPayload};
use crate::handlers::auth_handler::{AuthAction, SessionPayload};
use crate::handlers::ledger_handler::{
    ExpensePayload, ExpensesPayload, LedgerAction, ReportPayload, TransactionPayload,
    TransactionsPayload,
};
use crate::handlers::profile_handler::{ProfilePayload, UpdateProfileRequest};
use crate::handlers::staff_handler::{
    StaffAction, StaffCreated, StaffList, StaffOwner, StaffOwnerRequest,
};
use crate::handlers::subscription_handler::{
    OrderPayload, PlansPayload, SubscriptionAction, SubscriptionPayload,
};
use crate::middleware::USER_ID_HEADER;
use domain::{
    AccountResponse, DateRange, ExpenseFrequency, FixedExpense, OrderStatus, PaymentOrder,
    ReportSummary, StaffMember, Subscription, SubscriptionPlan, SubscriptionStatus, Transaction,
    TransactionType, UserRole,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::auth_function,
        crate::handlers::admin_handler::admin_function,
        crate::handlers::staff_handler::staff_function,
        crate::handlers::staff_handler::get_staff_owner,
        crate::handlers::ledger_handler::ledger_function,
        crate::handlers::subscription_handler::subscription_function,
        crate::handlers::profile_handler::update_profile,
    ),
    components(
        schemas(
            AuthAction,
            SessionPayload,
            AdminAction,
            UsersPayload,
            UserPayload,
            StaffAction,
            StaffCreated,
            StaffList,
            StaffOwnerRequest,
            StaffOwner,
            LedgerAction,
            TransactionPayload,
            TransactionsPayload,
            ExpensePayload,
            ExpensesPayload,
            ReportPayload,
            SubscriptionAction,
            PlansPayload,
            OrderPayload,
            SubscriptionPayload,
            UpdateProfileRequest,
            ProfilePayload,
            AccountResponse,
            UserRole,
            StaffMember,
            Transaction,
            TransactionType,
            FixedExpense,
            ExpenseFrequency,
            DateRange,
            ReportSummary,
            SubscriptionPlan,
            Subscription,
            SubscriptionStatus,
            PaymentOrder,
            OrderStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign up, sign in and sign out"),
        (name = "Admin", description = "Account management for admins"),
        (name = "Staff", description = "Owner-managed staff logins"),
        (name = "Ledger", description = "Sales, expenses and profit reports"),
        (name = "Subscriptions", description = "Plans, checkout orders and payment confirmation"),
        (name = "Profile", description = "The caller's own account"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(USER_ID_HEADER))),
            );
        }
    }
}
