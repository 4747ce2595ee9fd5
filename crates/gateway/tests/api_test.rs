//! Integration tests for the function endpoints.
//!
//! The router runs over the in-memory store and a process-local owner index,
//! so no database or Redis connection is needed.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use auth_service_lib::config::{AuthServiceConfig, OwnerIndexBackend};
use auth_service_lib::service::{payment_signature, LocalOwnerIndex};
use auth_service_lib::Services;
use domain::{NewAccount, Password, SubscriptionPlan, UserRole};
use gateway_lib::state::AppState;
use user_service_lib::repository::memory::InMemoryStore;
use user_service_lib::repository::{AccountRepository, Repositories};

// =============================================================================
// Harness
// =============================================================================

struct TestServer {
    router: Router,
    repos: Repositories,
    store: Arc<InMemoryStore>,
}

const PAYMENT_SECRET: &str = "test-payment-secret";

fn sign_payment(order_id: &str, payment_id: &str) -> String {
    payment_signature(PAYMENT_SECRET, order_id, payment_id)
}

fn server() -> TestServer {
    let (repos, store) = Repositories::in_memory();
    let config = AuthServiceConfig {
        owner_index: OwnerIndexBackend::Memory,
        payment_secret: Some(PAYMENT_SECRET.to_string()),
        ..AuthServiceConfig::default()
    };
    let services = Services::new(repos.clone(), Arc::new(LocalOwnerIndex::new(300)), &config);
    TestServer {
        router: gateway_lib::app(AppState::new(services, None)),
        repos,
        store,
    }
}

impl TestServer {
    async fn call(
        &self,
        method: Method,
        path: &str,
        user: Option<Uuid>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(id) = user {
            request = request.header("x-user-id", id.to_string());
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn post(&self, path: &str, user: Option<Uuid>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, path, user, body).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/functions/auth",
                None,
                json!({ "action": "signup", "email": email, "password": password, "full_name": "Alice" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["user"]["id"].as_str().unwrap().parse().unwrap()
    }

    async fn admin(&self) -> Uuid {
        self.repos
            .accounts
            .create(NewAccount {
                email: "root@x.com".to_string(),
                password_hash: Password::new("rootpass").unwrap().into_string(),
                full_name: None,
                role: UserRole::Admin,
            })
            .await
            .unwrap()
            .id
    }

    async fn add_staff(&self, owner: Uuid, email: &str) -> (Uuid, Uuid) {
        let (status, body) = self
            .post(
                "/functions/staff_management",
                Some(owner),
                json!({
                    "action": "create_staff",
                    "owner_id": owner,
                    "email": email,
                    "password": "staffpass",
                    "staff_name": "Bob"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let link = body["staff"]["id"].as_str().unwrap().parse().unwrap();
        let user = body["staff"]["user_id"].as_str().unwrap().parse().unwrap();
        (link, user)
    }
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_signup_then_signin_returns_owner_without_hash() {
    let app = server();
    app.sign_up("alice@x.com", "secret1").await;

    let (status, body) = app
        .post(
            "/functions/auth",
            None,
            json!({ "action": "signin", "email": "alice@x.com", "password": "secret1" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "owner");
    assert_eq!(body["message"], "Signed in successfully");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let app = server();
    app.sign_up("alice@x.com", "secret1").await;

    let (status, body) = app
        .post(
            "/functions/auth",
            None,
            json!({ "action": "signup", "email": "alice@x.com", "password": "other12" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = server();
    app.sign_up("alice@x.com", "secret1").await;

    let (s1, b1) = app
        .post(
            "/functions/auth",
            None,
            json!({ "action": "signin", "email": "alice@x.com", "password": "wrong" }),
        )
        .await;
    let (s2, b2) = app
        .post(
            "/functions/auth",
            None,
            json!({ "action": "signin", "email": "nobody@x.com", "password": "wrong" }),
        )
        .await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!((s1, b1), (s2, b2));
}

#[tokio::test]
async fn test_unknown_action_is_rejected() {
    let app = server();

    let (status, body) = app
        .post("/functions/auth", None, json!({ "action": "reset_password" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid action");

    let (status, body) = app.post("/functions/auth", None, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid action");
}

#[tokio::test]
async fn test_signout_succeeds() {
    let app = server();
    let id = app.sign_up("alice@x.com", "secret1").await;

    let (status, body) = app
        .post("/functions/auth", None, json!({ "action": "signout", "user_id": id }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn test_identified_routes_require_known_user() {
    let app = server();

    let (status, _) = app
        .post("/functions/ledger", None, json!({ "action": "list_fixed_expenses" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/functions/ledger",
            Some(Uuid::new_v4()),
            json!({ "action": "list_fixed_expenses" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn test_owner_cannot_use_admin_function() {
    let app = server();
    let owner = app.sign_up("alice@x.com", "secret1").await;

    let (status, body) = app
        .post("/functions/admin", Some(owner), json!({ "action": "get_users" }))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_admin_lists_and_promotes_users() {
    let app = server();
    let admin = app.admin().await;
    let owner = app.sign_up("alice@x.com", "secret1").await;

    let (status, body) = app
        .post("/functions/admin", Some(admin), json!({ "action": "get_users" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .post(
            "/functions/admin",
            Some(admin),
            json!({ "action": "update_user_role", "userId": owner, "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = server();
    let admin = app.admin().await;

    let (status, body) = app
        .post(
            "/functions/admin",
            Some(admin),
            json!({ "action": "delete_user", "user_id": admin }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You cannot delete your own account");
}

// =============================================================================
// Staff
// =============================================================================

#[tokio::test]
async fn test_staff_lifecycle() {
    let app = server();
    let owner = app.sign_up("alice@x.com", "secret1").await;
    let (link, staff) = app.add_staff(owner, "bob@x.com").await;

    let (status, body) = app
        .post(
            "/functions/staff_management",
            Some(owner),
            json!({ "action": "get_staff", "owner_id": owner }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["staff"][0]["email"], "bob@x.com");

    // Staff signs in with its own credentials
    let (status, body) = app
        .post(
            "/functions/auth",
            None,
            json!({ "action": "signin", "email": "bob@x.com", "password": "staffpass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "staff");

    let (status, _) = app
        .post(
            "/functions/staff_management",
            Some(owner),
            json!({ "action": "delete_staff", "staff_id": link }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.store.links().is_empty());

    let (status, _) = app
        .post(
            "/functions/ledger",
            Some(staff),
            json!({ "action": "list_fixed_expenses" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_owner_cannot_manage_staff() {
    let app = server();
    let alice = app.sign_up("alice@x.com", "secret1").await;
    let mallory = app.sign_up("mallory@x.com", "secret2").await;
    let (link, _) = app.add_staff(alice, "bob@x.com").await;

    let (status, _) = app
        .post(
            "/functions/staff_management",
            Some(mallory),
            json!({ "action": "get_staff", "owner_id": alice }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/functions/staff_management",
            Some(mallory),
            json!({ "action": "delete_staff", "staff_id": link }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.links().len(), 1);
}

#[tokio::test]
async fn test_get_staff_owner_access() {
    let app = server();
    let alice = app.sign_up("alice@x.com", "secret1").await;
    let mallory = app.sign_up("mallory@x.com", "secret2").await;
    let (_, staff) = app.add_staff(alice, "bob@x.com").await;

    let (status, body) = app
        .post(
            "/functions/get_staff_owner",
            Some(staff),
            json!({ "staff_user_id": staff }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner_id"], alice.to_string());

    let (status, _) = app
        .post(
            "/functions/get_staff_owner",
            Some(mallory),
            json!({ "staff_user_id": staff }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_staff_owner_hides_unlinked_ids_from_owners() {
    let app = server();
    let alice = app.sign_up("alice@x.com", "secret1").await;
    let mallory = app.sign_up("mallory@x.com", "secret2").await;
    let (_, staff) = app.add_staff(alice, "bob@x.com").await;

    let (linked_status, linked_body) = app
        .post(
            "/functions/get_staff_owner",
            Some(mallory),
            json!({ "staff_user_id": staff }),
        )
        .await;
    let (unlinked_status, unlinked_body) = app
        .post(
            "/functions/get_staff_owner",
            Some(mallory),
            json!({ "staff_user_id": Uuid::new_v4() }),
        )
        .await;

    assert_eq!(linked_status, StatusCode::FORBIDDEN);
    assert_eq!(unlinked_status, StatusCode::FORBIDDEN);
    assert_eq!(linked_body["code"], unlinked_body["code"]);
}

// =============================================================================
// Ledger
// =============================================================================

#[tokio::test]
async fn test_staff_sale_lands_in_owner_ledger() {
    let app = server();
    let owner = app.sign_up("alice@x.com", "secret1").await;
    let (_, staff) = app.add_staff(owner, "bob@x.com").await;

    let (status, body) = app
        .post(
            "/functions/ledger",
            Some(staff),
            json!({
                "action": "create_transaction",
                "name": "Phone case",
                "amount": "120",
                "cost_price": "70",
                "type": "sale"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["transaction"]["owner_user_id"], owner.to_string());

    let (status, body) = app
        .post(
            "/functions/ledger",
            Some(owner),
            json!({ "action": "list_transactions" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);

    let id = body["transactions"][0]["id"].clone();
    let (status, _) = app
        .post(
            "/functions/ledger",
            Some(staff),
            json!({ "action": "delete_transaction", "id": id }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_transaction_is_bad_request() {
    let app = server();
    let owner = app.sign_up("alice@x.com", "secret1").await;

    let (status, body) = app
        .post(
            "/functions/ledger",
            Some(owner),
            json!({ "action": "create_transaction", "name": "Refund", "amount": "0", "type": "sale" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_report_reflects_sales() {
    let app = server();
    let owner = app.sign_up("alice@x.com", "secret1").await;

    app.post(
        "/functions/ledger",
        Some(owner),
        json!({
            "action": "create_transaction",
            "name": "Charger",
            "amount": "100",
            "cost_price": "60",
            "type": "sale"
        }),
    )
    .await;

    let (status, body) = app
        .post("/functions/ledger", Some(owner), json!({ "action": "report" }))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["report"]["transaction_count"], 1);
    let gross: Decimal = body["report"]["gross_profit"].as_str().unwrap().parse().unwrap();
    assert_eq!(gross, Decimal::from(40));
}

// =============================================================================
// Subscriptions & profile
// =============================================================================

#[tokio::test]
async fn test_bad_payment_signature_is_logged_and_rejected() {
    let app = server();
    let owner = app.sign_up("alice@x.com", "secret1").await;
    let plan = SubscriptionPlan {
        id: Uuid::new_v4(),
        name: "Pro".to_string(),
        description: "Everything".to_string(),
        price: Decimal::from(499),
        features: vec!["reports".to_string()],
        duration_days: 30,
    };
    app.store.add_plan(plan.clone());

    let (status, body) = app
        .post("/functions/subscription", Some(owner), json!({ "action": "get_plans" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plans"][0]["name"], "Pro");

    let (status, body) = app
        .post(
            "/functions/subscription",
            Some(owner),
            json!({ "action": "create_order", "plan_id": plan.id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "created");
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/functions/subscription",
            Some(owner),
            json!({
                "action": "verify_payment",
                "razorpay_payment_id": "pay_1",
                "razorpay_order_id": order_id,
                "razorpay_signature": "00ff",
                "plan_id": plan.id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Payment verification failed");
    assert_eq!(app.store.payments().len(), 1);

    let (status, body) = app
        .post("/functions/subscription", Some(owner), json!({ "action": "current" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["subscription"].is_null());
}

#[tokio::test]
async fn test_signed_payment_settles_its_order_once() {
    let app = server();
    let owner = app.sign_up("alice@x.com", "secret1").await;
    let other = app.sign_up("mallory@x.com", "secret2").await;
    let basic = SubscriptionPlan {
        id: Uuid::new_v4(),
        name: "Basic".to_string(),
        description: String::new(),
        price: Decimal::from(199),
        features: vec![],
        duration_days: 30,
    };
    let premium = SubscriptionPlan {
        id: Uuid::new_v4(),
        name: "Premium".to_string(),
        description: String::new(),
        price: Decimal::from(99_999),
        features: vec![],
        duration_days: 365,
    };
    app.store.add_plan(basic.clone());
    app.store.add_plan(premium.clone());

    let (_, body) = app
        .post(
            "/functions/subscription",
            Some(owner),
            json!({ "action": "create_order", "plan_id": basic.id }),
        )
        .await;
    let order_id = body["order"]["id"].as_str().unwrap().to_string();
    let signature = sign_payment(&order_id, "pay_1");
    let verify = |plan_id: Uuid| {
        json!({
            "action": "verify_payment",
            "razorpay_payment_id": "pay_1",
            "razorpay_order_id": order_id,
            "razorpay_signature": signature,
            "plan_id": plan_id
        })
    };

    // The signed callback cannot pick a pricier plan
    let (status, _) = app
        .post("/functions/subscription", Some(owner), verify(premium.id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/functions/subscription", Some(owner), verify(basic.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscription"]["plan_id"], basic.id.to_string());

    let (status, body) = app
        .post("/functions/subscription", Some(owner), verify(basic.id))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .post("/functions/subscription", Some(other), verify(basic.id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/functions/subscription", Some(other), json!({ "action": "current" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["subscription"].is_null());
    assert_eq!(app.store.subscriptions().len(), 1);
}

#[tokio::test]
async fn test_profile_update_trims_name() {
    let app = server();
    let owner = app.sign_up("alice@x.com", "secret1").await;

    let (status, body) = app
        .call(
            Method::PUT,
            "/functions/profile",
            Some(owner),
            json!({ "full_name": "  Alice Smith  " }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["full_name"], "Alice Smith");
}

#[tokio::test]
async fn test_health_reports_owner_index() {
    let app = server();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["owner_index"]["status"], "healthy");
}
