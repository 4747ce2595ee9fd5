//! Business services layered over the store.

mod auth_service;
mod delegation;
mod ledger_service;
mod owner_index;
mod staff_service;
mod subscription_service;

pub use auth_service::{AuthService, Authenticator, SignUp};
pub use delegation::{DelegationResolver, OwnerResolver};
pub use ledger_service::{Ledger, LedgerService};
#[cfg(test)]
pub use owner_index::MockOwnerIndex;
pub use owner_index::{LocalOwnerIndex, OwnerIndex, RedisOwnerIndex};
pub use staff_service::{NewStaff, StaffDirectory, StaffManager, StaffStep};
pub use subscription_service::{
    payment_signature, signature_matches, PaymentConfirmation, SubscriptionService, Subscriptions,
};
