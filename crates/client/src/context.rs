//! The explicit authentication context threaded through the client.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use auth_service_lib::service::{AuthService, SignUp};
use common::AppResult;
use domain::AccountResponse;

use crate::error::{ClientError, ClientResult};
use crate::gate::{AuthGate, GateDecision, GateState, ViewRequest};
use crate::guard::SubmitGuard;
use crate::session::SessionHolder;
use crate::storage::SessionStorage;

/// Owns the session, the gate and the submit guard for one client process.
pub struct ClientContext<S> {
    auth: Arc<dyn AuthService>,
    session: SessionHolder<S>,
    gate: AuthGate,
    guard: SubmitGuard,
}

impl<S: SessionStorage> ClientContext<S> {
    /// Rehydrate the session and move the gate out of `Loading`.
    pub async fn start(auth: Arc<dyn AuthService>, storage: S) -> ClientResult<Self> {
        let mut context = Self {
            auth,
            session: SessionHolder::new(storage),
            gate: AuthGate::new(),
            guard: SubmitGuard::new(),
        };

        let account = context.session.rehydrate().await?;
        context.gate.session_changed(account.map(|a| a.role));

        Ok(context)
    }

    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> ClientResult<AccountResponse> {
        require_credentials(email, password)?;
        let _ticket = self.guard.try_begin().ok_or(ClientError::Busy)?;

        let account = self
            .auth
            .sign_up(SignUp {
                email: email.to_string(),
                password: password.to_string(),
                full_name: full_name.map(str::to_string),
            })
            .await?;

        self.establish(account).await
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> ClientResult<AccountResponse> {
        require_credentials(email, password)?;
        let _ticket = self.guard.try_begin().ok_or(ClientError::Busy)?;

        let account = self.auth.sign_in(email, password).await?;

        self.establish(account).await
    }

    /// Forget the session. Nothing on the server needs invalidating.
    pub async fn sign_out(&mut self) -> ClientResult<()> {
        if let Some(account) = self.session.current() {
            if let Err(e) = self.auth.sign_out(account.id).await {
                warn!("Sign-out notification failed: {}", e);
            }
        }

        self.session.clear().await?;
        self.gate.session_changed(None);
        info!("Signed out");
        Ok(())
    }

    pub fn decide(&self, request: &ViewRequest) -> GateDecision {
        self.gate.decide(request)
    }

    /// Run a user action unless another one is still in flight.
    pub async fn submit<F, T>(&self, action: F) -> ClientResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let _ticket = self.guard.try_begin().ok_or(ClientError::Busy)?;
        Ok(action.await?)
    }

    pub fn current(&self) -> Option<&AccountResponse> {
        self.session.current()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Shared handle for UIs that disable controls while busy
    pub fn guard(&self) -> &SubmitGuard {
        &self.guard
    }

    async fn establish(&mut self, account: AccountResponse) -> ClientResult<AccountResponse> {
        self.session.set(account.clone()).await?;
        self.gate.session_changed(Some(account.role));
        info!(user_id = %account.id, role = %account.role, "Session established");
        Ok(account)
    }
}

fn require_credentials(email: &str, password: &str) -> ClientResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ClientError::validation("Email and password are required"));
    }
    Ok(())
}
