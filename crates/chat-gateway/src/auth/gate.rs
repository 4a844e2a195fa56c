//! Shared gate routine

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::headers::{Cookie, HeaderMapExt};
use chat_core::{DomainError, SessionValidator, UserId};

/// Cookie attribute carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Identity resolved for an admitted call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    user_id: UserId,
    method: String,
}

impl CallContext {
    pub fn new(user_id: UserId, method: impl Into<String>) -> Self {
        Self {
            user_id,
            method: method.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Name of the call this context was created for
    pub fn method(&self) -> &str {
        &self.method
    }
}

/// A call shape the gate knows how to authenticate
pub trait GatedCall: Send {
    /// What the call becomes once an identity is attached
    type Authenticated;

    /// Name used in logs
    fn method_name(&self) -> Cow<'_, str>;

    /// Metadata carrying the cookie headers, if the call has any
    fn metadata(&self) -> Option<&HeaderMap>;

    /// Attach the resolved identity
    fn attach(self, context: CallContext) -> Self::Authenticated;
}

/// Gate rejections
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Call carries no metadata")]
    MissingMetadata,

    #[error("No session cookie")]
    MissingToken,

    #[error("Invalid or expired session")]
    InvalidSession(#[source] DomainError),

    #[error("Session lookup failed")]
    Validator(#[source] DomainError),
}

impl GateError {
    /// Whether the caller failed to authenticate, as opposed to the lookup itself failing
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, Self::Validator(_))
    }
}

/// Authenticates calls against the session store
#[derive(Clone)]
pub struct SessionGate {
    validator: Arc<dyn SessionValidator>,
}

impl SessionGate {
    pub fn new(validator: Arc<dyn SessionValidator>) -> Self {
        Self { validator }
    }

    /// Resolve the caller's session and attach it to the call
    ///
    /// On failure the call is consumed and nothing downstream runs.
    pub async fn admit<C: GatedCall>(&self, call: C) -> Result<C::Authenticated, GateError> {
        let method = call.method_name().into_owned();
        tracing::info!(method = %method, "Gating call");

        match self.resolve(call.metadata()).await {
            Ok(user_id) => {
                tracing::debug!(method = %method, user = %user_id, "Call admitted");
                Ok(call.attach(CallContext::new(user_id, method)))
            }
            Err(e) if e.is_unauthenticated() => {
                tracing::warn!(method = %method, reason = %e, "Call rejected");
                Err(e)
            }
            Err(e) => {
                tracing::error!(method = %method, error = ?e, "Session validation failed");
                Err(e)
            }
        }
    }

    async fn resolve(&self, metadata: Option<&HeaderMap>) -> Result<UserId, GateError> {
        let headers = metadata.ok_or(GateError::MissingMetadata)?;
        let token = session_token(headers).ok_or(GateError::MissingToken)?;

        self.validator
            .validate_session(&token)
            .await
            .map_err(|e| {
                if e.is_authentication() {
                    GateError::InvalidSession(e)
                } else {
                    GateError::Validator(e)
                }
            })
    }
}

impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate").finish_non_exhaustive()
    }
}

/// Find the session token among the cookie headers
///
/// The first cookie entry named `session` wins. Empty values count as absent.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.typed_get::<Cookie>()?;
    cookies
        .get(SESSION_COOKIE)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}
