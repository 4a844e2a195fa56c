//! Gate for request/response calls

use std::borrow::Cow;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chat_common::AppError;
use chat_core::UserId;

use super::gate::{CallContext, GatedCall};
use crate::response::ApiError;
use crate::server::GatewayState;

impl GatedCall for Request {
    type Authenticated = Request;

    fn method_name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{} {}", self.method(), self.uri().path()))
    }

    fn metadata(&self) -> Option<&HeaderMap> {
        Some(self.headers())
    }

    fn attach(mut self, context: CallContext) -> Request {
        self.extensions_mut().insert(context);
        self
    }
}

/// Middleware admitting only requests with a valid session
pub async fn require_session(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let request = state.gate().admit(request).await?;
    Ok(next.run(request).await)
}

/// Authenticated caller of a request
///
/// Only available on routes behind [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallContext>()
            .map(|context| Self {
                user_id: context.user_id(),
            })
            .ok_or_else(|| {
                tracing::error!(path = %parts.uri.path(), "Route is missing the session gate");
                ApiError::App(AppError::internal(anyhow::anyhow!(
                    "no caller context on {}",
                    parts.uri.path()
                )))
            })
    }
}
