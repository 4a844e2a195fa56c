//! Gate for streaming calls

use std::borrow::Cow;

use axum::http::HeaderMap;

use super::gate::{CallContext, GatedCall};

/// A stream that has not been authenticated yet
#[derive(Debug)]
pub struct StreamHandshake<S> {
    method: String,
    metadata: Option<HeaderMap>,
    stream: S,
}

impl<S> StreamHandshake<S> {
    pub fn new(method: impl Into<String>, metadata: Option<HeaderMap>, stream: S) -> Self {
        Self {
            method: method.into(),
            metadata,
            stream,
        }
    }
}

impl<S: Send> GatedCall for StreamHandshake<S> {
    type Authenticated = AuthenticatedStream<S>;

    fn method_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.method)
    }

    fn metadata(&self) -> Option<&HeaderMap> {
        self.metadata.as_ref()
    }

    fn attach(self, context: CallContext) -> AuthenticatedStream<S> {
        AuthenticatedStream::new(self.stream, context)
    }
}

/// A stream carrying the identity it was admitted with
///
/// Wraps the underlying stream for its whole lifetime; every read or write
/// made through it sees the same [`CallContext`].
#[derive(Debug)]
pub struct AuthenticatedStream<S> {
    inner: S,
    context: CallContext,
}

impl<S> AuthenticatedStream<S> {
    pub fn new(inner: S, context: CallContext) -> Self {
        Self { inner, context }
    }

    pub fn context(&self) -> &CallContext {
        &self.context
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Swap the wrapped stream, keeping the context
    pub fn try_map<T, E>(
        self,
        f: impl FnOnce(S) -> Result<T, E>,
    ) -> Result<AuthenticatedStream<T>, E> {
        Ok(AuthenticatedStream {
            inner: f(self.inner)?,
            context: self.context,
        })
    }

    pub fn into_parts(self) -> (S, CallContext) {
        (self.inner, self.context)
    }
}
