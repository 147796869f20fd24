//! Server-side session state.
//!
//! Each browser session is identified by an opaque token carried in an
//! `HttpOnly` cookie. The token keys an in-process map holding the
//! session's cart and authentication state. Handlers never touch the map
//! directly: the middleware installs a request-scoped [`Session`] handle
//! into request extensions, and the extractor hands it to handlers.
//!
//! Concurrent requests for one session (two browser tabs) race with
//! last-write-wins semantics on the whole session value. This is accepted,
//! not mitigated.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Session cart: product id (string form) → desired quantity.
///
/// A BTreeMap so the cart has a deterministic iteration order; checkout
/// processes entries in exactly this order.
pub type Cart = BTreeMap<String, u32>;

const SESSION_TOKEN_LEN: usize = 32;

/// Per-session state. The cart lives here and nowhere else: it is not
/// persisted and dies with the session.
#[derive(Clone, Debug, Default)]
pub struct SessionData {
    pub user_id: Option<Uuid>,
    pub cart: Cart,
}

/// In-process session store keyed by opaque token.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionData>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_token() -> String {
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect()
    }

    /// Number of live sessions (test and diagnostics helper).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Request-scoped handle to one session's state.
#[derive(Clone)]
pub struct Session {
    store: Arc<SessionStore>,
    token: String,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    fn read(&self) -> SessionData {
        self.store
            .sessions
            .get(&self.token)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn write(&self, data: SessionData) {
        self.store.sessions.insert(self.token.clone(), data);
    }

    pub fn cart(&self) -> Cart {
        self.read().cart
    }

    /// Replaces the whole cart mapping.
    pub fn set_cart(&self, cart: Cart) {
        let mut data = self.read();
        data.cart = cart;
        self.write(data);
    }

    pub fn clear_cart(&self) {
        self.set_cart(Cart::new());
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.read().user_id
    }

    pub fn log_in(&self, user_id: Uuid) {
        let mut data = self.read();
        data.user_id = Some(user_id);
        self.write(data);
    }

    /// Flushes the whole session: authentication state and cart both go.
    pub fn log_out(&self) {
        self.write(SessionData::default());
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            ServiceError::InternalError("session middleware not installed".to_string())
        })
    }
}

/// Shared state for the session middleware.
#[derive(Clone)]
pub struct SessionLayer {
    store: Arc<SessionStore>,
    cookie_name: String,
}

impl SessionLayer {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            store: Arc::new(SessionStore::new()),
            cookie_name: cookie_name.into(),
        }
    }

    pub fn store(&self) -> Arc<SessionStore> {
        self.store.clone()
    }

    /// Opens the session named by `token`, creating a fresh one when the
    /// token is absent or unknown (expired/restarted store).
    fn open(&self, token: Option<&str>) -> (Session, bool) {
        if let Some(token) = token {
            if self.store.sessions.contains_key(token) {
                return (
                    Session {
                        store: self.store.clone(),
                        token: token.to_string(),
                    },
                    false,
                );
            }
        }

        let token = SessionStore::new_token();
        self.store
            .sessions
            .insert(token.clone(), SessionData::default());
        (
            Session {
                store: self.store.clone(),
                token,
            },
            true,
        )
    }
}

fn cookie_token<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// Middleware installing the request-scoped [`Session`] handle and setting
/// the session cookie on first contact.
pub async fn session_middleware(
    State(layer): State<SessionLayer>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = cookie_token(request.headers(), &layer.cookie_name).map(str::to_owned);
    let (session, is_new) = layer.open(token.as_deref());
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if is_new {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            layer.cookie_name,
            session.token()
        );
        // Session tokens are alphanumeric, so this cannot fail.
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
