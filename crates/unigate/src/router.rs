//! Route table and dispatcher.
//!
//! Routing is a pure function of method and path ([`Route::resolve`]), so
//! an unmatched request is known before anything is read from it and can
//! be handed back whole.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{Method, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use tracing::debug;

use unigate_core::{Action, CacheBridge, Connector, InventoryReader, SessionParams};

use crate::handlers;

// ── Routes ──────────────────────────────────────────────────────────

/// Every request shape the gate answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /`
    Index,
    /// `GET /list`
    List,
    /// `PUT /block/{name}`
    Block(String),
    /// `PUT /unblock/{name}`
    Unblock(String),
}

impl Route {
    /// Match a request line. Paths are strict: no trailing slash, exactly
    /// one non-empty `{name}` segment, percent-decoded as UTF-8.
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        let rest = path.strip_prefix('/')?;
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };

        match (method, head, tail) {
            (&Method::GET, "", None) => Some(Self::Index),
            (&Method::GET, "list", None) => Some(Self::List),
            (&Method::PUT, "block", Some(name)) => decode_name(name).map(Self::Block),
            (&Method::PUT, "unblock", Some(name)) => decode_name(name).map(Self::Unblock),
            _ => None,
        }
    }
}

/// A name is one path segment, judged after decoding: `a%2Fb` is two.
fn decode_name(raw: &str) -> Option<String> {
    let name = percent_decode_str(raw).decode_utf8().ok()?;
    (!name.is_empty() && !name.contains('/')).then(|| name.into_owned())
}

// ── Dispatch ────────────────────────────────────────────────────────

/// Whether the gate took a request.
#[derive(Debug)]
pub enum Dispatch {
    Handled(Response),
    /// No route matched; the request is returned untouched for the next
    /// stage of the chain.
    NotHandled(Request),
}

struct GateState<C, B> {
    connector: C,
    params: SessionParams,
    inventory: InventoryReader<B>,
}

/// The middleware. Built once at startup and shared read-only by every
/// request; cloning is an `Arc` bump.
pub struct Gate<C, B> {
    inner: Arc<GateState<C, B>>,
}

impl<C, B> Clone for Gate<C, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, B> Gate<C, B>
where
    C: Connector + 'static,
    B: CacheBridge + 'static,
{
    pub fn new(connector: C, params: SessionParams, inventory: InventoryReader<B>) -> Self {
        Self {
            inner: Arc::new(GateState {
                connector,
                params,
                inventory,
            }),
        }
    }

    /// Route and, if matched, serve one request.
    pub async fn dispatch(&self, req: Request) -> Dispatch {
        let remote_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string());
        debug!(
            method = %req.method(),
            path = %req.uri().path(),
            remote_addr = remote_addr.as_deref().unwrap_or("-"),
            user_agent = req
                .headers()
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-"),
            "dispatch"
        );

        match Route::resolve(req.method(), req.uri().path()) {
            Some(route) => Dispatch::Handled(self.serve(route).await),
            None => {
                debug!(path = %req.uri().path(), "no route, passing to next handler");
                Dispatch::NotHandled(req)
            }
        }
    }

    async fn serve(&self, route: Route) -> Response {
        let state = &*self.inner;
        let result = match route {
            Route::Index => handlers::index(),
            Route::List => handlers::list(&state.inventory).await,
            Route::Block(name) => {
                handlers::control(&state.connector, &state.params, &name, Action::Block).await
            }
            Route::Unblock(name) => {
                handlers::control(&state.connector, &state.params, &name, Action::Unblock).await
            }
        };
        result.unwrap_or_else(IntoResponse::into_response)
    }

    /// Put the gate in front of `downstream`: matched requests are answered
    /// here, everything else reaches `downstream` (routes and fallback).
    pub fn wrap(self, downstream: Router) -> Router {
        downstream.layer(middleware::from_fn_with_state(self, gate_layer::<C, B>))
    }
}

/// Middleware body for [`middleware::from_fn_with_state`]: answers matched
/// requests, forwards the rest to `next`.
pub async fn gate_layer<C, B>(
    State(gate): State<Gate<C, B>>,
    req: Request,
    next: Next,
) -> Response
where
    C: Connector + 'static,
    B: CacheBridge + 'static,
{
    match gate.dispatch(req).await {
        Dispatch::Handled(resp) => resp,
        Dispatch::NotHandled(req) => next.run(req).await,
    }
}
