//! `serve`: the intermediary HTTP service behind proxied mode.
//!
//! Speaks the `{success, data | error}` contract of `POST /api/connect` and
//! acquires every request over the direct-mode client.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use tiklens_core::{Acquire, ConnectResponse, Credentials, DirectAcquirer, RouterSlot};

use crate::cli::ServeArgs;
use crate::error::CliError;

use super::Ctx;

pub const MISSING_PARAMETERS: &str = "missing parameters: host, username, password required";

#[derive(Clone)]
pub struct AppState {
    pub acquirer: DirectAcquirer,
}

#[derive(Debug, Deserialize)]
struct ConnectParams {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/connect", post(connect_handler))
        .route("/api/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "tiklens backend is running",
    })
}

/// Keys must be present; empty values are passed on to the router.
async fn connect_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let params = serde_json::from_slice::<ConnectParams>(&body).ok();
    let Some(ConnectParams {
        host: Some(host),
        username: Some(username),
        password: Some(password),
    }) = params
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ConnectResponse::failed(MISSING_PARAMETERS)),
        )
            .into_response();
    };

    debug!(%host, %username, "connect request");
    let creds = Credentials::for_slot(RouterSlot::Primary)
        .with_host(host)
        .with_login(username, SecretString::from(password));
    let result = state.acquirer.acquire(&creds).await;
    Json(ConnectResponse::from(result)).into_response()
}

pub async fn handle(args: ServeArgs, ctx: &Ctx) -> Result<(), CliError> {
    serve(args.listen, app_state(ctx)).await
}

fn app_state(ctx: &Ctx) -> AppState {
    let auth_port = router_port(ctx);
    debug!(auth_port, "serving with direct acquisition");
    AppState {
        acquirer: DirectAcquirer::new(auth_port, ctx.acquisition.build_transport()),
    }
}

/// The backend always dials routers directly, whatever mode the CLI
/// itself is configured for; `--auth-port` and the file setting apply.
fn router_port(ctx: &Ctx) -> u16 {
    ctx.config.acquisition.auth_port
}

async fn serve(listen: SocketAddr, state: AppState) -> Result<(), CliError> {
    let serve_err = |source| CliError::Serve {
        listen: listen.to_string(),
        source,
    };
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(serve_err)?;
    info!(%listen, "tiklens backend listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(serve_err)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
