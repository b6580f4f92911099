//! Standalone dev server for the Roastery secrets engine.
//!
//! Binds a Unix socket and speaks newline-delimited JSON: each line is a
//! wire request (a dispatched plugin request or a lease lifecycle
//! callback), each reply a single JSON line. Backed by in-memory
//! storage; nothing survives a restart. This stands in for the Cellar
//! host during local development.

use std::env;
use std::sync::Arc;

use cellar_sdk::{Lease, MemoryStorage, PluginError, Request, Response, SecretsPlugin};
use roastery_secrets_engine::RoasteryBackend;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SOCKET: &str = "/tmp/roastery-secrets.sock";

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WireRequest {
    Handle { request: Request },
    Revoke { lease: Lease },
    Renew { lease: Lease },
    Help,
}

#[derive(Debug, Default, Serialize)]
struct WireResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lease: Option<Lease>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
}

impl WireResponse {
    fn failure(err: &PluginError) -> Self {
        Self {
            ok: false,
            error: Some(err.to_string()),
            error_kind: Some(if err.is_user() { "user" } else { "internal" }),
            ..Self::default()
        }
    }
}

async fn serve_request(backend: &RoasteryBackend, wire: WireRequest) -> WireResponse {
    match wire {
        WireRequest::Handle { request } => match backend.handle(request).await {
            Ok(response) => WireResponse {
                ok: true,
                response: Some(response),
                ..WireResponse::default()
            },
            Err(err) => WireResponse::failure(&err),
        },
        WireRequest::Revoke { lease } => match backend.revoke(&lease).await {
            Ok(()) => WireResponse {
                ok: true,
                ..WireResponse::default()
            },
            Err(err) => WireResponse::failure(&err),
        },
        WireRequest::Renew { mut lease } => match backend.renew(&mut lease).await {
            Ok(()) => WireResponse {
                ok: true,
                lease: Some(lease),
                ..WireResponse::default()
            },
            Err(err) => WireResponse::failure(&err),
        },
        WireRequest::Help => WireResponse {
            ok: true,
            help: Some(backend.help().to_string()),
            ..WireResponse::default()
        },
    }
}

async fn serve_connection(
    stream: UnixStream,
    backend: Arc<RoasteryBackend>,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<WireRequest>(&line) {
            Ok(wire) => serve_request(&backend, wire).await,
            Err(err) => WireResponse {
                ok: false,
                error: Some(format!("malformed request: {err}")),
                error_kind: Some("user"),
                ..WireResponse::default()
            },
        };

        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let socket_path = env::var("CELLAR_DEV_SOCKET").unwrap_or_else(|_| DEFAULT_SOCKET.to_string());
    // Stale socket from a previous run.
    let _ = std::fs::remove_file(&socket_path);
    let listener = UnixListener::bind(&socket_path)?;

    let backend = Arc::new(RoasteryBackend::new(Arc::new(MemoryStorage::new())));
    info!(%socket_path, "Roastery secrets engine dev server listening");

    loop {
        let (stream, _) = listener.accept().await?;
        let backend = Arc::clone(&backend);
        tokio::spawn(async move {
            if let Err(err) = serve_connection(stream, backend).await {
                warn!(error = %err, "connection closed with error");
            }
        });
    }
}
