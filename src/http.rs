// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! HTTP binding: one JSON-RPC message per `POST /mcp`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;

use crate::client::PostSource;
use crate::rpc::Server;

pub fn router<S: PostSource + 'static>(server: Arc<Server<S>>) -> Router {
	Router::new()
		.route("/mcp", post(handle_rpc::<S>))
		.route("/health", get(health))
		.with_state(server)
}

async fn handle_rpc<S: PostSource + 'static>(State(server): State<Arc<Server<S>>>, body: String) -> Response {
	match server.handle_message(&body).await {
		Some(reply) => ([(header::CONTENT_TYPE, "application/json")], reply).into_response(),
		None => StatusCode::ACCEPTED.into_response(),
	}
}

async fn health() -> &'static str {
	"ok"
}

pub async fn serve<S, F>(server: Arc<Server<S>>, bind: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
	S: PostSource + 'static,
	F: Future<Output = ()> + Send + 'static,
{
	let listener = tokio::net::TcpListener::bind(bind)
		.await
		.with_context(|| format!("failed to bind {bind}"))?;
	tracing::info!(%bind, "listening for JSON-RPC on /mcp");
	axum::serve(listener, router(server))
		.with_graceful_shutdown(shutdown)
		.await
		.context("http server failed")?;
	Ok(())
}
