// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! JSON-RPC 2.0 framing for the tool protocol.
//!
//! Transports hand raw message text to [`Server::handle_message`] and write back
//! whatever it returns. Notifications never produce a reply.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::client::PostSource;
use crate::tools::Tools;
use crate::tools::tool_descriptors;

pub const JSONRPC_VERSION: &str = "2.0";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
pub struct Request {
	pub jsonrpc: String,
	#[serde(default)]
	pub id: Option<Value>,
	pub method: String,
	#[serde(default)]
	pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
	pub code: i64,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
	pub jsonrpc: String,
	pub id: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<RpcError>,
}

impl Response {
	fn ok(id: Value, result: Value) -> Response {
		Response {
			jsonrpc: JSONRPC_VERSION.to_owned(),
			id,
			result: Some(result),
			error: None,
		}
	}

	fn err(id: Value, code: i64, message: impl Into<String>) -> Response {
		Response {
			jsonrpc: JSONRPC_VERSION.to_owned(),
			id,
			result: None,
			error: Some(RpcError {
				code,
				message: message.into(),
			}),
		}
	}
}

#[derive(Debug, Deserialize)]
struct CallParams {
	name: String,
	#[serde(default)]
	arguments: Value,
}

pub struct Server<S> {
	tools: Tools<S>,
}

impl<S: PostSource> Server<S> {
	pub fn new(source: S) -> Server<S> {
		Server {
			tools: Tools::new(source),
		}
	}

	/// Returns the serialized reply, or `None` for notifications.
	pub async fn handle_message(&self, raw: &str) -> Option<String> {
		let response = match serde_json::from_str::<Value>(raw) {
			Ok(value) => self.handle_value(value).await?,
			Err(e) => Response::err(Value::Null, PARSE_ERROR, format!("parse error: {e}")),
		};
		match serde_json::to_string(&response) {
			Ok(s) => Some(s),
			Err(e) => {
				tracing::error!(error = %e, "failed to serialize response");
				None
			},
		}
	}

	pub async fn handle_value(&self, value: Value) -> Option<Response> {
		if !value.is_object() {
			return Some(Response::err(Value::Null, INVALID_REQUEST, "expected a single request object"));
		}
		let request: Request = match serde_json::from_value(value) {
			Ok(request) => request,
			Err(e) => return Some(Response::err(Value::Null, INVALID_REQUEST, e.to_string())),
		};
		if request.jsonrpc != JSONRPC_VERSION {
			let id = request.id.unwrap_or(Value::Null);
			return Some(Response::err(id, INVALID_REQUEST, "jsonrpc must be \"2.0\""));
		}

		tracing::debug!(method = %request.method, "rpc request");
		let result = self.dispatch(&request.method, request.params).await;

		let Some(id) = request.id else {
			if let Err(e) = result {
				tracing::debug!(method = %request.method, error = %e.message, "notification failed");
			}
			return None;
		};

		Some(match result {
			Ok(value) => Response::ok(id, value),
			Err(e) => Response::err(id, e.code, e.message),
		})
	}

	async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcError> {
		match method {
			"initialize" => {
				let protocol_version = params
					.get("protocolVersion")
					.and_then(Value::as_str)
					.unwrap_or(DEFAULT_PROTOCOL_VERSION);
				Ok(json!({
					"protocolVersion": protocol_version,
					"capabilities": { "tools": {} },
					"serverInfo": {
						"name": env!("CARGO_PKG_NAME"),
						"version": env!("CARGO_PKG_VERSION"),
					},
				}))
			},
			"ping" => Ok(json!({})),
			"tools/list" => Ok(json!({ "tools": tool_descriptors() })),
			"tools/call" => {
				let params: CallParams = serde_json::from_value(params).map_err(|e| RpcError {
					code: INVALID_PARAMS,
					message: e.to_string(),
				})?;
				tracing::info!(tool = %params.name, "tool call");
				match self.tools.call(&params.name, params.arguments).await {
					Ok(output) => Ok(json!({
						"content": [{ "type": "text", "text": output.text }],
						"isError": output.is_error,
					})),
					Err(e) => Err(RpcError {
						code: INVALID_PARAMS,
						message: e.to_string(),
					}),
				}
			},
			m if m.starts_with("notifications/") => Ok(Value::Null),
			_ => Err(RpcError {
				code: METHOD_NOT_FOUND,
				message: format!("method not found: {method}"),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tools::tests::FakeSource;

	fn server() -> Server<FakeSource> {
		Server::new(FakeSource::new())
	}

	async fn roundtrip(raw: &str) -> Response {
		let reply = server().handle_message(raw).await.unwrap();
		serde_json::from_str(&reply).unwrap()
	}

	#[tokio::test]
	async fn initialize_echoes_protocol_version() {
		let r = roundtrip(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#)
			.await;
		let result = r.result.unwrap();
		assert_eq!(r.id, json!(1));
		assert_eq!(result["protocolVersion"], "2025-03-26");
		assert_eq!(result["serverInfo"]["name"], "fx-post-tools");
		assert!(result["capabilities"]["tools"].is_object());

		let r = roundtrip(r#"{"jsonrpc":"2.0","id":"a","method":"initialize"}"#).await;
		assert_eq!(r.result.unwrap()["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
	}

	#[tokio::test]
	async fn notifications_get_no_reply() {
		assert_eq!(
			server()
				.handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
				.await,
			None
		);
		assert_eq!(server().handle_message(r#"{"jsonrpc":"2.0","method":"nope"}"#).await, None);
	}

	#[tokio::test]
	async fn lists_tools() {
		let r = roundtrip(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
		let tools = r.result.unwrap()["tools"].as_array().unwrap().clone();
		assert_eq!(tools.len(), 5);
		assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
	}

	#[tokio::test]
	async fn calls_a_tool() {
		let r = roundtrip(
			r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_tweet","arguments":{"tweet":"1"}}}"#,
		)
		.await;
		let result = r.result.unwrap();
		assert_eq!(result["isError"], false);
		assert_eq!(result["content"][0]["type"], "text");
		assert!(result["content"][0]["text"].as_str().unwrap().starts_with("## @rustlang"));
	}

	#[tokio::test]
	async fn failed_fetch_is_an_error_result_not_an_rpc_error() {
		let r = roundtrip(
			r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_tweet","arguments":{"tweet":"404"}}}"#,
		)
		.await;
		assert!(r.error.is_none());
		assert_eq!(r.result.unwrap()["isError"], true);
	}

	#[tokio::test]
	async fn protocol_errors() {
		let r = roundtrip("{not json").await;
		assert_eq!(r.error.unwrap().code, PARSE_ERROR);
		assert_eq!(r.id, Value::Null);

		let r = roundtrip("[]").await;
		assert_eq!(r.error.unwrap().code, INVALID_REQUEST);

		let r = roundtrip(r#"{"jsonrpc":"1.0","id":5,"method":"ping"}"#).await;
		assert_eq!(r.error.unwrap().code, INVALID_REQUEST);
		assert_eq!(r.id, json!(5));

		let r = roundtrip(r#"{"jsonrpc":"2.0","id":6,"method":"resources/list"}"#).await;
		assert_eq!(r.error.unwrap().code, METHOD_NOT_FOUND);

		let r = roundtrip(r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"nope"}}"#).await;
		assert_eq!(r.error.unwrap().code, INVALID_PARAMS);

		let r = roundtrip(r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{}}"#).await;
		assert_eq!(r.error.unwrap().code, INVALID_PARAMS);
	}

	#[tokio::test]
	async fn ping() {
		let r = roundtrip(r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#).await;
		assert_eq!(r.result, Some(json!({})));
	}
}
