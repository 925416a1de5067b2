// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! Newline-delimited JSON-RPC over a byte stream (stdin/stdout in practice).
//!
//! Nothing but protocol messages may be written to `writer`; logs go to stderr.

use anyhow::Context;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

use crate::client::PostSource;
use crate::rpc::Server;

/// Runs until `reader` hits EOF.
pub async fn serve<S, R, W>(server: &Server<S>, reader: R, mut writer: W) -> anyhow::Result<()>
where
	S: PostSource,
	R: AsyncRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut lines = BufReader::new(reader).lines();
	while let Some(line) = lines.next_line().await.context("failed to read from stdin")? {
		if line.trim().is_empty() {
			continue;
		}
		tracing::debug!(bytes = line.len(), "<- message");

		let Some(reply) = server.handle_message(&line).await else {
			continue;
		};
		tracing::debug!(bytes = reply.len(), "-> reply");
		writer.write_all(reply.as_bytes()).await?;
		writer.write_all(b"\n").await?;
		writer.flush().await?;
	}
	tracing::info!("stdin closed");
	Ok(())
}
