// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use fx_post_tools::client::ClientConfig;
use fx_post_tools::client::DEFAULT_API_BASE;
use fx_post_tools::client::FxClient;
use fx_post_tools::logging::LogFormat;
use fx_post_tools::logging::init_logging;
use fx_post_tools::rpc::Server;
use reqwest::Url;
use signals_but_a_little_nicer::SignalInfo;

#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Transport {
	/// newline-delimited JSON-RPC on stdin/stdout
	Stdio,
	/// JSON-RPC over `POST /mcp`
	Http,
}

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None, flatten_help = true, disable_help_subcommand = true)]
struct Args {
	#[arg(long, env = "FX_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
	transport: Transport,
	#[arg(long, env = "FX_BIND", default_value = "127.0.0.1:3000")]
	bind: SocketAddr,
	#[arg(long, env = "FX_API_BASE", default_value = DEFAULT_API_BASE)]
	api_base: String,
	#[arg(long, env = "FX_PROXY")]
	proxy: Option<Url>,
	#[arg(long, env = "FX_TIMEOUT_SECS", default_value_t = 30)]
	timeout_secs: u64,
	#[arg(long, env = "FX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
	log_format: LogFormat,
}

static ARGS: LazyLock<Args> = LazyLock::new(Args::parse);

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
	init_logging(ARGS.log_format, "info")?;

	let signal_recv = signals_but_a_little_nicer::get_or_init_receiver().context("failed to setup signal handler")?;

	run_to_completion(async_main(signal_recv))
}

/// Runs `fut` on a fresh runtime and tears it down without waiting on stuck blocking tasks.
fn run_to_completion<F>(fut: F) -> anyhow::Result<()>
where
	F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
	let rt = tokio::runtime::Runtime::new()?;
	let result = rt.block_on(async { tokio::spawn(fut).await? });
	// stdin reads sit on the blocking pool and never return on their own
	rt.shutdown_timeout(SHUTDOWN_GRACE);
	result
}

async fn async_main(signal_recv: signals_but_a_little_nicer::SignalReceiver) -> anyhow::Result<()> {
	let client = FxClient::new(&ClientConfig {
		api_base: ARGS.api_base.clone(),
		proxy: ARGS.proxy.clone(),
		timeout: Duration::from_secs(ARGS.timeout_secs),
	})
	.context("failed to build http client")?;
	let server = Arc::new(Server::new(client));

	tracing::info!(transport = ?ARGS.transport, api_base = %ARGS.api_base, "starting");

	match ARGS.transport {
		Transport::Stdio => {
			tokio::select! {
				result = fx_post_tools::stdio::serve(server.as_ref(), tokio::io::stdin(), tokio::io::stdout()) => result?,
				() = wait_for_shutdown(signal_recv) => {},
			}
		},
		Transport::Http => fx_post_tools::http::serve(server, ARGS.bind, wait_for_shutdown(signal_recv)).await?,
	}

	tracing::info!("bye");
	Ok(())
}

async fn wait_for_shutdown(mut signal_recv: signals_but_a_little_nicer::SignalReceiver) {
	while let Ok(signal) = signal_recv.recv().await {
		match signal {
			SignalInfo::Int | SignalInfo::Quit | SignalInfo::Term => {
				tracing::info!(?signal, "received signal, exiting");
				return;
			},
			_ => continue,
		}
	}
}
