// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! `tracing` setup. Everything goes to stderr because stdout belongs to the stdio transport.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
	#[default]
	Text,
	Json,
}

/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_logging(format: LogFormat, default_filter: &str) -> anyhow::Result<()> {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
	let registry = tracing_subscriber::registry().with(env_filter);

	let result = match format {
		LogFormat::Text => registry
			.with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
			.try_init(),
		LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init(),
	};
	result.map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))
}
