// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! `api.fxtwitter.com` client.
//!
//! One GET per post, no retries. Anything that isn't a usable tweet comes back
//! as a [`FetchError`] for the tool layer to print.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::StatusCode;
use reqwest::Url;

use crate::post::Post;
use crate::types::FxApiResponse;

pub const DEFAULT_API_BASE: &str = "https://api.fxtwitter.com";

const TARGETS: &[&str] = &[
	"cunnyx.com",
	"fixupx.com",
	"fixvx.com",
	"fxtwitter.com",
	"nitter.net",
	"nitter.poast.org",
	"twitter.com",
	"twittpr.com",
	"vxtwitter.com",
	"x.com",
	"xcancel.com",
	"xfixup.com",
];

const USER_AGENT: &str =
	"Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/145.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
	#[error("{0:?} is not a tweet ID or status URL")]
	InvalidInput(String),
	#[error("tweet {id} not found ({reason})")]
	NotFound { id: String, reason: String },
	#[error("rate limited by the upstream API, try again later")]
	RateLimited,
	#[error("request failed: {0}")]
	Transport(String),
	#[error("upstream API error {code}: {message}")]
	Api { code: i64, message: String },
}

/// Anything that can turn a post ID or link into a [`Post`].
#[async_trait]
pub trait PostSource: Send + Sync {
	async fn fetch_post(&self, input: &str) -> Result<Post, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
	pub api_base: String,
	pub proxy: Option<Url>,
	pub timeout: Duration,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.to_owned(),
			proxy: None,
			timeout: Duration::from_secs(30),
		}
	}
}

/// Pulls the numeric status ID out of a bare ID or any text containing a status link
/// on one of the known hosts (`x.com/user/status/1`, `https://fxtwitter.com/...`).
pub fn parse_post_ref(input: &str) -> Result<String, FetchError> {
	let trimmed = input.trim();
	if is_status_id(trimmed) {
		return Ok(trimmed.to_owned());
	}

	let mut finder = linkify::LinkFinder::new();
	finder.url_must_have_scheme(false).kinds(&[linkify::LinkKind::Url]);
	finder
		.links(trimmed)
		.filter_map(|l| {
			let s = l.as_str();
			if s.contains("://") {
				Url::from_str(s).ok()
			} else {
				Url::from_str(&format!("https://{s}")).ok()
			}
		})
		.filter(|l| matches!(l.scheme(), "https" | "http"))
		.filter(|l| l.host_str().is_some_and(is_target_host))
		.find_map(|l| status_id(&l))
		.ok_or_else(|| FetchError::InvalidInput(input.to_owned()))
}

fn is_status_id(s: &str) -> bool {
	!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_target_host(host: &str) -> bool {
	let host = host.to_ascii_lowercase();
	let host = host
		.strip_prefix("www.")
		.or_else(|| host.strip_prefix("mobile."))
		.unwrap_or(&host);
	TARGETS.contains(&host)
}

fn status_id(url: &Url) -> Option<String> {
	let mut segments = url.path_segments()?;
	segments.find(|s| *s == "status" || *s == "statuses")?;
	segments.next().filter(|id| is_status_id(id)).map(str::to_owned)
}

#[derive(Debug, Clone)]
pub struct FxClient {
	http: reqwest::Client,
	api_base: String,
}

impl FxClient {
	pub fn new(config: &ClientConfig) -> Result<FxClient, FetchError> {
		let mut builder = reqwest::ClientBuilder::new()
			.connect_timeout(Duration::from_secs(10))
			.timeout(config.timeout)
			.user_agent(USER_AGENT);

		if let Some(proxy) = &config.proxy {
			let proxy = reqwest::Proxy::all(proxy.clone()).map_err(|e| FetchError::Transport(e.to_string()))?;
			builder = builder.proxy(proxy);
		}

		Ok(FxClient {
			http: builder.build().map_err(|e| FetchError::Transport(e.to_string()))?,
			api_base: config.api_base.trim_end_matches('/').to_owned(),
		})
	}

	async fn fetch_id(&self, id: &str) -> Result<Post, FetchError> {
		let url = format!("{}/i/status/{id}", self.api_base);
		let response = self
			.http
			.get(&url)
			.send()
			.await
			.map_err(|e| FetchError::Transport(format!("failed to fetch {url}: {e}")))?;

		let status = response.status();
		if status == StatusCode::TOO_MANY_REQUESTS {
			return Err(FetchError::RateLimited);
		}

		let body = response
			.text()
			.await
			.map_err(|e| FetchError::Transport(format!("failed to read body of {url}: {e}")))?;

		// the API puts a JSON envelope on its error responses too, so look at that first
		let parsed = match serde_json::from_str::<FxApiResponse>(&body) {
			Ok(parsed) => parsed,
			Err(_) if status == StatusCode::NOT_FOUND => {
				return Err(FetchError::NotFound {
					id: id.to_owned(),
					reason: "NOT_FOUND".to_owned(),
				});
			},
			Err(_) if !status.is_success() => {
				return Err(FetchError::Api {
					code: status.as_u16().into(),
					message: status.canonical_reason().unwrap_or("unknown").to_owned(),
				});
			},
			Err(e) => {
				return Err(FetchError::Transport(format!("failed to parse response from {url}: {e}")));
			},
		};

		match (parsed.code, parsed.tweet) {
			(200, Some(tweet)) => Ok(Post::from_fx(tweet, Timestamp::now())),
			(404 | 401, _) => Err(FetchError::NotFound {
				id: id.to_owned(),
				reason: parsed.message,
			}),
			(429, _) => Err(FetchError::RateLimited),
			(200, None) => Err(FetchError::Api {
				code: 200,
				message: "response had no tweet".to_owned(),
			}),
			(code, _) => Err(FetchError::Api {
				code,
				message: parsed.message,
			}),
		}
	}
}

#[async_trait]
impl PostSource for FxClient {
	async fn fetch_post(&self, input: &str) -> Result<Post, FetchError> {
		let id = parse_post_ref(input)?;
		tracing::info!(%id, "fetching tweet");
		let result = self.fetch_id(&id).await;
		if let Err(e) = &result {
			tracing::warn!(%id, error = %e, "fetch failed");
		}
		result
	}
}
