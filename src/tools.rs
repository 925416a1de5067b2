// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! The named tools exposed over RPC.
//!
//! Every tool takes a `format` of `markdown` (default) or `json`. Fetch and
//! formatting failures become error *results* with readable text; only bad
//! arguments are reported as protocol errors.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::blog::BlogOptions;
use crate::blog::build_blog_post;
use crate::blog::render_blog_post;
use crate::client::FetchError;
use crate::client::PostSource;
use crate::format::FormatError;
use crate::format::format_duration;
use crate::markdown::render_post;
use crate::markdown::tweets_to_feed;
use crate::post::MediaItem;
use crate::post::MediaKind;
use crate::post::Post;

pub const MAX_BATCH: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	Markdown,
	Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
	#[error("unknown tool: {0}")]
	UnknownTool(String),
	#[error("invalid arguments for {tool}: {reason}")]
	InvalidArguments { tool: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
enum CallError {
	#[error(transparent)]
	Fetch(#[from] FetchError),
	#[error(transparent)]
	Format(#[from] FormatError),
	#[error("failed to serialize result: {0}")]
	Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
	pub text: String,
	pub is_error: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
	pub name: &'static str,
	pub description: &'static str,
	#[serde(rename = "inputSchema")]
	pub input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct PostArgs {
	tweet: String,
	#[serde(default)]
	format: OutputFormat,
}

#[derive(Debug, Deserialize)]
struct BlogArgs {
	tweet: String,
	#[serde(default)]
	format: OutputFormat,
	#[serde(flatten)]
	options: BlogOptions,
}

#[derive(Debug, Deserialize)]
struct BatchArgs {
	tweets: Vec<String>,
	#[serde(default)]
	format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
	pub input: String,
	pub error: String,
}

#[derive(Debug, Serialize)]
pub struct BatchResult {
	pub tweets: Vec<Post>,
	pub errors: Vec<BatchFailure>,
}

#[derive(Serialize)]
struct MediaReport<'a> {
	tweet_id: &'a str,
	username: &'a str,
	media: &'a [MediaItem],
}

fn format_property() -> Value {
	json!({
		"type": "string",
		"enum": ["markdown", "json"],
		"default": "markdown",
		"description": "markdown for readable text, json for the structured record"
	})
}

fn tweet_property() -> Value {
	json!({
		"type": "string",
		"description": "Tweet ID or status URL (x.com, twitter.com, fxtwitter.com, ...)"
	})
}

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
	let single = json!({
		"type": "object",
		"properties": { "tweet": tweet_property(), "format": format_property() },
		"required": ["tweet"]
	});

	vec![
		ToolDescriptor {
			name: "get_tweet",
			description: "Fetch a single tweet with its author, media, poll, quoted tweet and engagement",
			input_schema: single.clone(),
		},
		ToolDescriptor {
			name: "get_thread",
			description: "Fetch a tweet as a thread. Only the requested tweet is returned; replies are not crawled",
			input_schema: single.clone(),
		},
		ToolDescriptor {
			name: "tweet_to_blog",
			description: "Convert a tweet into a blog post with a generated title, tags and read time",
			input_schema: json!({
				"type": "object",
				"properties": {
					"tweet": tweet_property(),
					"format": format_property(),
					"include_engagement": { "type": "boolean", "default": true },
					"include_replies": { "type": "boolean", "default": true },
					"max_replies": { "type": "integer", "minimum": 0, "default": 10 }
				},
				"required": ["tweet"]
			}),
		},
		ToolDescriptor {
			name: "get_tweets",
			description: "Fetch up to 10 tweets one after another. A failing tweet does not stop the rest",
			input_schema: json!({
				"type": "object",
				"properties": {
					"tweets": {
						"type": "array",
						"items": tweet_property(),
						"minItems": 1,
						"maxItems": MAX_BATCH
					},
					"format": format_property()
				},
				"required": ["tweets"]
			}),
		},
		ToolDescriptor {
			name: "extract_media",
			description: "List the photos, videos and GIFs attached to a tweet",
			input_schema: single,
		},
	]
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
	let arguments = if arguments.is_null() { json!({}) } else { arguments };
	serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
		tool: tool.to_owned(),
		reason: e.to_string(),
	})
}

/// Fetches each input in order. One failure is recorded and the loop carries on.
pub async fn fetch_batch<S: PostSource + ?Sized>(source: &S, inputs: &[String]) -> BatchResult {
	let mut result = BatchResult {
		tweets: vec![],
		errors: vec![],
	};
	for input in inputs {
		match source.fetch_post(input).await {
			Ok(post) => result.tweets.push(post),
			Err(e) => result.errors.push(BatchFailure {
				input: input.clone(),
				error: e.to_string(),
			}),
		}
	}
	result
}

pub struct Tools<S> {
	source: S,
}

impl<S: PostSource> Tools<S> {
	pub fn new(source: S) -> Tools<S> {
		Tools { source }
	}

	pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
		let result = match name {
			"get_tweet" => {
				let args: PostArgs = parse_args(name, arguments)?;
				self.get_tweet(args).await
			},
			"get_thread" => {
				let args: PostArgs = parse_args(name, arguments)?;
				self.get_thread(args).await
			},
			"tweet_to_blog" => {
				let args: BlogArgs = parse_args(name, arguments)?;
				self.tweet_to_blog(args).await
			},
			"get_tweets" => {
				let args: BatchArgs = parse_args(name, arguments)?;
				if args.tweets.is_empty() || args.tweets.len() > MAX_BATCH {
					return Err(ToolError::InvalidArguments {
						tool: name.to_owned(),
						reason: format!("expected 1 to {MAX_BATCH} tweets, got {}", args.tweets.len()),
					});
				}
				return self.get_tweets(args).await.or_else(|e| Ok(error_output(e)));
			},
			"extract_media" => {
				let args: PostArgs = parse_args(name, arguments)?;
				self.extract_media(args).await
			},
			_ => return Err(ToolError::UnknownTool(name.to_owned())),
		};

		Ok(match result {
			Ok(text) => ToolOutput { text, is_error: false },
			Err(e) => error_output(e),
		})
	}

	async fn get_tweet(&self, args: PostArgs) -> Result<String, CallError> {
		let post = self.source.fetch_post(&args.tweet).await?;
		Ok(match args.format {
			OutputFormat::Markdown => render_post(&post)?,
			OutputFormat::Json => serde_json::to_string_pretty(&post)?,
		})
	}

	async fn get_thread(&self, args: PostArgs) -> Result<String, CallError> {
		let thread = vec![self.source.fetch_post(&args.tweet).await?];
		Ok(match args.format {
			OutputFormat::Markdown => tweets_to_feed(&thread)?,
			OutputFormat::Json => serde_json::to_string_pretty(&thread)?,
		})
	}

	async fn tweet_to_blog(&self, args: BlogArgs) -> Result<String, CallError> {
		let post = self.source.fetch_post(&args.tweet).await?;
		// replies are never fetched
		let blog = build_blog_post(&post, &[], &args.options)?;
		Ok(match args.format {
			OutputFormat::Markdown => render_blog_post(&blog),
			OutputFormat::Json => serde_json::to_string_pretty(&blog)?,
		})
	}

	async fn get_tweets(&self, args: BatchArgs) -> Result<ToolOutput, CallError> {
		let batch = fetch_batch(&self.source, &args.tweets).await;
		let is_error = batch.tweets.is_empty();
		let text = match args.format {
			OutputFormat::Markdown => {
				let mut text = tweets_to_feed(&batch.tweets)?;
				if !batch.errors.is_empty() {
					text.push_str("\n\n## Errors\n\n");
					let lines: Vec<String> = batch
						.errors
						.iter()
						.map(|f| format!("- `{}`: {}", f.input, f.error))
						.collect();
					text.push_str(&lines.join("\n"));
				}
				text
			},
			OutputFormat::Json => serde_json::to_string_pretty(&batch)?,
		};
		Ok(ToolOutput { text, is_error })
	}

	async fn extract_media(&self, args: PostArgs) -> Result<String, CallError> {
		let post = self.source.fetch_post(&args.tweet).await?;
		Ok(match args.format {
			OutputFormat::Markdown => media_markdown(&post),
			OutputFormat::Json => serde_json::to_string_pretty(&MediaReport {
				tweet_id: &post.id,
				username: &post.author.username,
				media: &post.media,
			})?,
		})
	}
}

fn error_output(e: CallError) -> ToolOutput {
	ToolOutput {
		text: format!("Error: {e}"),
		is_error: true,
	}
}

fn media_markdown(post: &Post) -> String {
	if post.media.is_empty() {
		return format!("No media found in tweet {} by @{}.", post.id, post.author.username);
	}

	let mut lines = vec![format!("## Media from @{}", post.author.username), String::new()];
	for (i, m) in post.media.iter().enumerate() {
		let kind = match m.kind {
			MediaKind::Photo => "Photo",
			MediaKind::Video => "Video",
			MediaKind::AnimatedGif => "GIF",
		};
		let mut details = vec![];
		if let (Some(w), Some(h)) = (m.width, m.height) {
			details.push(format!("{w}x{h}"));
		}
		if let Some(ms) = m.duration_ms {
			details.push(format_duration(ms));
		}
		let mut line = format!("{}. **{kind}**: {}", i + 1, m.url);
		if !details.is_empty() {
			line.push_str(&format!(" ({})", details.join(", ")));
		}
		lines.push(line);
		if let Some(thumb) = &m.thumbnail_url {
			lines.push(format!("   Thumbnail: {thumb}"));
		}
		if let Some(alt) = &m.alt_text {
			lines.push(format!("   Alt text: {alt}"));
		}
	}
	lines.join("\n")
}
