// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! The normalized post record every renderer works from.
//!
//! A [`Post`] is built once per fetch by [`Post::from_fx`] and never mutated
//! afterwards. Field names here are also the JSON output names.

use std::sync::LazyLock;

use itertools::Itertools;
use jiff::Timestamp;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::format::build_permalink;
use crate::types::FxFacet;
use crate::types::FxMedia;
use crate::types::FxPoll;
use crate::types::FxTweet;

/// How many quote levels below the root post are kept.
pub const MAX_QUOTE_DEPTH: usize = 2;

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());
static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(\w+)").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
	pub id: String,
	pub username: String,
	pub display_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub follower_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
	Photo,
	Video,
	AnimatedGif,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
	pub kind: MediaKind,
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub height: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub duration_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
	Open,
	Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
	pub label: String,
	pub vote_count: u64,
	pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
	pub options: Vec<PollOption>,
	pub total_votes: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end_time: Option<String>,
	pub status: PollStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
	pub likes: u64,
	pub retweets: u64,
	pub replies: u64,
	pub quotes: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub views: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bookmarks: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPreview {
	pub url: String,
	pub expanded_url: String,
	pub display_url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
	pub id: String,
	pub text: String,
	pub author: Author,
	pub created_at: String,
	#[serde(default)]
	pub media: Vec<MediaItem>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub poll: Option<Poll>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub quoted_post: Option<Box<Post>>,
	pub engagement: Engagement,
	#[serde(default)]
	pub link_previews: Vec<LinkPreview>,
	#[serde(default)]
	pub hashtags: Vec<String>,
	#[serde(default)]
	pub mentions: Vec<String>,
}

impl Post {
	/// `now` decides whether a poll without an explicit "final results" marker has closed.
	pub fn from_fx(tweet: FxTweet, now: Timestamp) -> Post {
		from_fx_at_depth(tweet, now, 0)
	}

	pub fn permalink(&self) -> String {
		build_permalink(&self.id, &self.author.username)
	}
}

fn from_fx_at_depth(tweet: FxTweet, now: Timestamp, depth: usize) -> Post {
	let text = htmlize::unescape(&tweet.text).into_owned();
	let facets = tweet.raw_text.map(|raw| raw.facets).unwrap_or_default();

	let hashtags = facet_tokens(&facets, "hashtag", '#').unwrap_or_else(|| extract_hashtags(&text));
	let mentions = facet_tokens(&facets, "mention", '@').unwrap_or_else(|| extract_mentions(&text));
	let link_previews = facets.iter().filter_map(link_preview).collect();

	// the raw string is kept as-is if the unix timestamp is out of range; the renderer reports it
	let created_at = Timestamp::from_second(tweet.created_timestamp)
		.map(|ts| ts.to_string())
		.unwrap_or(tweet.created_at);

	let quoted_post = match tweet.quote {
		Some(quote) if depth < MAX_QUOTE_DEPTH => Some(Box::new(from_fx_at_depth(*quote, now, depth + 1))),
		_ => None,
	};

	Post {
		id: tweet.id,
		text,
		author: Author {
			id: tweet.author.id,
			username: tweet.author.screen_name,
			display_name: tweet.author.name,
			avatar_url: tweet.author.avatar_url.map(String::from),
			follower_count: tweet.author.followers,
		},
		created_at,
		media: tweet.media.map(convert_media).unwrap_or_default(),
		poll: tweet.poll.map(|poll| convert_poll(poll, now)),
		quoted_post,
		engagement: Engagement {
			likes: tweet.likes,
			retweets: tweet.retweets,
			replies: tweet.replies,
			quotes: tweet.quotes.unwrap_or(0),
			views: tweet.views,
			bookmarks: tweet.bookmarks,
		},
		link_previews,
		hashtags,
		mentions,
	}
}

fn media_kind(kind: &str) -> MediaKind {
	match kind {
		"photo" => MediaKind::Photo,
		"gif" | "animated_gif" => MediaKind::AnimatedGif,
		_ => MediaKind::Video,
	}
}

fn seconds_to_ms(secs: Option<f64>) -> Option<u64> {
	secs.filter(|s| s.is_finite() && *s > 0.0).map(|s| (s * 1000.0).round() as u64)
}

fn convert_media(media: FxMedia) -> Vec<MediaItem> {
	if let Some(all) = media.all {
		return all
			.into_iter()
			.map(|m| {
				let kind = media_kind(&m.r#type);
				MediaItem {
					kind,
					url: m.url.into(),
					thumbnail_url: m.thumbnail_url.map(String::from),
					width: m.width,
					height: m.height,
					duration_ms: if kind == MediaKind::Photo { None } else { seconds_to_ms(m.duration) },
					alt_text: m.alt_text,
				}
			})
			.collect();
	}

	let photos = media.photos.unwrap_or_default().into_iter().map(|p| MediaItem {
		kind: MediaKind::Photo,
		url: p.url.into(),
		thumbnail_url: None,
		width: p.width,
		height: p.height,
		duration_ms: None,
		alt_text: p.alt_text,
	});
	let videos = media.videos.unwrap_or_default().into_iter().map(|v| MediaItem {
		kind: media_kind(&v.r#type),
		url: v.url.into(),
		thumbnail_url: v.thumbnail_url.map(String::from),
		width: v.width,
		height: v.height,
		duration_ms: seconds_to_ms(v.duration),
		alt_text: None,
	});
	photos.chain(videos).collect()
}

fn convert_poll(poll: FxPoll, now: Timestamp) -> Poll {
	let final_results = poll.time_left_en.as_deref() == Some("Final results");
	let ended = poll
		.ends_at
		.as_deref()
		.and_then(|s| s.parse::<Timestamp>().ok())
		.is_some_and(|end| end <= now);

	Poll {
		options: poll
			.choices
			.into_iter()
			.map(|c| PollOption {
				label: c.label,
				vote_count: c.count,
				percentage: c.percentage,
			})
			.collect(),
		total_votes: poll.total_votes,
		end_time: poll.ends_at,
		status: if final_results || ended {
			PollStatus::Closed
		} else {
			PollStatus::Open
		},
	}
}

/// `None` when the upstream sent no facets of this kind, so the caller can fall back to the text.
fn facet_tokens(facets: &[FxFacet], kind: &str, prefix: char) -> Option<Vec<String>> {
	let tokens: Vec<String> = facets
		.iter()
		.filter(|f| f.r#type == kind)
		.filter_map(|f| f.original.as_deref())
		.map(|t| t.trim_start_matches(prefix).to_owned())
		.filter(|t| !t.is_empty())
		.unique()
		.collect();
	if tokens.is_empty() { None } else { Some(tokens) }
}

fn link_preview(facet: &FxFacet) -> Option<LinkPreview> {
	if facet.r#type != "url" {
		return None;
	}
	let expanded_url = facet.replacement.clone()?;
	Some(LinkPreview {
		url: facet.original.clone().unwrap_or_else(|| expanded_url.clone()),
		display_url: facet.display.clone().unwrap_or_else(|| expanded_url.clone()),
		expanded_url,
		title: None,
		description: None,
		image: None,
	})
}

/// Hashtags in order of first appearance, without the `#`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
	captures(&HASHTAG, text)
}

/// Mentioned handles in order of first appearance, without the `@`.
pub fn extract_mentions(text: &str) -> Vec<String> {
	captures(&MENTION, text)
}

fn captures(re: &Regex, text: &str) -> Vec<String> {
	re.captures_iter(text).map(|c| c[1].to_owned()).unique().collect()
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::types::FxApiResponse;

	/// A small post with nothing optional set.
	pub(crate) fn bare_post() -> Post {
		Post {
			id: "1746000000000000000".into(),
			text: "Plain text post".into(),
			author: Author {
				id: "42".into(),
				username: "rustlang".into(),
				display_name: "Rust Language".into(),
				avatar_url: None,
				follower_count: None,
			},
			created_at: "2024-01-15T14:30:00Z".into(),
			media: vec![],
			poll: None,
			quoted_post: None,
			engagement: Engagement {
				likes: 1500,
				retweets: 300,
				replies: 12,
				quotes: 4,
				views: None,
				bookmarks: None,
			},
			link_previews: vec![],
			hashtags: vec![],
			mentions: vec![],
		}
	}

	pub(crate) const SAMPLE: &str = include_str!("../tests/fixtures/status.json");

	pub(crate) fn sample_post() -> Post {
		let response: FxApiResponse = serde_json::from_str(SAMPLE).unwrap();
		Post::from_fx(response.tweet.unwrap(), "2024-02-01T00:00:00Z".parse().unwrap())
	}

	#[test]
	fn normalizes_fx_tweet() {
		let post = sample_post();
		assert_eq!(post.id, "1746000000000000000");
		assert_eq!(post.author.username, "rustlang");
		assert_eq!(post.author.display_name, "Rust Language");
		assert_eq!(post.author.follower_count, Some(150000));
		assert!(post.text.contains("out & async"));
		assert_eq!(post.created_at, "2024-01-15T14:30:00Z");
		assert_eq!(post.engagement.views, Some(2_500_000));
		assert_eq!(post.engagement.quotes, 0);
		assert_eq!(post.permalink(), "https://x.com/rustlang/status/1746000000000000000");
	}

	#[test]
	fn normalizes_media() {
		let post = sample_post();
		let kinds: Vec<_> = post.media.iter().map(|m| m.kind).collect();
		assert_eq!(kinds, [MediaKind::Photo, MediaKind::Video, MediaKind::AnimatedGif]);
		assert_eq!(post.media[0].alt_text.as_deref(), Some("release notes"));
		assert_eq!(post.media[1].duration_ms, Some(42_500));
		assert_eq!(post.media[2].duration_ms, None);
	}

	#[test]
	fn normalizes_poll_and_quote() {
		let post = sample_post();
		let poll = post.poll.as_ref().unwrap();
		assert_eq!(poll.status, PollStatus::Closed);
		assert_eq!(poll.options[0].percentage, 47.0);
		assert_eq!(poll.total_votes, 1000);
		let quoted = post.quoted_post.as_ref().unwrap();
		assert_eq!(quoted.author.username, "ferris");
		assert!(quoted.media.is_empty());
	}

	#[test]
	fn poll_open_until_it_ends() {
		let mut response: FxApiResponse = serde_json::from_str(SAMPLE).unwrap();
		let tweet = response.tweet.as_mut().unwrap();
		tweet.poll.as_mut().unwrap().time_left_en = Some("3 hours left".into());
		let before: Timestamp = "2024-01-16T00:00:00Z".parse().unwrap();
		let after: Timestamp = "2024-01-17T00:00:00Z".parse().unwrap();
		let open = Post::from_fx(tweet.clone(), before);
		let closed = Post::from_fx(tweet.clone(), after);
		assert_eq!(open.poll.unwrap().status, PollStatus::Open);
		assert_eq!(closed.poll.unwrap().status, PollStatus::Closed);
	}

	#[test]
	fn link_previews_from_url_facets() {
		let post = sample_post();
		assert_eq!(post.link_previews.len(), 1);
		assert_eq!(post.link_previews[0].url, "https://t.co/abc");
		assert_eq!(post.link_previews[0].expanded_url, "https://blog.rust-lang.org");
		assert_eq!(post.link_previews[0].display_url, "blog.rust-lang.org");
	}

	#[test]
	fn explicit_facets_win_over_text() {
		let mut response: FxApiResponse = serde_json::from_str(SAMPLE).unwrap();
		let tweet = response.tweet.as_mut().unwrap();
		tweet.raw_text.as_mut().unwrap().facets[1].original = Some("#rustlang".into());
		let post = Post::from_fx(tweet.clone(), Timestamp::UNIX_EPOCH);
		// facet says rustlang, the text says rust; the facet wins
		assert_eq!(post.hashtags, ["rustlang"]);
		assert_eq!(extract_hashtags(&post.text), ["rust"]);
		assert_eq!(post.mentions, ["ferris"]);
	}

	#[test]
	fn falls_back_to_text_extraction() {
		let mut response: FxApiResponse = serde_json::from_str(SAMPLE).unwrap();
		let tweet = response.tweet.as_mut().unwrap();
		tweet.raw_text = None;
		tweet.text = "#one two #three #one @a and @b_2".into();
		let post = Post::from_fx(tweet.clone(), Timestamp::UNIX_EPOCH);
		assert_eq!(post.hashtags, ["one", "three"]);
		assert_eq!(post.mentions, ["a", "b_2"]);
		assert!(post.link_previews.is_empty());
	}

	#[test]
	fn photos_then_videos_without_all() {
		let json = r#"{
			"photos": [{ "url": "https://pbs.twimg.com/p.jpg", "width": 10, "height": 10 }],
			"videos": [{ "url": "https://video.twimg.com/v.mp4", "type": "gif", "duration": 0 }]
		}"#;
		let media: FxMedia = serde_json::from_str(json).unwrap();
		let items = convert_media(media);
		assert_eq!(items.len(), 2);
		assert_eq!(items[0].kind, MediaKind::Photo);
		assert_eq!(items[1].kind, MediaKind::AnimatedGif);
		assert_eq!(items[1].duration_ms, None);
	}

	#[test]
	fn quote_depth_is_capped() {
		let response: FxApiResponse = serde_json::from_str(SAMPLE).unwrap();
		let mut tweet = response.tweet.unwrap();
		// build a chain four levels deep
		for _ in 0..3 {
			let inner = tweet.clone();
			tweet.quote = Some(Box::new(inner));
		}
		let post = Post::from_fx(tweet, Timestamp::UNIX_EPOCH);
		let mut depth = 0;
		let mut cur = &post;
		while let Some(q) = &cur.quoted_post {
			depth += 1;
			cur = q;
		}
		assert_eq!(depth, MAX_QUOTE_DEPTH);
	}

	#[test]
	fn json_field_names_are_stable() {
		let value = serde_json::to_value(sample_post()).unwrap();
		assert_eq!(value["author"]["display_name"], "Rust Language");
		assert_eq!(value["media"][2]["kind"], "animated_gif");
		assert_eq!(value["poll"]["status"], "closed");
		assert_eq!(value["quoted_post"]["author"]["username"], "ferris");
		assert!(value["engagement"].get("bookmarks").is_none());
	}
}
