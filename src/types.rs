// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! Wire types for `api.fxtwitter.com` status responses.
//!
//! Only the fields the normalizer reads are modelled. Everything optional on the
//! upstream side is `#[serde(default)]` here because the API drops keys freely.

use reqwest::Url;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxAuthor {
	pub id: String,
	pub name: String,
	pub screen_name: String,
	#[serde(default)]
	pub avatar_url: Option<Url>,
	#[serde(default)]
	pub followers: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxVideo {
	pub url: Url,
	#[serde(default)]
	pub thumbnail_url: Option<Url>,
	#[serde(default)]
	pub width: Option<u32>,
	#[serde(default)]
	pub height: Option<u32>,
	/// seconds
	#[serde(default)]
	pub duration: Option<f64>,
	/// "video" or "gif"
	#[serde(default)]
	pub r#type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxPhoto {
	pub url: Url,
	#[serde(default)]
	pub width: Option<u32>,
	#[serde(default)]
	pub height: Option<u32>,
	#[serde(default, rename = "altText")]
	pub alt_text: Option<String>,
}

/// Entry of `media.all`, which mixes photos and videos in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxMediaItem {
	pub r#type: String,
	pub url: Url,
	#[serde(default)]
	pub thumbnail_url: Option<Url>,
	#[serde(default)]
	pub width: Option<u32>,
	#[serde(default)]
	pub height: Option<u32>,
	#[serde(default)]
	pub duration: Option<f64>,
	#[serde(default, rename = "altText")]
	pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FxMedia {
	#[serde(default)]
	pub all: Option<Vec<FxMediaItem>>,
	#[serde(default)]
	pub photos: Option<Vec<FxPhoto>>,
	#[serde(default)]
	pub videos: Option<Vec<FxVideo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxPollChoice {
	pub label: String,
	#[serde(default)]
	pub count: u64,
	#[serde(default)]
	pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxPoll {
	pub choices: Vec<FxPollChoice>,
	#[serde(default)]
	pub total_votes: u64,
	#[serde(default)]
	pub ends_at: Option<String>,
	#[serde(default)]
	pub time_left_en: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxFacet {
	pub r#type: String,
	#[serde(default)]
	pub indices: Vec<usize>,
	#[serde(default)]
	pub original: Option<String>,
	#[serde(default)]
	pub replacement: Option<String>,
	#[serde(default)]
	pub display: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxRawText {
	pub text: String,
	#[serde(default)]
	pub facets: Vec<FxFacet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxTweet {
	pub id: String,
	#[serde(default)]
	pub url: Option<String>,
	pub text: String,
	#[serde(default)]
	pub raw_text: Option<FxRawText>,
	pub author: FxAuthor,
	pub created_at: String,
	pub created_timestamp: i64,
	#[serde(default)]
	pub likes: u64,
	#[serde(default)]
	pub retweets: u64,
	#[serde(default)]
	pub replies: u64,
	#[serde(default)]
	pub quotes: Option<u64>,
	#[serde(default)]
	pub views: Option<u64>,
	#[serde(default)]
	pub bookmarks: Option<u64>,
	#[serde(default)]
	pub media: Option<FxMedia>,
	#[serde(default)]
	pub poll: Option<FxPoll>,
	#[serde(default)]
	pub quote: Option<Box<FxTweet>>,
	#[serde(default)]
	pub lang: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxApiResponse {
	pub code: i64,
	pub message: String,
	#[serde(default)]
	pub tweet: Option<FxTweet>,
}
