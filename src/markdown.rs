// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! Single post and feed rendering.
//!
//! Sections are collected into a list and joined with blank lines, so a section
//! that has no data simply isn't pushed and leaves no stray separator behind.

use itertools::Itertools;

use crate::format::FormatError;
use crate::format::format_count;
use crate::format::format_duration;
use crate::format::format_timestamp;
use crate::post::LinkPreview;
use crate::post::MediaItem;
use crate::post::MediaKind;
use crate::post::Poll;
use crate::post::PollStatus;
use crate::post::Post;

const DESCRIPTION_PREVIEW: usize = 100;

pub fn render_post(post: &Post) -> Result<String, FormatError> {
	let mut sections = vec![format!("## @{} ({})", post.author.username, post.author.display_name)];

	if !post.text.is_empty() {
		sections.push(post.text.clone());
	}
	if !post.media.is_empty() {
		sections.push(media_section(&post.media));
	}
	if let Some(poll) = &post.poll {
		sections.push(poll_section(poll));
	}
	if let Some(quoted) = &post.quoted_post {
		sections.push(quote_section(quoted));
	}
	if !post.link_previews.is_empty() {
		sections.push(links_section(&post.link_previews));
	}

	sections.push("---".to_owned());
	sections.push(engagement_line(post));

	let mut footer = vec![format!("**Posted:** {}", format_timestamp(&post.created_at)?)];
	if !post.hashtags.is_empty() {
		footer.push(format!("**Tags:** {}", hashtag_list(&post.hashtags)));
	}
	footer.push(format!("**Link:** {}", post.permalink()));
	sections.push(footer.join("\n"));

	Ok(sections.join("\n\n"))
}

/// All posts in input order, each followed by a rule. An empty slice is fine.
pub fn tweets_to_feed(posts: &[Post]) -> Result<String, FormatError> {
	let mut sections = vec![
		"# Tweet Feed".to_owned(),
		format!("*{} tweets*", posts.len()),
		"---".to_owned(),
	];
	for post in posts {
		sections.push(render_post(post)?);
		sections.push("---".to_owned());
	}
	Ok(sections.join("\n\n"))
}

pub(crate) fn hashtag_list(tags: &[String]) -> String {
	tags.iter().map(|t| format!("#{t}")).join(" ")
}

fn media_section(media: &[MediaItem]) -> String {
	let mut items = media.iter().map(|m| match m.kind {
		MediaKind::Photo => format!("![{}]({})", m.alt_text.as_deref().unwrap_or("Image"), m.url),
		MediaKind::Video => {
			let mut out = format!("[Video]({})", m.url);
			if let Some(ms) = m.duration_ms {
				out.push_str(&format!(" ({})", format_duration(ms)));
			}
			if let Some(thumb) = &m.thumbnail_url {
				out.push_str(&format!("\n![Video thumbnail]({thumb})"));
			}
			out
		},
		MediaKind::AnimatedGif => format!("[GIF]({})", m.url),
	});
	format!("### Media\n\n{}", items.join("\n\n"))
}

/// `round(percentage / 5)` characters, so 100% is 20.
pub(crate) fn poll_bar(percentage: f64) -> String {
	let width = (percentage / 5.0).round().clamp(0.0, 20.0) as usize;
	"=".repeat(width)
}

fn poll_section(poll: &Poll) -> String {
	let mut lines = vec!["### Poll".to_owned(), String::new()];
	for option in &poll.options {
		let mut line = format!(
			"- {}: {}% ({} votes)",
			option.label,
			option.percentage.round() as i64,
			format_count(option.vote_count)
		);
		let bar = poll_bar(option.percentage);
		if !bar.is_empty() {
			line.push(' ');
			line.push_str(&bar);
		}
		lines.push(line);
	}
	let status = match poll.status {
		PollStatus::Open => "open",
		PollStatus::Closed => "closed",
	};
	lines.push(String::new());
	lines.push(format!("*Total votes: {} · Poll {status}*", format_count(poll.total_votes)));
	lines.join("\n")
}

pub(crate) fn block_quote(text: &str) -> String {
	text.lines().map(|line| format!("> {line}")).join("\n")
}

fn quote_section(quoted: &Post) -> String {
	let mut out = format!(
		"### Quoted Tweet\n\n> **@{}** ({})",
		quoted.author.username, quoted.author.display_name
	);
	if !quoted.text.is_empty() {
		out.push_str("\n>\n");
		out.push_str(&block_quote(&quoted.text));
	}
	out
}

fn links_section(previews: &[LinkPreview]) -> String {
	let mut items = previews.iter().map(|link| match &link.title {
		Some(title) => {
			let mut line = format!("- [{title}]({})", link.expanded_url);
			if let Some(description) = link.description.as_deref().filter(|d| !d.is_empty()) {
				line.push_str(": ");
				line.push_str(&truncate_description(description));
			}
			line
		},
		None => format!("- {}", link.display_url),
	});
	format!("### Links\n\n{}", items.join("\n"))
}

fn truncate_description(description: &str) -> String {
	match description.char_indices().nth(DESCRIPTION_PREVIEW) {
		Some((idx, _)) => format!("{}...", &description[..idx]),
		None => description.to_owned(),
	}
}

fn engagement_line(post: &Post) -> String {
	let e = &post.engagement;
	let mut parts = vec![
		format!("❤️ {} likes", format_count(e.likes)),
		format!("🔁 {} retweets", format_count(e.retweets)),
		format!("💬 {} replies", format_count(e.replies)),
	];
	if let Some(views) = e.views {
		parts.push(format!("👁️ {} views", format_count(views)));
	}
	parts.join(" · ")
}
