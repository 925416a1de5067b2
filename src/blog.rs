// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! Long-form "blog post" projection of a [`Post`].

use serde::Deserialize;
use serde::Serialize;

use crate::format::FormatError;
use crate::format::format_count;
use crate::format::format_date;
use crate::markdown::block_quote;
use crate::markdown::hashtag_list;
use crate::post::MAX_QUOTE_DEPTH;
use crate::post::MediaKind;
use crate::post::Post;
use crate::title::synthesize_title;

pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogOptions {
	pub include_engagement: bool,
	pub include_replies: bool,
	pub max_replies: usize,
}

impl Default for BlogOptions {
	fn default() -> Self {
		Self {
			include_engagement: true,
			include_replies: true,
			max_replies: 10,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogAuthor {
	pub name: String,
	pub username: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogEngagement {
	pub likes: u64,
	pub retweets: u64,
	pub replies: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub views: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogComment {
	pub author: String,
	pub username: String,
	pub text: String,
	pub likes: u64,
	pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtitle: Option<String>,
	pub author: BlogAuthor,
	pub published_at: String,
	pub content: String,
	pub source_url: String,
	pub images: Vec<String>,
	pub videos: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub featured_image: Option<String>,
	pub tags: Vec<String>,
	pub word_count: usize,
	pub read_time_minutes: usize,
	pub engagement: BlogEngagement,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub comments: Option<Vec<BlogComment>>,
}

/// `ceil(words / 200)`, never less than a minute.
pub fn read_time_minutes(word_count: usize) -> usize {
	word_count.div_ceil(WORDS_PER_MINUTE).max(1)
}

pub fn build_blog_post(post: &Post, replies: &[Post], options: &BlogOptions) -> Result<BlogPost, FormatError> {
	let content = blog_content(post, 0);
	let word_count = content.split_whitespace().count();

	let (images, videos): (Vec<_>, Vec<_>) = post.media.iter().partition(|m| m.kind == MediaKind::Photo);
	let images: Vec<String> = images.into_iter().map(|m| m.url.clone()).collect();
	let videos: Vec<String> = videos.into_iter().map(|m| m.url.clone()).collect();

	let engagement = if options.include_engagement {
		BlogEngagement {
			likes: post.engagement.likes,
			retweets: post.engagement.retweets,
			replies: post.engagement.replies,
			views: post.engagement.views,
		}
	} else {
		BlogEngagement::default()
	};

	let comments = if options.include_replies && !replies.is_empty() {
		let comments = replies
			.iter()
			.take(options.max_replies)
			.map(|reply| {
				Ok(BlogComment {
					author: reply.author.display_name.clone(),
					username: reply.author.username.clone(),
					text: reply.text.clone(),
					likes: reply.engagement.likes,
					timestamp: format_date(&reply.created_at)?,
				})
			})
			.collect::<Result<Vec<_>, FormatError>>()?;
		Some(comments)
	} else {
		None
	};

	Ok(BlogPost {
		title: synthesize_title(&post.text),
		subtitle: Some(format!("A post by @{}", post.author.username)),
		author: BlogAuthor {
			name: post.author.display_name.clone(),
			username: post.author.username.clone(),
			avatar_url: post.author.avatar_url.clone(),
		},
		published_at: format_date(&post.created_at)?,
		source_url: post.permalink(),
		featured_image: images.first().cloned(),
		images,
		videos,
		tags: post.hashtags.clone(),
		word_count,
		read_time_minutes: read_time_minutes(word_count),
		engagement,
		comments,
		content,
	})
}

fn blog_content(post: &Post, depth: usize) -> String {
	let mut sections = vec![];

	if !post.text.is_empty() {
		sections.push(post.text.clone());
	}

	for media in &post.media {
		sections.push(match media.kind {
			MediaKind::Photo => format!("![Image]({})", media.url),
			MediaKind::Video | MediaKind::AnimatedGif => format!("[Watch Video]({})", media.url),
		});
	}

	if let Some(poll) = &post.poll {
		let mut lines = vec!["### Poll".to_owned(), String::new()];
		for option in &poll.options {
			lines.push(format!(
				"**{}**: {}% ({} votes)",
				option.label,
				option.percentage.round() as i64,
				format_count(option.vote_count)
			));
		}
		lines.push(String::new());
		lines.push(format!("*Total votes: {}*", format_count(poll.total_votes)));
		sections.push(lines.join("\n"));
	}

	if let Some(quoted) = &post.quoted_post
		&& depth < MAX_QUOTE_DEPTH
	{
		sections.push("---".to_owned());
		let inner = format!(
			"**@{}** ({}):\n\n{}",
			quoted.author.username,
			quoted.author.display_name,
			blog_content(quoted, depth + 1)
		);
		sections.push(block_quote(inner.trim_end()));
	}

	sections.join("\n\n")
}

pub fn render_blog_post(blog: &BlogPost) -> String {
	let mut sections = vec![format!("# {}", blog.title)];

	if let Some(subtitle) = blog.subtitle.as_deref().filter(|s| !s.is_empty()) {
		sections.push(format!("*{subtitle}*"));
	}

	let mut meta = vec![
		format!("**Author:** {} (@{})", blog.author.name, blog.author.username),
		format!("**Published:** {}", blog.published_at),
		format!("**Read time:** {} min read", blog.read_time_minutes),
	];
	if !blog.tags.is_empty() {
		meta.push(format!("**Tags:** {}", hashtag_list(&blog.tags)));
	}
	sections.push(meta.join("\n"));
	sections.push("---".to_owned());

	if let Some(featured) = &blog.featured_image {
		sections.push(format!("![Featured image]({featured})"));
	}
	if !blog.content.is_empty() {
		sections.push(blog.content.clone());
	}
	sections.push("---".to_owned());

	let e = &blog.engagement;
	let mut engagement = vec![
		"## Engagement".to_owned(),
		String::new(),
		format!("- ❤️ Likes: {}", format_count(e.likes)),
		format!("- 🔁 Retweets: {}", format_count(e.retweets)),
		format!("- 💬 Replies: {}", format_count(e.replies)),
	];
	if let Some(views) = e.views {
		engagement.push(format!("- 👁️ Views: {}", format_count(views)));
	}
	sections.push(engagement.join("\n"));

	if let Some(comments) = blog.comments.as_ref().filter(|c| !c.is_empty()) {
		sections.push("## Comments".to_owned());
		for comment in comments {
			sections.push(format!(
				"### @{}\n\n*{} · {} likes*\n\n{}",
				comment.username,
				comment.timestamp,
				format_count(comment.likes),
				comment.text
			));
		}
	}

	sections.push("---".to_owned());
	sections.push(format!("*Originally posted on X: [View original]({})*", blog.source_url));

	sections.join("\n\n")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::post::tests::bare_post;
	use crate::post::tests::sample_post;

	#[test]
	fn read_time() {
		assert_eq!(read_time_minutes(0), 1);
		assert_eq!(read_time_minutes(1), 1);
		assert_eq!(read_time_minutes(200), 1);
		assert_eq!(read_time_minutes(201), 2);
		assert_eq!(read_time_minutes(450), 3);
	}

	#[test]
	fn bare_projection() {
		let blog = build_blog_post(&bare_post(), &[], &BlogOptions::default()).unwrap();
		assert_eq!(blog.title, "Plain text post");
		assert_eq!(blog.subtitle.as_deref(), Some("A post by @rustlang"));
		assert_eq!(blog.published_at, "January 15, 2024");
		assert_eq!(blog.content, "Plain text post");
		assert_eq!(blog.word_count, 3);
		assert_eq!(blog.read_time_minutes, 1);
		assert_eq!(blog.source_url, "https://x.com/rustlang/status/1746000000000000000");
		assert!(blog.images.is_empty() && blog.videos.is_empty());
		assert_eq!(blog.featured_image, None);
		assert!(blog.tags.is_empty());
		assert_eq!(blog.comments, None);
	}

	#[test]
	fn media_is_partitioned_in_order() {
		let mut post = sample_post();
		let mut second_photo = post.media[0].clone();
		second_photo.url = "https://pbs.twimg.com/media/b.jpg".into();
		post.media.push(second_photo);

		let blog = build_blog_post(&post, &[], &BlogOptions::default()).unwrap();
		assert_eq!(
			blog.images,
			["https://pbs.twimg.com/media/a.jpg", "https://pbs.twimg.com/media/b.jpg"]
		);
		assert_eq!(blog.videos, ["https://video.twimg.com/v.mp4", "https://video.twimg.com/g.mp4"]);
		assert_eq!(blog.featured_image.as_deref(), Some("https://pbs.twimg.com/media/a.jpg"));
		assert_eq!(blog.tags, ["rust"]);
	}

	#[test]
	fn content_sections() {
		let blog = build_blog_post(&sample_post(), &[], &BlogOptions::default()).unwrap();
		assert!(blog.content.contains("\n\n![Image](https://pbs.twimg.com/media/a.jpg)\n\n"));
		assert!(blog.content.contains("[Watch Video](https://video.twimg.com/v.mp4)"));
		assert!(blog.content.contains("[Watch Video](https://video.twimg.com/g.mp4)"));
		assert!(!blog.content.contains("0:42"));
		assert!(blog.content.contains("**Yes**: 47% (470 votes)\n**No**: 53% (530 votes)\n\n*Total votes: 1K*"));
		assert!(
			blog.content
				.ends_with("---\n\n> **@ferris** (Ferris):\n> \n> Quoted line one\n> line two")
		);
		assert_eq!(blog.word_count, blog.content.split_whitespace().count());
	}

	#[test]
	fn long_content_reads_longer() {
		let mut post = bare_post();
		post.text = vec!["word"; 450].join(" ");
		let blog = build_blog_post(&post, &[], &BlogOptions::default()).unwrap();
		assert_eq!(blog.word_count, 450);
		assert_eq!(blog.read_time_minutes, 3);
	}

	#[test]
	fn engagement_opt_out_zeroes() {
		let options = BlogOptions {
			include_engagement: false,
			..Default::default()
		};
		let blog = build_blog_post(&sample_post(), &[], &options).unwrap();
		assert_eq!(blog.engagement, BlogEngagement::default());

		let blog = build_blog_post(&sample_post(), &[], &BlogOptions::default()).unwrap();
		assert_eq!(blog.engagement.likes, 12345);
		assert_eq!(blog.engagement.views, Some(2_500_000));
	}

	#[test]
	fn comments_respect_options() {
		let replies: Vec<Post> = (0..15)
			.map(|i| {
				let mut reply = bare_post();
				reply.author.username = format!("user{i}");
				reply.text = format!("reply {i}");
				reply
			})
			.collect();

		let blog = build_blog_post(&bare_post(), &replies, &BlogOptions::default()).unwrap();
		let comments = blog.comments.unwrap();
		assert_eq!(comments.len(), 10);
		assert_eq!(comments[0].username, "user0");
		assert_eq!(comments[9].text, "reply 9");
		assert_eq!(comments[0].timestamp, "January 15, 2024");

		let options = BlogOptions {
			include_replies: false,
			..Default::default()
		};
		let blog = build_blog_post(&bare_post(), &replies, &options).unwrap();
		assert_eq!(blog.comments, None);

		let options = BlogOptions {
			max_replies: 2,
			..Default::default()
		};
		let blog = build_blog_post(&bare_post(), &replies, &options).unwrap();
		assert_eq!(blog.comments.unwrap().len(), 2);
	}

	#[test]
	fn renders_markdown() {
		let blog = build_blog_post(&sample_post(), &[], &BlogOptions::default()).unwrap();
		let md = render_blog_post(&blog);
		assert!(md.starts_with(&format!("# {}\n\n*A post by @rustlang*\n\n", blog.title)));
		assert!(md.contains("**Author:** Rust Language (@rustlang)\n**Published:** January 15, 2024\n**Read time:** 1 min read\n**Tags:** #rust"));
		assert!(md.contains("---\n\n![Featured image](https://pbs.twimg.com/media/a.jpg)\n\n"));
		assert!(md.contains("## Engagement\n\n- ❤️ Likes: 12.3K\n- 🔁 Retweets: 2.1K\n- 💬 Replies: 87\n- 👁️ Views: 2.5M"));
		assert!(!md.contains("## Comments"));
		assert!(md.ends_with(
			"---\n\n*Originally posted on X: [View original](https://x.com/rustlang/status/1746000000000000000)*"
		));
		assert_eq!(md, render_blog_post(&blog));
	}

	#[test]
	fn renders_comments() {
		let mut reply = bare_post();
		reply.author.username = "fan".into();
		reply.text = "great post".into();
		reply.engagement.likes = 5;
		let blog = build_blog_post(&bare_post(), &[reply], &BlogOptions::default()).unwrap();
		let md = render_blog_post(&blog);
		assert!(md.contains("## Comments\n\n### @fan\n\n*January 15, 2024 · 5 likes*\n\ngreat post\n\n---"));
		assert!(md.find("## Engagement").unwrap() < md.find("## Comments").unwrap());
	}

	#[test]
	fn bare_blog_omits_optional_parts() {
		let blog = build_blog_post(&bare_post(), &[], &BlogOptions::default()).unwrap();
		let md = render_blog_post(&blog);
		assert!(!md.contains("**Tags:**"));
		assert!(!md.contains("Featured image"));
		assert!(!md.contains("Views"));
		assert!(!md.contains("\n\n\n"));
	}

	#[test]
	fn bad_reply_timestamp_fails_the_build() {
		let mut reply = bare_post();
		reply.created_at = "garbage".into();
		let err = build_blog_post(&bare_post(), &[reply], &BlogOptions::default());
		assert!(err.is_err());
	}
}
