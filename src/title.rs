// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

use std::sync::LazyLock;

use regex::Regex;

pub const FALLBACK_TITLE: &str = "A Thread on X";

const MIN_LEN: usize = 10;
const MAX_SENTENCE_LEN: usize = 80;
const TRUNCATE_AT: usize = 60;
const MIN_WORD_BREAK: usize = 30;

static URLS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static LEADING_MENTIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:@\w+\s*)+").unwrap());
static HASHTAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static FIRST_SENTENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^.!?]*[.!?]").unwrap());

/// Derives a short headline from free-form post text.
///
/// Links, a leading run of reply mentions and every hashtag are dropped first.
/// Then the first sentence wins if it fits in 80 chars, otherwise the text is cut
/// to 60 chars on a word boundary. Lengths are counted in chars.
pub fn synthesize_title(text: &str) -> String {
	let cleaned = URLS.replace_all(text, "");
	let cleaned = LEADING_MENTIONS.replace(&cleaned, "");
	let cleaned = HASHTAGS.replace_all(&cleaned, "");
	let cleaned = WHITESPACE.replace_all(&cleaned, " ");
	let cleaned = cleaned.trim();

	let len = cleaned.chars().count();
	if len < MIN_LEN {
		return FALLBACK_TITLE.to_owned();
	}

	let sentence = FIRST_SENTENCE.find(cleaned).map(|m| m.as_str()).unwrap_or(cleaned);
	if sentence.chars().count() <= MAX_SENTENCE_LEN {
		return sentence.trim().to_owned();
	}

	if len > TRUNCATE_AT {
		let head = take_chars(cleaned, TRUNCATE_AT);
		if let Some(space) = head.rfind(' ')
			&& head[..space].chars().count() >= MIN_WORD_BREAK
		{
			return format!("{}...", &head[..space]);
		}
		return format!("{head}...");
	}

	cleaned.to_owned()
}

fn take_chars(s: &str, n: usize) -> &str {
	match s.char_indices().nth(n) {
		Some((idx, _)) => &s[..idx],
		None => s,
	}
}
