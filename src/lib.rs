// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! Fetch public posts from `api.fxtwitter.com` and turn them into Markdown or JSON.
//!
//! The formatting core ([`markdown`], [`blog`], [`title`], [`format`]) is pure and
//! synchronous. [`client`] does the HTTP, [`tools`] and [`rpc`] expose it as named
//! tools, and [`stdio`] / [`http`] carry the RPC messages.

pub mod blog;
pub mod client;
pub mod format;
pub mod http;
pub mod logging;
pub mod markdown;
pub mod post;
pub mod rpc;
pub mod stdio;
pub mod title;
pub mod tools;
pub mod types;

pub use blog::BlogOptions;
pub use blog::BlogPost;
pub use blog::build_blog_post;
pub use blog::render_blog_post;
pub use client::FetchError;
pub use client::FxClient;
pub use client::PostSource;
pub use format::FormatError;
pub use markdown::render_post;
pub use markdown::tweets_to_feed;
pub use post::Post;
pub use title::synthesize_title;
