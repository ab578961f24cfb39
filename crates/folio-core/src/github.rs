#![forbid(unsafe_code)]

//! Public GitHub profile lookup (optional, off by default).
//!
//! Only URL construction and decoding live here; the request itself is made
//! by the host, which must not block while it is pending.

use serde::Deserialize;

use crate::config::GithubConfig;

/// Fields of interest from `GET /users/{username}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GithubProfile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub html_url: String,
}

/// Profile endpoint for the configured user.
#[must_use]
pub fn profile_url(config: &GithubConfig) -> String {
    format!(
        "{}/users/{}",
        config.api_base.trim_end_matches('/'),
        config.username.trim()
    )
}

/// Public profile page, used in the console greeting.
#[must_use]
pub fn profile_page(config: &GithubConfig) -> String {
    format!("https://github.com/{}", config.username.trim())
}

/// Decode a profile response body.
pub fn parse_profile(body: &str) -> Result<GithubProfile, serde_json::Error> {
    serde_json::from_str(body)
}
