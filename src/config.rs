// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Run settings and per-account personalization.
//!
//! Personalization lives in an optional YAML document keyed by login. Each
//! record may add badges, bio text, links and a preferences section to the
//! generated document, and may supply fallback profile fields used when the
//! live profile lookup fails.

use std::{collections::BTreeMap, fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    model::UserProfile,
};

/// Tunables of a generation run.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Settings
{
    /// Ranking bonus added to pinned repositories. Display counts are never
    /// altered.
    pub pin_bonus:                u64,
    /// Upper bound of real star timestamps collected per repository.
    pub max_stars_per_repository: usize,
    /// Maximum number of repositories in the recommended table.
    pub top_repositories:         usize,
    /// Page size for paginated REST listings.
    pub per_page:                 u8,
    /// Maximum number of repository listing pages fetched.
    pub max_repository_pages:     u32,
    /// Timeout applied to every request.
    pub request_timeout:          Duration,
    /// Descriptions longer than this are truncated in the document.
    pub description_limit:        usize,
}

impl Default for Settings
{
    fn default() -> Self
    {
        Self {
            pin_bonus:                6,
            max_stars_per_repository: 100,
            top_repositories:         10,
            per_page:                 100,
            max_repository_pages:     10,
            request_timeout:          Duration::from_secs(10,),
            description_limit:        80,
        }
    }
}

/// Root personalization document.
///
/// # Examples
///
/// ```
/// use profile_readme::Personalization;
///
/// let yaml = r#"
/// profiles:
///   tobylaifun:
///     aliases: [tobylai-toby]
///     extra_bio: I love building maps.
/// "#;
/// let config = Personalization::from_yaml(yaml,)?;
/// assert!(config.lookup("TOBYLAI-TOBY",).is_some());
/// # Ok::<(), profile_readme::Error>(())
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct Personalization
{
    /// Records keyed by primary login.
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileExtras,>,
}

impl Personalization
{
    /// Parses a personalization document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the YAML is malformed or a field fails
    /// validation.
    pub fn from_yaml(contents: &str,) -> Result<Self, Error,>
    {
        Ok(serde_yaml::from_str(contents,)?,)
    }

    /// Loads a personalization document from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Parse`] when it cannot be decoded.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
        Self::from_yaml(&contents,)
    }

    /// Finds the record for `login`, matching keys and aliases
    /// case-insensitively.
    pub fn lookup(&self, login: &str,) -> Option<&ProfileExtras,>
    {
        self.profiles.iter().find_map(|(key, extras,)| {
            let matches = key.eq_ignore_ascii_case(login,)
                || extras.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(login,),);
            matches.then_some(extras,)
        },)
    }
}

/// Additions rendered for a single account.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct ProfileExtras
{
    /// Other logins sharing this record.
    #[serde(default)]
    pub aliases: Vec<String,>,

    /// Name used when the live profile has none.
    #[serde(default, alias = "display-name", alias = "displayName")]
    pub display_name: Option<String,>,

    /// Badges appended to the header badge row.
    #[serde(default, alias = "extra-badges", alias = "extraBadges")]
    pub extra_badges: Vec<Badge,>,

    /// Markdown paragraph rendered after the bio.
    #[serde(default, alias = "extra-bio", alias = "extraBio")]
    pub extra_bio: Option<String,>,

    /// Entries appended to the links section.
    #[serde(default, alias = "extra-links", alias = "extraLinks")]
    pub extra_links: Vec<Link,>,

    /// Optional "what I like" section.
    #[serde(default)]
    pub preferences: Option<Preferences,>,

    /// Profile fields used when the live lookup fails.
    #[serde(default)]
    pub fallback: Option<FallbackProfile,>,
}

/// Image badge with an optional link target.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct Badge
{
    /// Alternative text of the image.
    pub alt:   String,
    #[serde(deserialize_with = "deserialize_url")]
    pub image: String,
    #[serde(default, deserialize_with = "deserialize_optional_url")]
    pub link:  Option<String,>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct Link
{
    pub title: String,
    #[serde(deserialize_with = "deserialize_url")]
    pub url:   String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct Preferences
{
    #[serde(default)]
    pub badges:  Vec<Badge,>,
    #[serde(default)]
    pub summary: Option<String,>,
}

/// Subset of profile fields that can be supplied offline.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct FallbackProfile
{
    #[serde(default)]
    pub bio:          Option<String,>,
    #[serde(default, deserialize_with = "deserialize_optional_url")]
    pub blog:         Option<String,>,
    #[serde(default)]
    pub location:     Option<String,>,
    #[serde(default, alias = "public-repos")]
    pub public_repos: u64,
    #[serde(default)]
    pub followers:    u64,
}

impl ProfileExtras
{
    /// Builds the profile used when the live lookup failed.
    pub fn fallback_profile(&self, login: &str,) -> UserProfile
    {
        let fallback = self.fallback.clone().unwrap_or_default();
        UserProfile {
            login:        login.to_owned(),
            name:         self.display_name.clone(),
            bio:          fallback.bio,
            blog:         fallback.blog,
            location:     fallback.location,
            public_repos: fallback.public_repos,
            followers:    fallback.followers,
        }
    }
}

fn is_http_url(value: &str,) -> bool
{
    let trimmed = value.trim();
    (trimmed.starts_with("https://",) || trimmed.starts_with("http://",))
        && !trimmed.contains(char::is_whitespace,)
}

fn deserialize_url<'de, D,>(deserializer: D,) -> Result<String, D::Error,>
where
    D: serde::Deserializer<'de,>,
{
    let value = String::deserialize(deserializer,)?;
    if !is_http_url(&value,) {
        return Err(serde::de::Error::custom(format!("'{value}' is not an http(s) URL"),),);
    }
    Ok(value.trim().to_owned(),)
}

fn deserialize_optional_url<'de, D,>(deserializer: D,) -> Result<Option<String,>, D::Error,>
where
    D: serde::Deserializer<'de,>,
{
    let value: Option<String,> = Option::deserialize(deserializer,)?;
    match value {
        Some(url,) if !is_http_url(&url,) => {
            Err(serde::de::Error::custom(format!("'{url}' is not an http(s) URL"),),)
        }
        other => Ok(other.map(|url| url.trim().to_owned(),),),
    }
}
