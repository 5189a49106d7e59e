// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Records exchanged with the data source.
//!
//! Field names follow the GitHub REST payloads so the same types decode live
//! responses and the optional repository cache file.

use serde::{Deserialize, Serialize};

/// Public profile fields of the account the document is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct UserProfile
{
    pub login:        String,
    #[serde(default)]
    pub name:         Option<String,>,
    #[serde(default)]
    pub bio:          Option<String,>,
    #[serde(default)]
    pub blog:         Option<String,>,
    #[serde(default)]
    pub location:     Option<String,>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers:    u64,
}

impl UserProfile
{
    /// Minimal profile used when the live lookup fails and no configured
    /// fallback exists.
    pub fn placeholder(login: &str,) -> Self
    {
        Self {
            login:        login.to_owned(),
            name:         None,
            bio:          None,
            blog:         None,
            location:     None,
            public_repos: 0,
            followers:    0,
        }
    }

    /// Returns the display name, falling back to the login when the name is
    /// missing or blank.
    pub fn display_name(&self,) -> &str
    {
        self.name
            .as_deref()
            .map(str::trim,)
            .filter(|name| !name.is_empty(),)
            .unwrap_or(self.login.as_str(),)
    }
}

/// Repository metadata as listed by `GET /users/{login}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Repository
{
    pub name:             String,
    #[serde(default)]
    pub html_url:         String,
    #[serde(default)]
    pub description:      Option<String,>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub language:         Option<String,>,
    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at:       Option<String,>,
    /// RFC 3339 timestamp of the last update.
    #[serde(default)]
    pub updated_at:       Option<String,>,
    #[serde(default)]
    pub fork:             bool,
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn repository_decodes_github_payload_and_ignores_unknown_fields()
    {
        let json = r#"{
            "id": 1,
            "name": "tobylaifun",
            "html_url": "https://github.com/tobylaifun/tobylaifun",
            "description": null,
            "stargazers_count": 5,
            "language": "Python",
            "created_at": "2024-01-03T10:00:00Z",
            "updated_at": "2026-02-07T00:00:00Z",
            "fork": false,
            "owner": {"login": "tobylaifun"}
        }"#;

        let repository: Repository = serde_json::from_str(json,).expect("expected valid payload",);
        assert_eq!(repository.name, "tobylaifun");
        assert_eq!(repository.stargazers_count, 5);
        assert!(repository.description.is_none());
        assert_eq!(repository.created_at.as_deref(), Some("2024-01-03T10:00:00Z"));
        assert!(!repository.fork);
    }

    #[test]
    fn repository_defaults_missing_fields()
    {
        let repository: Repository =
            serde_json::from_str(r#"{"name":"bare"}"#,).expect("expected defaults",);
        assert_eq!(repository.stargazers_count, 0);
        assert!(repository.created_at.is_none());
        assert!(!repository.fork);
    }

    #[test]
    fn display_name_falls_back_to_login()
    {
        let mut profile = UserProfile::placeholder("octocat",);
        assert_eq!(profile.display_name(), "octocat");

        profile.name = Some("   ".to_owned(),);
        assert_eq!(profile.display_name(), "octocat");

        profile.name = Some("The Octocat".to_owned(),);
        assert_eq!(profile.display_name(), "The Octocat");
    }
}
