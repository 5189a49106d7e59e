// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Data sources for profile, repository and star information.
///
/// [`GithubSource`] talks to the GitHub REST and GraphQL APIs through
/// octocrab; [`MockSource`] serves deterministic in-memory data for offline
/// runs and tests. Both expose single pages so pagination limits stay in the
/// collection pipeline.
use std::{
    collections::{BTreeMap, BTreeSet},
    future::Future,
    time::Duration,
};

use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    identifier::Login,
    model::{Repository, UserProfile},
};

const PINNED_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    pinnedItems(first: 6, types: REPOSITORY) {
      nodes {
        ... on Repository {
          name
        }
      }
    }
  }
}
"#;

/// Remote collaborator supplying everything the generator needs.
///
/// Every call may fail; callers decide how to degrade.
#[allow(async_fn_in_trait)]
pub trait ProfileSource
{
    /// Public profile fields of `login`.
    async fn user(&self, login: &Login,) -> Result<UserProfile, Error,>;

    /// One page of repositories owned by `login`, forks included.
    async fn repositories_page(
        &self,
        login: &Login,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Repository,>, Error,>;

    /// One page of raw `starred_at` timestamps for `repository`.
    async fn stargazers_page(
        &self,
        login: &Login,
        repository: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<String,>, Error,>;

    /// Names of the repositories pinned on the profile.
    async fn pinned_repositories(&self, login: &Login,) -> Result<Vec<String,>, Error,>;
}

/// GitHub API backed source.
#[derive(Debug, Clone,)]
pub struct GithubSource
{
    client:  Octocrab,
    timeout: Duration,
}

#[derive(Debug, Serialize,)]
struct ListParams
{
    #[serde(rename = "type")]
    kind:     &'static str,
    per_page: u8,
    page:     u32,
}

#[derive(Debug, Deserialize,)]
struct PinnedResponse
{
    #[serde(default)]
    data: Option<PinnedData,>,
}

#[derive(Debug, Deserialize,)]
struct PinnedData
{
    #[serde(default)]
    user: Option<PinnedUser,>,
}

#[derive(Debug, Deserialize,)]
struct PinnedUser
{
    #[serde(rename = "pinnedItems")]
    pinned_items: PinnedItems,
}

#[derive(Debug, Deserialize,)]
struct PinnedItems
{
    #[serde(default)]
    nodes: Vec<PinnedNode,>,
}

#[derive(Debug, Deserialize,)]
struct PinnedNode
{
    #[serde(default)]
    name: Option<String,>,
}

impl GithubSource
{
    /// Builds a client, authenticated when `token` is present.
    ///
    /// A missing token only lowers the API rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] when the HTTP client cannot be initialized.
    pub fn new(token: Option<String,>, timeout: Duration,) -> Result<Self, Error,>
    {
        let builder = Octocrab::builder();
        let client = match token.filter(|value| !value.trim().is_empty(),) {
            Some(token,) => builder.personal_token(token,).build(),
            None => builder.build(),
        }
        .map_err(|e| Error::network(format!("failed to initialize GitHub client: {e}"),),)?;

        Ok(Self {
            client, timeout,
        },)
    }

    async fn bounded<T, F,>(&self, operation: &str, request: F,) -> Result<T, Error,>
    where
        F: Future<Output = Result<T, octocrab::Error,>,>,
    {
        match tokio::time::timeout(self.timeout, request,).await {
            Ok(result,) => result.map_err(|e| Error::network(format!("{operation}: {e}"),),),
            Err(_,) => Err(Error::network(format!(
                "{operation}: timed out after {}s",
                self.timeout.as_secs()
            ),),),
        }
    }
}

impl ProfileSource for GithubSource
{
    async fn user(&self, login: &Login,) -> Result<UserProfile, Error,>
    {
        debug!("Fetching profile for {}", login);
        self.bounded(
            "profile lookup",
            self.client.get(format!("/users/{login}"), None::<&(),>,),
        )
        .await
    }

    async fn repositories_page(
        &self,
        login: &Login,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Repository,>, Error,>
    {
        debug!("Fetching repositories page {} for {}", page, login);
        let params = ListParams {
            kind: "owner", per_page, page,
        };
        self.bounded(
            "repository listing",
            self.client.get(format!("/users/{login}/repos"), Some(&params,),),
        )
        .await
    }

    async fn stargazers_page(
        &self,
        login: &Login,
        repository: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<String,>, Error,>
    {
        debug!("Fetching stargazers page {} for {}/{}", page, login, repository);
        let stargazers = self
            .bounded(
                "stargazer listing",
                self.client
                    .repos(login.as_str(), repository,)
                    .list_stargazers()
                    .per_page(per_page,)
                    .page(page,)
                    .send(),
            )
            .await?;

        Ok(stargazers
            .items
            .into_iter()
            .filter_map(|stargazer| stargazer.starred_at,)
            .map(|starred_at| starred_at.to_rfc3339(),)
            .collect(),)
    }

    async fn pinned_repositories(&self, login: &Login,) -> Result<Vec<String,>, Error,>
    {
        let payload = serde_json::json!({
            "query": PINNED_QUERY,
            "variables": { "login": login.as_str() },
        });
        let response: PinnedResponse =
            self.bounded("pinned repository lookup", self.client.graphql(&payload,),).await?;

        Ok(response
            .data
            .and_then(|data| data.user,)
            .map(|user| user.pinned_items.nodes.into_iter().filter_map(|node| node.name,).collect(),)
            .unwrap_or_default(),)
    }
}

/// Deterministic in-memory source.
///
/// A `None` field makes the corresponding call fail with a network error, and
/// repositories listed in `failing_stargazers` fail their stargazer lookups.
#[derive(Debug, Clone, Default,)]
pub struct MockSource
{
    pub user:               Option<UserProfile,>,
    pub repositories:       Option<Vec<Repository,>,>,
    pub stargazers:         BTreeMap<String, Vec<String,>,>,
    pub failing_stargazers: BTreeSet<String,>,
    pub pinned:             Option<Vec<String,>,>,
}

impl MockSource
{
    /// Fixed sample data used by `--mock`.
    pub fn sample(login: &str,) -> Self
    {
        let repository = |name: &str,
                          description: Option<&str,>,
                          stars: u64,
                          language: &str,
                          created: &str,
                          updated: &str,
                          fork: bool| Repository {
            name: name.to_owned(),
            html_url: format!("https://github.com/{login}/{name}"),
            description: description.map(str::to_owned,),
            stargazers_count: stars,
            language: Some(language.to_owned(),),
            created_at: Some(format!("{created}T08:00:00Z"),),
            updated_at: Some(format!("{updated}T00:00:00Z"),),
            fork,
        };

        let repositories = vec![
            repository(
                login,
                Some("My GitHub profile README",),
                5,
                "Python",
                "2024-01-03",
                "2026-02-07",
                false,
            ),
            repository(
                "example-project",
                Some("Example project for demonstration",),
                3,
                "JavaScript",
                "2024-03-15",
                "2026-02-06",
                false,
            ),
            repository("weekend-experiments", None, 0, "Rust", "2024-06-01", "2025-11-30", false,),
            repository(
                "forked-library",
                Some("Someone else's library",),
                40,
                "TypeScript",
                "2024-02-01",
                "2025-01-01",
                true,
            ),
        ];

        let mut stargazers = BTreeMap::new();
        stargazers.insert(login.to_owned(), vec![
            "2024-01-05T12:00:00Z".to_owned(),
            "2024-02-10T09:30:00Z".to_owned(),
            "2024-02-10T17:45:00Z".to_owned(),
            "2024-05-20T08:15:00Z".to_owned(),
        ],);
        stargazers.insert("example-project".to_owned(), vec![
            "2024-03-20T10:00:00Z".to_owned(),
            "2024-04-02T11:00:00Z".to_owned(),
            "2024-07-14T16:20:00Z".to_owned(),
        ],);

        Self {
            user: Some(UserProfile {
                login:        login.to_owned(),
                name:         Some(login.to_owned(),),
                bio:          None,
                blog:         None,
                location:     None,
                public_repos: 15,
                followers:    10,
            },),
            repositories: Some(repositories,),
            stargazers,
            failing_stargazers: BTreeSet::new(),
            pinned: Some(vec!["weekend-experiments".to_owned()],),
        }
    }
}

fn page_slice<T: Clone,>(items: &[T], page: u32, per_page: u8,) -> Vec<T,>
{
    let per_page = usize::from(per_page.max(1,),);
    let start = (page.max(1,) as usize - 1) * per_page;
    items.iter().skip(start,).take(per_page,).cloned().collect()
}

impl ProfileSource for MockSource
{
    async fn user(&self, login: &Login,) -> Result<UserProfile, Error,>
    {
        self.user
            .clone()
            .ok_or_else(|| Error::network(format!("mock profile for {login} unavailable"),),)
    }

    async fn repositories_page(
        &self,
        login: &Login,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Repository,>, Error,>
    {
        self.repositories
            .as_deref()
            .map(|repositories| page_slice(repositories, page, per_page,),)
            .ok_or_else(|| Error::network(format!("mock repositories for {login} unavailable"),),)
    }

    async fn stargazers_page(
        &self,
        login: &Login,
        repository: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<String,>, Error,>
    {
        if self.failing_stargazers.contains(repository,) {
            return Err(Error::network(format!("mock stargazers for {login}/{repository} failed"),),);
        }
        Ok(self
            .stargazers
            .get(repository,)
            .map(|timestamps| page_slice(timestamps, page, per_page,),)
            .unwrap_or_default(),)
    }

    async fn pinned_repositories(&self, login: &Login,) -> Result<Vec<String,>, Error,>
    {
        self.pinned
            .clone()
            .ok_or_else(|| Error::network(format!("mock pinned items for {login} unavailable"),),)
    }
}
