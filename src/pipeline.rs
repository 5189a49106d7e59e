// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Collects everything the renderers need from a [`ProfileSource`].
///
/// Every remote step degrades instead of failing: the repository listing falls
/// back to the cache file, the profile to a configured or placeholder record,
/// and enrichment steps to empty results. The only error that survives
/// collection is a malformed timestamp, which suppresses the star history.
use std::path::Path;

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    cache,
    config::{Personalization, Settings},
    error::Error,
    history::{self, CreationIndex, CumulativeSeries, Event},
    identifier::Login,
    model::{Repository, UserProfile},
    ranking::{self, RankedRepository},
    source::ProfileSource,
};

/// Where the repository list of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum ListingOrigin
{
    Live,
    Cache,
    Empty,
}

/// Aggregated star history of the owned repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct StarHistory
{
    pub series:    CumulativeSeries,
    pub creations: CreationIndex,
}

/// Result of a collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct ProfileSnapshot
{
    pub profile: UserProfile,
    /// Owned non-fork repositories in ranking order.
    pub ranked:  Vec<RankedRepository,>,
    pub pinned:  Vec<String,>,
    pub origin:  ListingOrigin,
    /// `None` when a malformed timestamp made the history untrustworthy.
    pub history: Option<StarHistory,>,
}

impl ProfileSnapshot
{
    /// Sum of displayed star counts of owned non-fork repositories.
    pub fn total_stars(&self,) -> u64
    {
        ranking::total_stars(&self.ranked,)
    }
}

/// Drives a [`ProfileSource`] through one collection run.
#[derive(Debug,)]
pub struct Collector<'run, S,>
{
    source:          &'run S,
    settings:        &'run Settings,
    personalization: &'run Personalization,
    cache_path:      Option<&'run Path,>,
}

impl<'run, S: ProfileSource,> Collector<'run, S,>
{
    pub fn new(
        source: &'run S,
        settings: &'run Settings,
        personalization: &'run Personalization,
        cache_path: Option<&'run Path,>,
    ) -> Self
    {
        Self {
            source,
            settings,
            personalization,
            cache_path,
        }
    }

    /// Collects profile, repositories, pins and star history for `raw_login`.
    ///
    /// `today` dates the synthetic stars of repositories without any known
    /// timestamp.
    pub async fn collect(&self, raw_login: &str, today: NaiveDate,) -> ProfileSnapshot
    {
        let login = match Login::parse(raw_login,) {
            Ok(login,) => Some(login,),
            Err(error,) => {
                warn!("{}; remote lookups are skipped", error);
                None
            }
        };

        let profile = self.load_profile(login.as_ref(), raw_login,).await;
        let (mut repositories, origin,) = self.load_repositories(login.as_ref(),).await;
        repositories.retain(|repository| !repository.fork,);
        info!("Using {} owned repositories ({:?} listing)", repositories.len(), origin);

        let pinned = self.load_pinned(login.as_ref(),).await;

        let pb = spinner();
        let history = match self.collect_history(login.as_ref(), &repositories, today, &pb,).await {
            Ok((events, creations,),) => {
                let series = history::aggregate(&events, &creations,);
                info!("Aggregated {} events into {} chart points", events.len(), series.len());
                Some(StarHistory {
                    series,
                    creations,
                },)
            }
            Err(error,) => {
                error!("Star history discarded: {}", error);
                None
            }
        };

        let ranked = ranking::rank(repositories, &pinned, self.settings.pin_bonus,);

        ProfileSnapshot {
            profile,
            ranked,
            pinned,
            origin,
            history,
        }
    }

    async fn load_profile(&self, login: Option<&Login,>, raw_login: &str,) -> UserProfile
    {
        if let Some(login,) = login {
            match self.source.user(login,).await {
                Ok(profile,) => return profile,
                Err(error,) => warn!("Profile lookup failed: {}", error),
            }
        }

        match self.personalization.lookup(raw_login,) {
            Some(extras,) => {
                info!("Using configured fallback profile for {}", raw_login);
                extras.fallback_profile(raw_login,)
            }
            None => UserProfile::placeholder(raw_login,),
        }
    }

    async fn load_repositories(&self, login: Option<&Login,>,) -> (Vec<Repository,>, ListingOrigin,)
    {
        if let Some(login,) = login {
            match fetch_repositories(self.source, login, self.settings,).await {
                Ok(repositories,) => {
                    if let Some(path,) = self.cache_path
                        && let Err(error,) = cache::store(path, &repositories,)
                    {
                        warn!("Failed to refresh repository cache: {}", error);
                    }
                    return (repositories, ListingOrigin::Live,);
                }
                Err(error,) => warn!("Repository listing failed: {}", error),
            }
        }

        if let Some(path,) = self.cache_path {
            match cache::load(path,) {
                Ok(repositories,) => {
                    info!("Loaded {} repositories from {}", repositories.len(), path.display());
                    return (repositories, ListingOrigin::Cache,);
                }
                Err(error,) => debug!("Repository cache unavailable: {}", error),
            }
        }

        (Vec::new(), ListingOrigin::Empty,)
    }

    async fn load_pinned(&self, login: Option<&Login,>,) -> Vec<String,>
    {
        let Some(login,) = login else {
            return Vec::new();
        };
        match self.source.pinned_repositories(login,).await {
            Ok(pinned,) => {
                debug!("Pinned repositories: {:?}", pinned);
                pinned
            }
            Err(error,) => {
                warn!("Pinned repository lookup failed: {}", error);
                Vec::new()
            }
        }
    }

    /// Gathers history events, leaving `pb` finished on success and abandoned
    /// on failure.
    async fn collect_history(
        &self,
        login: Option<&Login,>,
        repositories: &[Repository],
        today: NaiveDate,
        pb: &ProgressBar,
    ) -> Result<(Vec<Event,>, CreationIndex,), Error,>
    {
        match self.gather_history(login, repositories, today, pb,).await {
            Ok((events, creations,),) => {
                pb.finish_with_message(format!(
                    "Star history complete: {} events, {} creation dates",
                    events.len(),
                    creations.len()
                ),);
                Ok((events, creations,),)
            }
            Err(error,) => {
                pb.abandon_with_message(format!("Star history aborted: {error}"),);
                Err(error,)
            }
        }
    }

    async fn gather_history(
        &self,
        login: Option<&Login,>,
        repositories: &[Repository],
        today: NaiveDate,
        pb: &ProgressBar,
    ) -> Result<(Vec<Event,>, CreationIndex,), Error,>
    {
        let mut ordered: Vec<&Repository,> = repositories.iter().collect();
        ordered.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count,),);

        let mut events = Vec::new();
        let mut creations = CreationIndex::new();

        for repository in ordered {
            let created = optional_date(repository.created_at.as_deref(),)?;
            if let Some(date,) = created {
                creations.insert(date, repository.name.as_str(),);
                events.push(Event::creation(date, repository.name.as_str(),),);
            }

            if repository.stargazers_count == 0 {
                continue;
            }

            pb.set_message(format!("Collecting stars of {}...", repository.name),);
            let real_dates = match login {
                Some(login,) => {
                    collect_star_dates(self.source, login, &repository.name, self.settings,).await?
                }
                None => Vec::new(),
            };

            let fallback = match created {
                Some(date,) => date,
                None => optional_date(repository.updated_at.as_deref(),)?.unwrap_or(today,),
            };
            if (real_dates.len() as u64) < repository.stargazers_count {
                debug!(
                    "Backfilling {} stars of {} at {}",
                    repository.stargazers_count - real_dates.len() as u64,
                    repository.name,
                    fallback
                );
            }
            events.extend(history::backfill(
                &repository.name,
                repository.stargazers_count,
                &real_dates,
                fallback,
            ),);
        }

        Ok((events, creations,),)
    }
}

fn spinner() -> ProgressBar
{
    let pb = ProgressBar::new_spinner();
    if let Ok(style,) =
        ProgressStyle::default_spinner().template("{spinner:.yellow} [{elapsed_precise}] {msg}",)
    {
        pb.set_style(style,);
    }
    pb
}

fn optional_date(raw: Option<&str,>,) -> Result<Option<NaiveDate,>, Error,>
{
    raw.map(history::parse_event_date,).transpose()
}

/// Lists repositories owned by `login` page by page.
///
/// Stops at the first empty or short page, or after
/// [`Settings::max_repository_pages`] pages.
///
/// # Errors
///
/// Propagates the first failed page; partial listings are discarded so the
/// cache is never refreshed with an incomplete list.
pub async fn fetch_repositories<S: ProfileSource,>(
    source: &S,
    login: &Login,
    settings: &Settings,
) -> Result<Vec<Repository,>, Error,>
{
    let mut repositories = Vec::new();
    for page in 1..=settings.max_repository_pages {
        let batch = source.repositories_page(login, page, settings.per_page,).await?;
        let received = batch.len();
        repositories.extend(batch,);
        if received < usize::from(settings.per_page,) {
            break;
        }
    }
    Ok(repositories,)
}

/// Gathers up to [`Settings::max_stars_per_repository`] star dates.
///
/// A failed page ends collection and keeps what was gathered so far.
///
/// # Errors
///
/// Returns [`Error::MalformedTimestamp`] when a `starred_at` value cannot be
/// parsed.
pub async fn collect_star_dates<S: ProfileSource,>(
    source: &S,
    login: &Login,
    repository: &str,
    settings: &Settings,
) -> Result<Vec<NaiveDate,>, Error,>
{
    let mut dates = Vec::new();
    let mut page = 1;

    while dates.len() < settings.max_stars_per_repository {
        let batch = match source.stargazers_page(login, repository, page, settings.per_page,).await {
            Ok(batch,) => batch,
            Err(error,) => {
                warn!(
                    "Stargazer page {} of {} failed, keeping {} dates: {}",
                    page,
                    repository,
                    dates.len(),
                    error
                );
                break;
            }
        };

        let received = batch.len();
        for raw in &batch {
            dates.push(history::parse_event_date(raw,)?,);
        }
        if received < usize::from(settings.per_page,) {
            break;
        }
        page += 1;
    }

    dates.truncate(settings.max_stars_per_repository,);
    Ok(dates,)
}
