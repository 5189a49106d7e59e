// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Ordering of repositories for the recommended projects table.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::Repository;

/// Repository annotated with its pin status and ordering score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct RankedRepository
{
    pub repository:    Repository,
    pub pinned:        bool,
    /// Star count plus the pin bonus for pinned repositories. Only used for
    /// ordering.
    pub ranking_score: u64,
}

impl RankedRepository
{
    /// Star count shown to readers, never inflated by the pin bonus.
    pub fn stars(&self,) -> u64
    {
        self.repository.stargazers_count
    }
}

/// Scores and sorts `repositories` descending by score.
///
/// The sort is stable, so equal scores keep the listing order.
///
/// # Examples
///
/// ```
/// use profile_readme::{Repository, rank};
///
/// let repo = |name: &str, stars| Repository {
///     name: name.to_owned(),
///     html_url: String::new(),
///     description: None,
///     stargazers_count: stars,
///     language: None,
///     created_at: None,
///     updated_at: None,
///     fork: false,
/// };
/// let ranked = rank(vec![repo("a", 3), repo("b", 0)], &["b".to_owned()], 6);
/// assert_eq!(ranked[0].repository.name, "b");
/// assert_eq!(ranked[0].stars(), 0);
/// ```
pub fn rank(repositories: Vec<Repository,>, pinned: &[String], pin_bonus: u64,) -> Vec<RankedRepository,>
{
    let pinned: BTreeSet<&str,> = pinned.iter().map(String::as_str,).collect();
    let mut ranked: Vec<RankedRepository,> = repositories
        .into_iter()
        .map(|repository| {
            let is_pinned = pinned.contains(repository.name.as_str(),);
            let bonus = if is_pinned { pin_bonus } else { 0 };
            RankedRepository {
                ranking_score: repository.stargazers_count.saturating_add(bonus,),
                pinned: is_pinned,
                repository,
            }
        },)
        .collect();

    ranked.sort_by(|a, b| b.ranking_score.cmp(&a.ranking_score,),);
    ranked
}

/// Leading entries with stars or a pin, at most `limit`.
pub fn top(ranked: &[RankedRepository], limit: usize,) -> Vec<&RankedRepository,>
{
    ranked
        .iter()
        .filter(|entry| entry.stars() > 0 || entry.pinned,)
        .take(limit,)
        .collect()
}

/// Sum of displayed star counts.
pub fn total_stars(ranked: &[RankedRepository],) -> u64
{
    ranked.iter().map(RankedRepository::stars,).sum()
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::*;

    fn repository(name: &str, stars: u64,) -> Repository
    {
        Repository {
            name:             name.to_owned(),
            html_url:         format!("https://github.com/octocat/{name}"),
            description:      None,
            stargazers_count: stars,
            language:         None,
            created_at:       None,
            updated_at:       None,
            fork:             false,
        }
    }

    #[test]
    fn pinned_repository_outranks_slightly_more_starred_one()
    {
        let ranked = rank(
            vec![repository("popular", 5,), repository("pinned", 0,)],
            &["pinned".to_owned()],
            6,
        );

        assert_eq!(ranked[0].repository.name, "pinned");
        assert_eq!(ranked[0].ranking_score, 6);
        assert_eq!(ranked[0].stars(), 0);
        assert_eq!(ranked[1].repository.name, "popular");
    }

    #[test]
    fn pin_bonus_does_not_beat_large_gap()
    {
        let ranked =
            rank(vec![repository("pinned", 1,), repository("huge", 50,)], &["pinned".to_owned()], 6,);
        assert_eq!(ranked[0].repository.name, "huge");
    }

    #[test]
    fn equal_scores_keep_listing_order()
    {
        let ranked = rank(
            vec![repository("first", 2,), repository("second", 2,), repository("third", 2,)],
            &[],
            6,
        );
        let names: Vec<&str,> = ranked.iter().map(|r| r.repository.name.as_str(),).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn top_skips_unstarred_unpinned_and_limits()
    {
        let mut repositories: Vec<Repository,> =
            (0..15).map(|i| repository(&format!("repo-{i}"), 15 - i,),).collect();
        repositories.push(repository("zero", 0,),);
        repositories.push(repository("pinned-zero", 0,),);

        let ranked = rank(repositories, &["pinned-zero".to_owned()], 6,);
        let listed = top(&ranked, 10,);

        assert_eq!(listed.len(), 10);
        assert!(listed.iter().all(|entry| entry.repository.name != "zero"));

        let ranked = rank(vec![repository("zero", 0,), repository("pinned-zero", 0,)], &[
            "pinned-zero".to_owned(),
        ], 6,);
        let listed = top(&ranked, 10,);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].repository.name, "pinned-zero");
    }

    #[test]
    fn total_ignores_bonus()
    {
        let ranked =
            rank(vec![repository("a", 3,), repository("b", 4,)], &["a".to_owned(), "b".to_owned()], 6,);
        assert_eq!(total_stars(&ranked), 7);
    }

    proptest! {
        #[test]
        fn ranking_is_sorted_and_preserves_stars(
            stars in proptest::collection::vec(0u64..1000, 0..40),
            pin_mask in proptest::collection::vec(any::<bool>(), 40),
        ) {
            let repositories: Vec<Repository> = stars
                .iter()
                .enumerate()
                .map(|(i, s)| repository(&format!("r{i}"), *s))
                .collect();
            let pinned: Vec<String> = (0..stars.len())
                .filter(|i| pin_mask[*i])
                .map(|i| format!("r{i}"))
                .collect();

            let ranked = rank(repositories, &pinned, 6);

            prop_assert!(ranked.windows(2).all(|w| w[0].ranking_score >= w[1].ranking_score));
            prop_assert_eq!(total_stars(&ranked), stars.iter().sum::<u64>());
            for entry in &ranked {
                let bonus = if entry.pinned { 6 } else { 0 };
                prop_assert_eq!(entry.ranking_score, entry.stars() + bonus);
            }
        }
    }
}
