// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Local copy of the last successful repository listing.
///
/// The file holds a JSON array of repository records using GitHub REST field
/// names, so a payload saved by hand from the API works as well.
use std::{fs, path::Path};

use tracing::debug;

use crate::{
    error::{self, Error},
    model::Repository,
};

/// Reads cached repositories from `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and
/// [`Error::Serialize`] when it is not a JSON array of repositories.
pub fn load(path: &Path) -> Result<Vec<Repository>, Error> {
    debug!("Loading repository cache from {}", path.display());
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Replaces the cache at `path` with `repositories`.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when encoding fails and [`Error::Io`] when the
/// file cannot be written. Callers treat both as non-fatal.
pub fn store(path: &Path, repositories: &[Repository]) -> Result<(), Error> {
    let encoded = serde_json::to_string_pretty(repositories)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|source| error::io_error(parent, source))?;
    }
    fs::write(path, encoded).map_err(|source| error::io_error(path, source))?;
    debug!("Stored {} repositories in {}", repositories.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn repository(name: &str, stars: u64) -> Repository {
        Repository {
            name:             name.to_owned(),
            html_url:         format!("https://github.com/octocat/{name}"),
            description:      Some("demo | with pipe".to_owned()),
            stargazers_count: stars,
            language:         None,
            created_at:       Some("2024-01-03T10:00:00Z".to_owned()),
            updated_at:       None,
            fork:             false
        }
    }

    #[test]
    fn stored_cache_loads_back() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("nested").join("repos_cache.json");
        let repositories = vec![repository("alpha", 3), repository("beta", 0)];

        store(&path, &repositories).expect("store should succeed");
        let loaded = load(&path).expect("load should succeed");

        assert_eq!(loaded, repositories);
    }

    #[test]
    fn missing_cache_is_io_error() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let error = load(&dir.path().join("absent.json")).expect_err("expected failure");
        assert!(matches!(error, Error::Io { .. }));
    }

    #[test]
    fn corrupt_cache_is_serialize_error() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("repos_cache.json");
        fs::write(&path, "{not json").expect("failed to write fixture");

        let error = load(&path).expect_err("expected failure");
        assert!(matches!(error, Error::Serialize { .. }));
    }

    #[test]
    fn accepts_raw_api_payload() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("repos_cache.json");
        fs::write(
            &path,
            r#"[{"id": 7, "name": "raw", "stargazers_count": 2, "owner": {"login": "octocat"}}]"#
        )
        .expect("failed to write fixture");

        let loaded = load(&path).expect("load should succeed");
        assert_eq!(loaded[0].name, "raw");
        assert_eq!(loaded[0].stargazers_count, 2);
    }
}
