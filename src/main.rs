//! Command-line interface for the profile README generator.
//!
//! A run collects profile data, writes the star history chart when enough
//! history exists and regenerates the README. Remote failures degrade to
//! cached or placeholder data; only failing to write an output is fatal.

use std::{
    io,
    path::{Component, Path, PathBuf},
    process,
};

use chrono::Utc;
use clap::{ArgAction, Parser};
use profile_readme::{
    Canvas, Collector, Error, GithubSource, MockSource, Personalization, ProfileSnapshot,
    ProfileSource, ReadmeInput, Settings, layout, render_readme, render_svg, write_chart,
    write_document,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command line interface for generating a profile README.
#[derive(Debug, Parser,)]
#[command(
    name = "profile-readme",
    version,
    about = "Generate a GitHub profile README with a star growth chart"
)]
struct Cli
{
    /// GitHub login the document is generated for.
    #[arg(value_name = "LOGIN", env = "GITHUB_REPOSITORY_OWNER", default_value = "tobylaifun")]
    login: String,

    /// Use deterministic sample data instead of the GitHub API.
    #[arg(long = "mock", env = "USE_MOCK", action = ArgAction::SetTrue)]
    mock: bool,

    /// Path of the generated README.
    #[arg(long = "output", value_name = "PATH", default_value = "README.md")]
    output: PathBuf,

    /// Directory receiving the star history chart.
    #[arg(long = "chart-dir", value_name = "DIR", default_value = ".")]
    chart_dir: PathBuf,

    /// Repository listing cache used when the API is unavailable.
    #[arg(long = "cache", value_name = "PATH", default_value = "repos_cache.json")]
    cache: PathBuf,

    /// Optional personalization YAML document.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// API token; anonymous requests are used when absent.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String,>,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main(flavor = "current_thread")]
async fn main()
{
    init_tracing();
    let cli = Cli::parse();
    if let Err(error,) = run(cli,).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    let _ = tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).try_init();
}

/// Executes one generation run.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::Parse`] when an explicitly supplied
/// configuration cannot be loaded and [`Error::ArtifactIo`] when an output
/// cannot be written.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    let personalization = match cli.config.as_deref() {
        Some(path,) => Personalization::load(path,)?,
        None => Personalization::default(),
    };
    let settings = Settings::default();
    let now = Utc::now();
    info!("Generating README for: {}", cli.login);

    let snapshot = if cli.mock {
        info!("Using mock data");
        let source = MockSource::sample(&cli.login,);
        collect(&source, &cli, &settings, &personalization, None,).await
    } else {
        match GithubSource::new(cli.token.clone(), settings.request_timeout,) {
            Ok(source,) => {
                collect(&source, &cli, &settings, &personalization, Some(cli.cache.as_path(),),).await
            }
            Err(error,) => {
                error!("{}; continuing without remote data", error);
                let source = MockSource::default();
                collect(&source, &cli, &settings, &personalization, Some(cli.cache.as_path(),),).await
            }
        }
    };

    let chart_file = match snapshot.history.as_ref() {
        Some(history,) if history.series.is_chartable() => {
            let chart = layout(&history.series, &history.creations, &Canvas::default(),);
            let svg = render_svg(&chart, history.creations.repository_count(), now.date_naive(),);
            let path = write_chart(&cli.chart_dir, &svg, now.naive_utc(),)?;
            Some(chart_reference(&cli.output, &path,),)
        }
        Some(_,) => {
            info!("Not enough star history for a chart");
            None
        }
        None => {
            warn!("Chart skipped for this run");
            None
        }
    };

    let extras = personalization.lookup(&cli.login,);
    let readme = render_readme(&ReadmeInput {
        snapshot: &snapshot,
        extras,
        chart_file: chart_file.as_deref(),
        description_limit: settings.description_limit,
        top_repositories: settings.top_repositories,
        generated: now,
    },);
    write_document(&cli.output, &readme,)?;
    info!("README generated successfully ({} characters)", readme.chars().count());

    Ok((),)
}

async fn collect<S: ProfileSource,>(
    source: &S,
    cli: &Cli,
    settings: &Settings,
    personalization: &Personalization,
    cache: Option<&Path,>,
) -> ProfileSnapshot
{
    Collector::new(source, settings, personalization, cache,)
        .collect(&cli.login, Utc::now().date_naive(),)
        .await
}

/// Chart path as referenced from the README location.
fn chart_reference(output: &Path, chart: &Path,) -> String
{
    let base = output.parent().unwrap_or_else(|| Path::new("",),);
    let relative = chart.strip_prefix(base,).unwrap_or(chart,);
    relative
        .components()
        .filter(|component| !matches!(component, Component::CurDir),)
        .collect::<PathBuf>()
        .to_string_lossy()
        .replace('\\', "/",)
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn cli_in(dir: &Path, login: &str,) -> Cli
    {
        Cli {
            login:     login.to_owned(),
            mock:      true,
            output:    dir.join("README.md",),
            chart_dir: dir.to_path_buf(),
            cache:     dir.join("repos_cache.json",),
            config:    None,
            token:     None,
        }
    }

    #[test]
    fn parses_login_and_flags()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "octocat",
            "--mock",
            "--output",
            "out/README.md",
            "--chart-dir",
            "out",
            "--config",
            "profile.yaml",
        ],)
        .expect("expected CLI to parse",);

        assert_eq!(cli.login, "octocat");
        assert!(cli.mock);
        assert_eq!(cli.output, PathBuf::from("out/README.md"));
        assert_eq!(cli.chart_dir, PathBuf::from("out"));
        assert_eq!(cli.config, Some(PathBuf::from("profile.yaml")));
    }

    #[test]
    fn output_paths_have_defaults()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "octocat",],)
            .expect("expected CLI to parse",);

        assert_eq!(cli.output, PathBuf::from("README.md"));
        assert_eq!(cli.chart_dir, PathBuf::from("."));
        assert_eq!(cli.cache, PathBuf::from("repos_cache.json"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn rejects_unknown_flags()
    {
        assert!(Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--unknown"]).is_err());
    }

    #[test]
    fn chart_reference_is_relative_to_document()
    {
        assert_eq!(
            chart_reference(Path::new("README.md"), Path::new("./star-history-1.svg")),
            "star-history-1.svg"
        );
        assert_eq!(
            chart_reference(Path::new("docs/README.md"), Path::new("docs/star-history-1.svg")),
            "star-history-1.svg"
        );
        assert_eq!(
            chart_reference(Path::new("README.md"), Path::new("charts/star-history-1.svg")),
            "charts/star-history-1.svg"
        );
    }

    #[tokio::test]
    async fn mock_run_writes_document_and_chart()
    {
        let dir = tempdir().expect("failed to create temp dir",);

        run(cli_in(dir.path(), "tobylaifun",),).await.expect("run should succeed",);

        let readme = fs::read_to_string(dir.path().join("README.md"),).expect("README written",);
        assert!(readme.contains("(@tobylaifun)"));
        assert!(readme.contains("![Star History Chart](star-history-"));

        let charts: Vec<_,> = fs::read_dir(dir.path(),)
            .expect("readable dir",)
            .flatten()
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("star-history-"),)
            .collect();
        assert_eq!(charts.len(), 1);
        assert!(!dir.path().join("repos_cache.json").exists(), "mock runs leave the cache alone");
    }

    #[tokio::test]
    async fn missing_explicit_config_is_fatal()
    {
        let dir = tempdir().expect("failed to create temp dir",);
        let mut cli = cli_in(dir.path(), "tobylaifun",);
        cli.config = Some(dir.path().join("absent.yaml",),);

        let error = run(cli,).await.expect_err("expected failure",);
        assert!(matches!(error, Error::Io { .. }));
        assert!(!dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn unwritable_output_is_fatal()
    {
        let dir = tempdir().expect("failed to create temp dir",);
        let blocker = dir.path().join("blocker",);
        fs::write(&blocker, "file",).expect("failed to write fixture",);
        let mut cli = cli_in(dir.path(), "tobylaifun",);
        cli.output = blocker.join("README.md",);

        let error = run(cli,).await.expect_err("expected failure",);
        assert!(matches!(error, Error::ArtifactIo { .. }));
    }
}
