// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Renders the bilingual profile README.
///
/// The document is assembled from a [`ProfileSnapshot`] plus the optional
/// personalization record of the account:
/// - header with badge row
/// - bio, statistics and recommended projects
/// - preferences, links, analytics and footer
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    config::{Badge, ProfileExtras},
    history::summarize,
    pipeline::ProfileSnapshot,
    ranking::{self, RankedRepository},
};

const DEFAULT_BIO: &str =
    "💻 Full-stack developer passionate about open source and creative coding.";

/// Everything the README renderer reads.
#[derive(Debug, Clone)]
pub struct ReadmeInput<'a> {
    pub snapshot:          &'a ProfileSnapshot,
    /// Personalization record matched for the login, if any.
    pub extras:            Option<&'a ProfileExtras>,
    /// File name of the chart written for this run.
    pub chart_file:        Option<&'a str>,
    pub description_limit: usize,
    pub top_repositories:  usize,
    pub generated:         DateTime<Utc>,
}

/// Renders the complete Markdown document.
pub fn render_readme(input: &ReadmeInput<'_>) -> String {
    let profile = &input.snapshot.profile;
    let login = profile.login.as_str();
    debug!("Rendering README for {}", login);

    let mut readme = String::with_capacity(8192);
    push_header(&mut readme, input);
    push_bio(&mut readme, input);
    push_statistics(&mut readme, input);

    let top = ranking::top(&input.snapshot.ranked, input.top_repositories);
    if !top.is_empty() {
        push_projects(&mut readme, &top, input.description_limit);
    }

    if let Some(preferences) = input.extras.and_then(|extras| extras.preferences.as_ref()) {
        readme.push_str("## ❤️ What I Like / 偏好\n\n");
        for badge in &preferences.badges {
            readme.push_str(&markdown_badge(badge));
            readme.push('\n');
        }
        if let Some(summary) = preferences.summary.as_deref() {
            let _ = write!(readme, "\n{}\n", summary.trim());
        }
        readme.push_str("\n---\n\n");
    }

    push_links(&mut readme, input);
    push_analytics(&mut readme, input);

    let _ = write!(
        readme,
        "---\n\n_Thanks for visiting! Feel free to explore my projects and reach out for collaboration or discussion._  \n_感谢访问！欢迎探索我的项目，也期待与你交流合作。_\n\n---\n\n<sub>Last updated: {} | Auto-generated by {}</sub>\n",
        input.generated.format("%Y-%m-%d %H:%M:%S UTC"),
        env!("CARGO_PKG_NAME"),
    );

    readme
}

fn push_header(readme: &mut String, input: &ReadmeInput<'_>) {
    let profile = &input.snapshot.profile;
    let login = escape_html(&profile.login);
    let name = escape_html(&header_name(input));
    let account = urlencoding::encode(&profile.login);

    let _ = write!(
        readme,
        "# 👋 Hi, I'm {name} (@{login})\n# 👋 嗨，我是 {name} (@{login})\n\n<p align=\"center\">\n"
    );
    push_html_badge(
        readme,
        &format!("https://github.com/{account}"),
        &format!("https://img.shields.io/github/followers/{account}?label=Followers&style=social"),
        "GitHub Followers",
    );

    let extra_badges = input
        .extras
        .map(|extras| extras.extra_badges.as_slice())
        .unwrap_or_default();
    let (leading, trailing) = extra_badges.split_at(extra_badges.len().min(1));
    for badge in leading {
        push_configured_badge(readme, badge);
    }

    if let Some(blog) = blog_url(profile.blog.as_deref()) {
        push_html_badge(
            readme,
            &blog,
            &format!(
                "https://img.shields.io/badge/blog-{}-orange?logo=google-chrome",
                shields_text(strip_scheme(&blog))
            ),
            "Blog",
        );
    }

    for badge in trailing {
        push_configured_badge(readme, badge);
    }
    readme.push_str("</p>\n\n---\n\n");
}

fn push_bio(readme: &mut String, input: &ReadmeInput<'_>) {
    let bio = input
        .snapshot
        .profile
        .bio
        .as_deref()
        .map(str::trim)
        .filter(|bio| !bio.is_empty())
        .unwrap_or(DEFAULT_BIO);
    let _ = write!(readme, "{bio}\n\n");

    if let Some(extra) = input.extras.and_then(|extras| extras.extra_bio.as_deref()) {
        let _ = write!(readme, "{}\n\n", extra.trim_end());
    }
}

fn push_statistics(readme: &mut String, input: &ReadmeInput<'_>) {
    let profile = &input.snapshot.profile;
    let _ = write!(
        readme,
        "## 📈 GitHub Statistics / GitHub 统计\n\n<div align=\"center\">\n\n| 📊 统计项 | 📈 数值 |\n|:---:|:---:|\n| 🏆 **Total Stars / 总星标数** | **⭐ {}** |\n| 📦 **Public Repositories / 公开仓库** | **{}** |\n| 👥 **Followers / 关注者** | **{}** |\n\n</div>\n\n---\n\n",
        input.snapshot.total_stars(),
        profile.public_repos,
        profile.followers,
    );
}

fn push_projects(readme: &mut String, top: &[&RankedRepository], description_limit: usize) {
    readme.push_str(
        "## ⭐ 推荐项目 / Recommended Projects\n\n| Repository | Description | Stars | Language | Updated |\n| ---------- | ----------- | ----- | -------- | ------- |\n",
    );
    for entry in top {
        let repository = &entry.repository;
        let description = repository
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .map(|description| truncate(description, description_limit))
            .unwrap_or_else(|| "No description".to_owned());
        let language = repository.language.as_deref().unwrap_or("N/A");
        let updated = repository
            .updated_at
            .as_deref()
            .map(|updated| updated.chars().take(10).collect::<String>())
            .unwrap_or_default();

        let _ = writeln!(
            readme,
            "| [{}]({}) | {} | ⭐ {} | {} | {} |",
            table_cell(&repository.name),
            repository.html_url,
            table_cell(&description),
            entry.stars(),
            table_cell(language),
            table_cell(&updated),
        );
    }
    readme.push_str("\n---\n\n");
}

fn push_links(readme: &mut String, input: &ReadmeInput<'_>) {
    readme.push_str("## 📫 Links & Contact / 联系\n\n");
    if let Some(blog) = blog_url(input.snapshot.profile.blog.as_deref()) {
        let _ = writeln!(readme, "- 📝 [Blog {}]({blog})", strip_scheme(&blog));
    }
    for link in input.extras.map(|extras| extras.extra_links.as_slice()).unwrap_or_default() {
        let _ = writeln!(readme, "- 🔗 [{}]({})  ", link.title, link.url);
    }
    readme.push_str("\n---\n\n");
}

fn push_analytics(readme: &mut String, input: &ReadmeInput<'_>) {
    let account = urlencoding::encode(&input.snapshot.profile.login);
    let _ = write!(
        readme,
        "## 📊 GitHub Stats & Analytics / GitHub 数据分析\n\n<div align=\"center\">\n\n### 📈 GitHub Contribution Graph / GitHub 贡献图\n![](https://ghchart.rshah.org/{account})\n\n"
    );

    let chart = input.chart_file.zip(input.snapshot.history.as_ref());
    if let Some((chart_file, history)) = chart
        && history.series.is_chartable()
        && let Some(summary) = summarize(&history.series)
    {
        let _ = write!(
            readme,
            "### ⭐ Total Stars Growth Trend / 总星标增长趋势\n\n![Star History Chart]({chart_file})\n\n**Summary / 摘要:**\n- 📅 From {} to {} ({} days)\n- 📈 Growth: {} → {} stars (+{})\n- 💫 Average: ~{:.2} stars/day\n- 🎯 Repositories created during this period: {}\n\n*Chart shows cumulative stars over time. 🔴 Red dots mark repository creation dates.*\n\n",
            summary.first.date,
            summary.last.date,
            summary.days_span,
            summary.first.total,
            summary.last.total,
            summary.growth,
            summary.average_daily,
            history.creations.repository_count(),
        );
    }

    let _ = write!(
        readme,
        "### 📊 GitHub Profile Views / 访问统计\n![](https://komarev.com/ghpvc/?username={account}&color=brightgreen&style=flat-square&label=Profile+Views)\n\n</div>\n\n"
    );
}

fn header_name(input: &ReadmeInput<'_>) -> String {
    let profile = &input.snapshot.profile;
    let live = profile
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let configured = input
        .extras
        .and_then(|extras| extras.display_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty());
    live.or(configured).unwrap_or(profile.display_name()).to_owned()
}

fn push_html_badge(readme: &mut String, href: &str, image: &str, alt: &str) {
    let _ = write!(
        readme,
        "  <a href=\"{}\">\n    <img src=\"{}\" alt=\"{}\" />\n  </a>\n",
        escape_html(href),
        escape_html(image),
        escape_html(alt),
    );
}

fn push_configured_badge(readme: &mut String, badge: &Badge) {
    match badge.link.as_deref() {
        Some(link) => push_html_badge(readme, link, &badge.image, &badge.alt),
        None => {
            let _ = writeln!(
                readme,
                "  <img src=\"{}\" alt=\"{}\" />",
                escape_html(&badge.image),
                escape_html(&badge.alt),
            );
        }
    }
}

fn markdown_badge(badge: &Badge) -> String {
    let image = format!("![{}]({})", badge.alt.replace(']', "\\]"), badge.image);
    match badge.link.as_deref() {
        Some(link) => format!("[{image}]({link})"),
        None => image,
    }
}

/// Normalizes the profile blog field into an absolute http(s) URL.
fn blog_url(blog: Option<&str>) -> Option<String> {
    let blog = blog.map(str::trim).filter(|blog| !blog.is_empty())?;
    if blog.contains(char::is_whitespace) {
        return None;
    }
    if blog.starts_with("https://") || blog.starts_with("http://") {
        Some(blog.to_owned())
    } else if blog.contains(':') {
        None
    } else {
        Some(format!("https://{blog}"))
    }
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Escapes text for a shields.io static badge path segment.
fn shields_text(text: &str) -> String {
    urlencoding::encode(&text.replace('-', "--").replace('_', "__")).into_owned()
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let mut truncated: String = text.chars().take(limit).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_owned()
    }
}

fn table_cell(text: &str) -> String {
    text.replace(['\r', '\n'], " ").replace('|', "\\|")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::{
        config::Personalization,
        history::{CreationIndex, Event, aggregate},
        model::{Repository, UserProfile},
        pipeline::{ListingOrigin, StarHistory},
        ranking::rank
    };

    fn repository(name: &str, stars: u64, description: Option<&str>) -> Repository {
        Repository {
            name:             name.to_owned(),
            html_url:         format!("https://github.com/tobylaifun/{name}"),
            description:      description.map(str::to_owned),
            stargazers_count: stars,
            language:         None,
            created_at:       Some("2024-01-03T10:00:00Z".to_owned()),
            updated_at:       Some("2026-02-07T12:00:00Z".to_owned()),
            fork:             false
        }
    }

    fn history() -> StarHistory {
        let day = |value: &str| NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date");
        let mut creations = CreationIndex::new();
        creations.insert(day("2024-01-03"), "tobylaifun");
        let events = vec![
            Event::star(day("2024-01-03"), "tobylaifun"),
            Event::star(day("2024-01-12"), "tobylaifun"),
        ];
        StarHistory {
            series: aggregate(&events, &creations),
            creations
        }
    }

    fn snapshot(repositories: Vec<Repository>, history: Option<StarHistory>) -> ProfileSnapshot {
        let mut profile = UserProfile::placeholder("tobylaifun");
        profile.public_repos = 19;
        profile.followers = 59;
        profile.blog = Some("tobylai.fun".to_owned());
        ProfileSnapshot {
            profile,
            ranked: rank(repositories, &[], 6),
            pinned: Vec::new(),
            origin: ListingOrigin::Live,
            history
        }
    }

    fn input<'a>(
        snapshot: &'a ProfileSnapshot,
        extras: Option<&'a ProfileExtras>,
        chart_file: Option<&'a str>
    ) -> ReadmeInput<'a> {
        ReadmeInput {
            snapshot,
            extras,
            chart_file,
            description_limit: 80,
            top_repositories: 10,
            generated: Utc
                .with_ymd_and_hms(2026, 2, 8, 9, 30, 0)
                .single()
                .expect("valid timestamp")
        }
    }

    #[test]
    fn renders_every_section() {
        let snapshot = snapshot(
            vec![repository("tobylaifun", 2, Some("Profile | README"))],
            Some(history())
        );
        let readme = render_readme(&input(&snapshot, None, Some("star-history-20260208093000.svg")));

        assert!(readme.starts_with("# 👋 Hi, I'm tobylaifun (@tobylaifun)\n"));
        assert!(readme.contains("followers/tobylaifun?label=Followers"));
        assert!(readme.contains("<a href=\"https://tobylai.fun\">"));
        assert!(readme.contains(DEFAULT_BIO));
        assert!(readme.contains("**⭐ 2**"));
        assert!(readme.contains("| **19** |"));
        assert!(readme.contains("Profile \\| README"));
        assert!(readme.contains("| 2026-02-07 |"));
        assert!(readme.contains("- 📝 [Blog tobylai.fun](https://tobylai.fun)"));
        assert!(readme.contains("![Star History Chart](star-history-20260208093000.svg)"));
        assert!(readme.contains("From 2024-01-03 to 2024-01-12 (10 days)"));
        assert!(readme.contains("Growth: 1 → 2 stars (+1)"));
        assert!(readme.contains("~0.10 stars/day"));
        assert!(readme.contains("Repositories created during this period: 1"));
        assert!(readme.contains("Last updated: 2026-02-08 09:30:00 UTC"));
        assert!(!readme.contains("What I Like"));
    }

    #[test]
    fn missing_chart_omits_summary() {
        let snapshot = snapshot(vec![repository("a", 1, None)], Some(history()));
        let readme = render_readme(&input(&snapshot, None, None));
        assert!(!readme.contains("Star History Chart"));
        assert!(readme.contains("Profile Views"));
    }

    #[test]
    fn projects_table_defaults_and_truncation() {
        let long = "x".repeat(100);
        let snapshot = snapshot(
            vec![
                repository("long", 3, Some(&long)),
                repository("bare", 1, None),
                repository("hidden", 0, Some("no stars"))
            ],
            None
        );
        let readme = render_readme(&input(&snapshot, None, None));

        assert!(readme.contains(&format!("| {}... |", "x".repeat(80))));
        assert!(readme.contains("| No description | ⭐ 1 | N/A |"));
        assert!(!readme.contains("[hidden]"));
    }

    #[test]
    fn empty_listing_skips_projects_table() {
        let snapshot = snapshot(Vec::new(), None);
        let readme = render_readme(&input(&snapshot, None, None));
        assert!(!readme.contains("Recommended Projects"));
        assert!(readme.contains("**⭐ 0**"));
    }

    #[test]
    fn personalization_adds_badges_bio_links_and_preferences() {
        let config = Personalization::from_yaml(
            r#"
profiles:
  tobylaifun:
    display_name: Toby Lai
    extra_badges:
      - alt: Box3TRC Organization
        image: https://img.shields.io/badge/org-Box3TRC-blueviolet?logo=github
        link: https://github.com/Box3TRC
      - alt: dao3.fun
        image: https://img.shields.io/badge/dao3.fun-platform-1e90ff
        link: https://dao3.fun
    extra_bio: I love [dao3.fun](https://dao3.fun)!
    extra_links:
      - title: "@Box3TRC Organization"
        url: https://github.com/Box3TRC
    preferences:
      badges:
        - alt: Deno
          image: https://img.shields.io/badge/Deno-black?logo=deno
      summary: TypeScript and Python.
"#
        )
        .expect("valid document");
        let extras = config.lookup("tobylaifun");
        let snapshot = snapshot(vec![repository("a", 1, None)], None);
        let readme = render_readme(&input(&snapshot, extras, None));

        assert!(readme.starts_with("# 👋 Hi, I'm Toby Lai (@tobylaifun)"));
        let org = readme.find("Box3TRC Organization\"").expect("org badge");
        let blog = readme.find("alt=\"Blog\"").expect("blog badge");
        let dao = readme.find("alt=\"dao3.fun\"").expect("dao badge");
        assert!(org < blog && blog < dao);
        assert!(readme.contains("I love [dao3.fun](https://dao3.fun)!"));
        assert!(readme.contains("- 🔗 [@Box3TRC Organization](https://github.com/Box3TRC)"));
        assert!(readme.contains("## ❤️ What I Like / 偏好"));
        assert!(readme.contains("![Deno](https://img.shields.io/badge/Deno-black?logo=deno)"));
        assert!(readme.contains("TypeScript and Python."));
    }

    #[test]
    fn hostile_profile_text_is_escaped() {
        let mut snapshot = snapshot(Vec::new(), None);
        snapshot.profile.name = Some("<img onerror=x>".to_owned());
        snapshot.profile.blog = Some("javascript:alert(1)".to_owned());
        let readme = render_readme(&input(&snapshot, None, None));

        assert!(readme.contains("&lt;img onerror=x&gt;"));
        assert!(!readme.contains("javascript:"));
    }

    #[test]
    fn helpers_behave() {
        assert_eq!(truncate("héllo", 3), "hél...");
        assert_eq!(truncate("short", 80), "short");
        assert_eq!(table_cell("a|b\nc"), "a\\|b c");
        assert_eq!(shields_text("my-blog.dev"), "my--blog.dev");
        assert_eq!(shields_text("a b/c_d"), "a%20b%2Fc__d");
        assert_eq!(shields_text("日本"), "%E6%97%A5%E6%9C%AC");
        assert_eq!(blog_url(Some("https://x.dev")).as_deref(), Some("https://x.dev"));
        assert_eq!(blog_url(Some("x.dev")).as_deref(), Some("https://x.dev"));
        assert!(blog_url(Some("   ")).is_none());
        assert_eq!(escape_html("<a href='x'>"), "&lt;a href=&#x27;x&#x27;&gt;");
    }
}
