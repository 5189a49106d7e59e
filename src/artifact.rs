// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Writes the generated document and chart to disk.
///
/// Chart files carry a timestamp in their name so image caches pick up new
/// versions; older charts in the same directory are pruned after each write.
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::error::{self, Error};

const CHART_PREFIX: &str = "star-history-";
const CHART_SUFFIX: &str = ".svg";

/// File name of the chart generated at `generated`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use profile_readme::chart_file_name;
///
/// let at = NaiveDate::from_ymd_opt(2026, 2, 8,).and_then(|d| d.and_hms_opt(9, 5, 1,),).unwrap();
/// assert_eq!(chart_file_name(at,), "star-history-20260208090501.svg");
/// ```
pub fn chart_file_name(generated: NaiveDateTime,) -> String
{
    format!("{CHART_PREFIX}{}{CHART_SUFFIX}", generated.format("%Y%m%d%H%M%S",))
}

/// Writes `svg` into `directory` and prunes older charts.
///
/// # Errors
///
/// Returns [`Error::ArtifactIo`] when the directory or the file cannot be
/// written. Failing to delete an old chart is only logged.
pub fn write_chart(directory: &Path, svg: &str, generated: NaiveDateTime,) -> Result<PathBuf, Error,>
{
    fs::create_dir_all(directory,).map_err(|source| error::artifact_io_error(directory, source,),)?;
    let path = directory.join(chart_file_name(generated,),);
    write_file(&path, svg,)?;
    info!("Star history chart written to {}", path.display());

    let removed = prune_charts(directory,)?;
    if !removed.is_empty() {
        info!("Removed {} outdated chart(s)", removed.len());
    }
    Ok(path,)
}

/// Deletes every `star-history-*.svg` in `directory` except the newest.
///
/// Names embed a sortable timestamp, so the newest file sorts last.
///
/// # Errors
///
/// Returns [`Error::ArtifactIo`] when the directory cannot be listed.
pub fn prune_charts(directory: &Path,) -> Result<Vec<PathBuf,>, Error,>
{
    let entries =
        fs::read_dir(directory,).map_err(|source| error::artifact_io_error(directory, source,),)?;

    let mut charts: Vec<PathBuf,> = entries
        .flatten()
        .map(|entry| entry.path(),)
        .filter(|path| path.is_file() && is_chart_name(path,),)
        .collect();
    charts.sort();
    charts.pop();

    let mut removed = Vec::with_capacity(charts.len(),);
    for chart in charts {
        match fs::remove_file(&chart,) {
            Ok(()) => {
                debug!("Removed old chart {}", chart.display());
                removed.push(chart,);
            }
            Err(e,) => warn!("Could not remove {}: {e}", chart.display()),
        }
    }
    Ok(removed,)
}

fn is_chart_name(path: &Path,) -> bool
{
    path.file_name()
        .and_then(|name| name.to_str(),)
        .is_some_and(|name| name.starts_with(CHART_PREFIX,) && name.ends_with(CHART_SUFFIX,),)
}

/// Writes the rendered document to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`Error::ArtifactIo`] when the file cannot be written.
pub fn write_document(path: &Path, contents: &str,) -> Result<(), Error,>
{
    if let Some(parent,) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent,).map_err(|source| error::artifact_io_error(parent, source,),)?;
    }
    write_file(path, contents,)?;
    info!("Document written to {}", path.display());
    Ok((),)
}

fn write_file(path: &Path, contents: &str,) -> Result<(), Error,>
{
    let file = File::create(path,).map_err(|source| error::artifact_io_error(path, source,),)?;
    let mut writer = BufWriter::new(file,);
    writer
        .write_all(contents.as_bytes(),)
        .map_err(|source| error::artifact_io_error(path, source,),)?;
    writer.flush().map_err(|source| error::artifact_io_error(path, source,),)
}
