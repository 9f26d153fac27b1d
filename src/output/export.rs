//! CSV exports of discovered profiles.
//!
//! Three independent operations:
//!
//! - [`export_all`] - every extension of every profile in one file
//! - [`export_per_profile`] - one `extensions-{profile}.csv` per profile
//! - [`export_summary`] - one row per profile with extension counts
//!
//! Rendering is separated from writing so the exact bytes can be checked
//! without touching the filesystem.

use super::delimited::{Column, CsvWriter};
use crate::error::ExportError;
use crate::model::{ExtensionRecord, ProfileRecord};
use chrono::{DateTime, Local};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Profile column value for a record that was never stamped.
pub const UNKNOWN_PROFILE: &str = "Unknown";

/// Timestamp layout for install and modification dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Columns of the extension detail exports.
pub const DETAIL_COLUMNS: [Column; 13] = [
    Column::plain("Profile"),
    Column::plain("ExtensionID"),
    Column::quoted("DisplayName"),
    Column::plain("Publisher"),
    Column::plain("Version"),
    Column::quoted("Description"),
    Column::plain("Category"),
    Column::plain("Enabled"),
    Column::plain("BuiltIn"),
    Column::quoted("InstallDate"),
    Column::plain("Repository"),
    Column::plain("InstallCount"),
    Column::plain("Rating"),
];

/// Columns of the profile summary export.
pub const SUMMARY_COLUMNS: [Column; 6] = [
    Column::plain("Profile"),
    Column::plain("ExtensionCount"),
    Column::plain("BuiltInExtensions"),
    Column::plain("ThirdPartyExtensions"),
    Column::plain("Path"),
    Column::plain("LastModified"),
];

/// Characters replaced by `_` in per-profile file names.
///
/// The Windows set is used everywhere so names stay portable.
const INVALID_FILE_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Writes every profile's extensions to one file.
///
/// Rows are ordered by profile name, then publisher, then display name.
pub fn export_all(profiles: &[ProfileRecord], output: &Path) -> Result<(), ExportError> {
    let records = flatten_all(profiles);
    write_file(output, &render_extensions(&records))?;
    info!("Wrote {} extension(s) to {}", records.len(), output.display());
    Ok(())
}

/// Writes one file per profile into `output_dir` and returns their paths.
///
/// Profiles whose names map to the same file get a `-2`, `-3`, ... suffix
/// in input order, so no profile overwrites another.
pub fn export_per_profile(
    profiles: &[ProfileRecord],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(output_dir).map_err(|e| ExportError::io(output_dir, e))?;

    let mut written = Vec::with_capacity(profiles.len());
    let mut used = HashSet::new();
    for profile in profiles {
        let path = output_dir.join(unique_file_name(&profile.name, &mut used));
        write_file(&path, &render_profile(profile))?;
        info!(
            "Wrote {} extension(s) of profile {} to {}",
            profile.extensions.len(),
            profile.name,
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}

/// Writes one summary row per profile, ordered by profile name.
pub fn export_summary(profiles: &[ProfileRecord], output: &Path) -> Result<(), ExportError> {
    write_file(output, &render_summary(profiles))?;
    info!("Wrote summary of {} profile(s) to {}", profiles.len(), output.display());
    Ok(())
}

/// Stamped copies of all extensions, sorted for [`export_all`].
pub fn flatten_all(profiles: &[ProfileRecord]) -> Vec<ExtensionRecord> {
    let mut records: Vec<ExtensionRecord> =
        profiles.iter().flat_map(ProfileRecord::flattened).collect();
    records.sort_by(|a, b| {
        profile_label(a)
            .cmp(profile_label(b))
            .then_with(|| by_publisher_and_name(a, b))
    });
    records
}

/// Stamped copies of one profile's extensions, sorted for a per-profile file.
pub fn flatten_profile(profile: &ProfileRecord) -> Vec<ExtensionRecord> {
    let mut records = profile.flattened();
    records.sort_by(by_publisher_and_name);
    records
}

fn by_publisher_and_name(a: &ExtensionRecord, b: &ExtensionRecord) -> Ordering {
    a.publisher
        .cmp(&b.publisher)
        .then_with(|| a.display_name.cmp(&b.display_name))
}

fn profile_label(record: &ExtensionRecord) -> &str {
    record.profile_name.as_deref().unwrap_or(UNKNOWN_PROFILE)
}

/// Renders records in the given order, header first.
pub fn render_extensions(records: &[ExtensionRecord]) -> String {
    let mut writer = CsvWriter::new(&DETAIL_COLUMNS);
    for record in records {
        writer.write_row(&detail_row(record));
    }
    writer.finish()
}

pub fn render_all(profiles: &[ProfileRecord]) -> String {
    render_extensions(&flatten_all(profiles))
}

pub fn render_profile(profile: &ProfileRecord) -> String {
    render_extensions(&flatten_profile(profile))
}

pub fn render_summary(profiles: &[ProfileRecord]) -> String {
    let mut sorted: Vec<&ProfileRecord> = profiles.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut writer = CsvWriter::new(&SUMMARY_COLUMNS);
    for profile in sorted {
        writer.write_row(&[
            profile.name.clone(),
            profile.extensions.len().to_string(),
            profile.built_in_count().to_string(),
            profile.third_party_count().to_string(),
            profile.path.display().to_string(),
            format_date(profile.last_modified.as_ref()),
        ]);
    }
    writer.finish()
}

fn detail_row(record: &ExtensionRecord) -> [String; 13] {
    [
        profile_label(record).to_string(),
        record.id.clone(),
        record.display_name.clone(),
        record.publisher.clone(),
        record.version.clone(),
        record.description.clone().unwrap_or_default(),
        record.category.clone().unwrap_or_default(),
        yes_no(record.is_enabled).to_string(),
        yes_no(record.is_built_in).to_string(),
        format_date(record.install_date.as_ref()),
        record.repository.clone().unwrap_or_default(),
        record
            .install_count
            .map(|c| c.to_string())
            .unwrap_or_default(),
        record
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_default(),
    ]
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn format_date(date: Option<&DateTime<Local>>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Output file name for a profile's own export.
///
/// # Example
///
/// ```
/// use vsc_inventory::output::profile_file_name;
///
/// assert_eq!(profile_file_name("Dev:Test"), "extensions-Dev_Test.csv");
/// ```
pub fn profile_file_name(profile_name: &str) -> String {
    format!("extensions-{}.csv", sanitize_file_name(profile_name))
}

/// [`profile_file_name`], suffixed until it is not in `used`.
///
/// Comparison ignores case since Windows and macOS file systems do.
fn unique_file_name(profile_name: &str, used: &mut HashSet<String>) -> String {
    let stem = sanitize_file_name(profile_name);
    let mut name = format!("extensions-{}.csv", stem);
    let mut n = 2;
    while !used.insert(name.to_lowercase()) {
        name = format!("extensions-{}-{}.csv", stem, n);
        n += 1;
    }
    if n > 2 {
        warn!("Profile {} shares a file name with another profile, writing {}", profile_name, name);
    }
    name
}

pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if INVALID_FILE_NAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
        }
    }
    fs::write(path, content).map_err(|e| ExportError::io(path, e))
}
