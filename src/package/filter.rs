//! Selection of the versions eligible for deletion
//!
//! A version is eligible when its package type matches, it has not been
//! downloaded more than allowed, and its first file is at least `min_age` old.
//! Versions without files are never eligible.

use chrono::{DateTime, Utc};

use crate::config::ActionSettings;
use crate::package::types::{PackageNode, PackageType, VersionNode};

/// Returns true if the version's type equals `package_type`, ignoring case
pub fn matches_package_type(version: &VersionNode, package_type: &str) -> bool {
    version.package_type != PackageType::Unknown
        && version.package_type.as_str() == package_type.to_uppercase()
}

/// Returns true if the version has at most `max_downloads` downloads
///
/// An unreported download count never matches.
pub fn matches_downloads(version: &VersionNode, max_downloads: u64) -> bool {
    version
        .downloads_total_count
        .is_some_and(|downloads| downloads <= max_downloads)
}

/// Returns true if the version has a file last updated at or before `cutoff`
pub fn matches_age(version: &VersionNode, cutoff: DateTime<Utc>) -> bool {
    version
        .last_file_updated_at
        .is_some_and(|updated_at| updated_at <= cutoff)
}

/// Latest file-update time a version may have to be old enough
pub fn age_cutoff(now: DateTime<Utc>, settings: &ActionSettings) -> DateTime<Utc> {
    now.checked_sub_signed(settings.min_age)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn is_eligible(version: &VersionNode, settings: &ActionSettings, cutoff: DateTime<Utc>) -> bool {
    matches_package_type(version, &settings.package_type)
        && matches_downloads(version, settings.max_downloads)
        && matches_age(version, cutoff)
}

/// Narrows every package's versions to the eligible ones
///
/// Packages without eligible versions are kept with an empty version list so
/// they still show up in the report.
pub fn filter_packages(
    packages: &[PackageNode],
    settings: &ActionSettings,
    now: DateTime<Utc>,
) -> Vec<PackageNode> {
    let cutoff = age_cutoff(now, settings);

    packages
        .iter()
        .map(|package| PackageNode {
            id: package.id.clone(),
            name: package.name.clone(),
            versions: package
                .versions
                .iter()
                .filter(|v| is_eligible(v, settings, cutoff))
                .cloned()
                .collect(),
        })
        .collect()
}
