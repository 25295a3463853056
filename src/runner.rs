//! One retention run: fetch, filter, delete, report

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::ActionSettings;
use crate::graphql::error::RegistryError;
use crate::graphql::executor::QueryExecutor;
use crate::package::deleter::delete_package_versions;
use crate::package::fetcher::fetch_package_versions;
use crate::package::filter::filter_packages;
use crate::package::report::{PackageReport, RunReport};

/// Runs the retention policy against the repository in `settings`
///
/// Packages are processed one at a time, in registry order. A package's name is
/// logged before its mutation is sent and its outcomes once it is reconciled.
/// The first transport failure aborts the run; lines already logged stay.
pub async fn run(
    executor: &dyn QueryExecutor,
    settings: &ActionSettings,
    now: DateTime<Utc>,
) -> Result<RunReport, RegistryError> {
    info!(
        "Fetching {} package versions of {}/{}",
        settings.package_type, settings.owner, settings.repo
    );
    let packages = fetch_package_versions(executor, &settings.owner, &settings.repo).await?;

    let filtered = filter_packages(&packages, settings, now);

    let mut report = RunReport::default();
    for package in &filtered {
        PackageReport::log_header(&package.name);
        let package_report = delete_package_versions(executor, package).await?;
        package_report.log_outcomes();
        report.packages.push(package_report);
    }

    info!(
        "Deleted {} versions, {} failed",
        report.deleted_count(),
        report.failed_count()
    );

    Ok(report)
}
