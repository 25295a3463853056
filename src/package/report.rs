//! Per-version deletion outcomes and the run report

use tracing::{error, info};

/// Line logged for a package with nothing to delete
pub const NOTHING_MATCHED_LINE: &str = "-> No versions found that match deletion criteria";

/// Result of deleting one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub version_id: String,
    pub success: bool,
    /// Failure reason; `None` on success
    pub message: Option<String>,
}

impl DeletionOutcome {
    pub fn succeeded(version_id: &str) -> Self {
        Self {
            version_id: version_id.to_string(),
            success: true,
            message: None,
        }
    }

    pub fn failed(version_id: &str, message: &str) -> Self {
        Self {
            version_id: version_id.to_string(),
            success: false,
            message: Some(message.to_string()),
        }
    }

    /// Formats the outcome as a report line
    pub fn report_line(&self) -> String {
        match (self.success, &self.message) {
            (true, _) => format!("✅ {}", self.version_id),
            (false, Some(message)) => format!("❌ {}: {}", self.version_id, message),
            (false, None) => format!("❌ {}", self.version_id),
        }
    }
}

/// What happened to one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageStatus {
    /// No version matched; no request was sent
    NothingMatched,
    /// The batched mutation was sent; one outcome per eligible version
    Processed(Vec<DeletionOutcome>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub package_name: String,
    pub status: PackageStatus,
}

impl PackageReport {
    pub fn nothing_matched(package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            status: PackageStatus::NothingMatched,
        }
    }

    pub fn processed(package_name: &str, outcomes: Vec<DeletionOutcome>) -> Self {
        Self {
            package_name: package_name.to_string(),
            status: PackageStatus::Processed(outcomes),
        }
    }

    pub fn outcomes(&self) -> &[DeletionOutcome] {
        match &self.status {
            PackageStatus::NothingMatched => &[],
            PackageStatus::Processed(outcomes) => outcomes,
        }
    }

    /// Emits the line that opens a package's section of the report
    pub fn log_header(package_name: &str) {
        info!("Package: {}", package_name);
    }

    /// Emits the outcome lines of the section, followed by a blank separator
    pub fn log_outcomes(&self) {
        match &self.status {
            PackageStatus::NothingMatched => info!("{}", NOTHING_MATCHED_LINE),
            PackageStatus::Processed(outcomes) => {
                for outcome in outcomes {
                    if outcome.success {
                        info!("{}", outcome.report_line());
                    } else {
                        error!("{}", outcome.report_line());
                    }
                }
            }
        }

        info!("");
    }
}

/// Reports of all packages processed in one run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub packages: Vec<PackageReport>,
}

impl RunReport {
    pub fn deleted_count(&self) -> usize {
        self.outcomes().filter(|o| o.success).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes().filter(|o| !o.success).count()
    }

    fn outcomes(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.packages.iter().flat_map(|p| p.outcomes())
    }
}
