//! Snapshot types for registry packages and their versions

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Package type as reported by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageType {
    Npm,
    Maven,
    Rubygems,
    Docker,
    Debian,
    Nuget,
    Pypi,
    /// A type this build does not know about; never matches a configured type
    #[serde(other)]
    Unknown,
}

impl PackageType {
    /// Returns the registry's name for the type
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Npm => "NPM",
            PackageType::Maven => "MAVEN",
            PackageType::Rubygems => "RUBYGEMS",
            PackageType::Docker => "DOCKER",
            PackageType::Debian => "DEBIAN",
            PackageType::Nuget => "NUGET",
            PackageType::Pypi => "PYPI",
            PackageType::Unknown => "UNKNOWN",
        }
    }
}

/// One published revision of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionNode {
    /// Opaque registry identifier
    pub id: String,
    /// Display string, e.g. `1.2.3` or `sha256:...`
    pub version: String,
    pub package_type: PackageType,
    /// Update time of the version's first file; `None` when it has no files
    pub last_file_updated_at: Option<DateTime<Utc>>,
    /// `None` when the registry reported no download statistics
    pub downloads_total_count: Option<u64>,
}

/// A registry package with its versions, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    pub id: String,
    pub name: String,
    pub versions: Vec<VersionNode>,
}
