// ABOUTME: Version identifiers that partition the bucket into deployment folders.
// ABOUTME: Parses "<branch>.<build>" and "<major>.<minor>.<patch>" shapes.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const BRANCH_BUILD_SHAPE: &str = "<branch>.<build>";
const SEMANTIC_SHAPE: &str = "<major>.<minor>.<patch>";
const ANY_SHAPE: &str = "<branch>.<build> or <major>.<minor>.<patch>";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version '{raw}': must match {expected}")]
    InvalidFormat { raw: String, expected: &'static str },
}

/// A parsed deployment version.
///
/// The shape is inferred from the number of dot-separated components only:
/// two components are a branch build, three are a semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    /// Non-release build such as `master.123`.
    BranchBuild { branch: String, build: i64 },
    /// Release such as `1.2.3`.
    SemanticTriple { major: i64, minor: i64, patch: i64 },
}

impl VersionSpec {
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let components: Vec<&str> = raw.split('.').collect();

        match components.as_slice() {
            [branch, build] => {
                let build = parse_component(raw, build, BRANCH_BUILD_SHAPE)?;
                Ok(VersionSpec::BranchBuild {
                    branch: (*branch).to_string(),
                    build,
                })
            }
            [major, minor, patch] => Ok(VersionSpec::SemanticTriple {
                major: parse_component(raw, major, SEMANTIC_SHAPE)?,
                minor: parse_component(raw, minor, SEMANTIC_SHAPE)?,
                patch: parse_component(raw, patch, SEMANTIC_SHAPE)?,
            }),
            _ => Err(VersionError::InvalidFormat {
                raw: raw.to_string(),
                expected: ANY_SHAPE,
            }),
        }
    }

    /// Number of dot-separated components this shape is written with.
    pub fn component_count(&self) -> usize {
        match self {
            VersionSpec::BranchBuild { .. } => 2,
            VersionSpec::SemanticTriple { .. } => 3,
        }
    }

    pub fn is_branch_build(&self) -> bool {
        matches!(self, VersionSpec::BranchBuild { .. })
    }

    /// Whether `other` belongs to the same lineage and is strictly older.
    ///
    /// Branch builds share a lineage when the branch names match. Semantic
    /// versions share a lineage when the major versions match. Versions of
    /// different shapes never compare as older.
    pub fn supersedes(&self, other: &VersionSpec) -> bool {
        match (self, other) {
            (
                VersionSpec::BranchBuild { branch, build },
                VersionSpec::BranchBuild {
                    branch: other_branch,
                    build: other_build,
                },
            ) => branch == other_branch && other_build < build,
            (
                VersionSpec::SemanticTriple {
                    major,
                    minor,
                    patch,
                },
                VersionSpec::SemanticTriple {
                    major: other_major,
                    minor: other_minor,
                    patch: other_patch,
                },
            ) => {
                other_major == major
                    && (other_minor < minor || (other_minor == minor && other_patch < patch))
            }
            _ => false,
        }
    }
}

fn parse_component(
    raw: &str,
    component: &str,
    expected: &'static str,
) -> Result<i64, VersionError> {
    component
        .parse::<i64>()
        .map_err(|_| VersionError::InvalidFormat {
            raw: raw.to_string(),
            expected,
        })
}

impl FromStr for VersionSpec {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionSpec::parse(s)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::BranchBuild { branch, build } => write!(f, "{branch}.{build}"),
            VersionSpec::SemanticTriple {
                major,
                minor,
                patch,
            } => write!(f, "{major}.{minor}.{patch}"),
        }
    }
}
