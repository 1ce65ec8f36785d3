//! Version normalization
//!
//! Drupal modules declare versions as `CORE-VERSION[-STABILITY]`
//! (e.g. `8.x-1.0-beta3`) while composer expects constraints such as
//! `^1.0@beta`. This module converts between the two, and also converts the
//! composer-style versions returned by a package registry
//! (e.g. `1.0.0-alpha5`, `dev-1.x`).

pub mod ordering;

use std::fmt;
use std::str::FromStr;

use crate::error::{BuilderError, Result, config::invalid_constraint};

pub use ordering::select_best_version;

/// Stability name that is never range-constrained
const DEV_STABILITY: &str = "dev";

/// Prefix controlling how permissive a generated constraint is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstraintOperator {
    /// `^1.0`
    #[default]
    Caret,
    /// `~1.0`
    Tilde,
    /// `1.0`
    Exact,
}

impl ConstraintOperator {
    pub const ALL: [ConstraintOperator; 3] = [
        ConstraintOperator::Caret,
        ConstraintOperator::Tilde,
        ConstraintOperator::Exact,
    ];

    /// The literal prefix written in front of a version
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintOperator::Caret => "^",
            ConstraintOperator::Tilde => "~",
            ConstraintOperator::Exact => "",
        }
    }

    /// Label shown in interactive menus
    pub fn label(self) -> &'static str {
        match self {
            ConstraintOperator::Caret => "Caret (^)",
            ConstraintOperator::Tilde => "Tilde (~)",
            ConstraintOperator::Exact => "Exact (none)",
        }
    }
}

impl fmt::Display for ConstraintOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConstraintOperator {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "caret" | "^" => Ok(ConstraintOperator::Caret),
            "tilde" | "~" => Ok(ConstraintOperator::Tilde),
            "exact" | "none" | "" => Ok(ConstraintOperator::Exact),
            other => Err(invalid_constraint(other)),
        }
    }
}

/// A composer dependency constraint produced from a raw version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Constraint string, e.g. `^1.3@beta` or `2.0-dev`
    pub constraint: String,
    /// Whether the version tracks a development release
    pub is_dev: bool,
}

/// Reason a version string could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedVersion {
    pub version: String,
    pub reason: &'static str,
}

impl fmt::Display for MalformedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.version, self.reason)
    }
}

impl std::error::Error for MalformedVersion {}

/// Remove the release counter from a stability tag (`alpha8` -> `alpha`)
fn stability_name(tag: &str) -> &str {
    tag.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Convert a Drupal module version (`8.x-1.0-beta3`) into a composer constraint.
///
/// The core compatibility segment is ignored. A `dev` stability always uses a
/// `-` separator and drops the operator; any other stability is appended with
/// `@` and keeps it.
pub fn normalize(
    raw: &str,
    operator: ConstraintOperator,
) -> std::result::Result<Normalized, MalformedVersion> {
    let segments: Vec<&str> = raw.trim().split('-').collect();
    let version = match segments.get(1) {
        Some(v) if !v.is_empty() => *v,
        _ => {
            return Err(MalformedVersion {
                version: raw.to_string(),
                reason: "has no version segment after the core compatibility",
            });
        }
    };

    let Some(tag) = segments.get(2) else {
        return Ok(Normalized {
            constraint: format!("{}{version}", operator.as_str()),
            is_dev: false,
        });
    };

    let stability = stability_name(tag);
    if stability.is_empty() {
        return Err(MalformedVersion {
            version: raw.to_string(),
            reason: "has an empty stability tag",
        });
    }

    if stability == DEV_STABILITY {
        Ok(Normalized {
            constraint: format!("{version}-{stability}"),
            is_dev: true,
        })
    } else {
        Ok(Normalized {
            constraint: format!("{}{version}@{stability}", operator.as_str()),
            is_dev: false,
        })
    }
}

/// Convert a registry version (`1.0.0-alpha5`, `dev-1.x`) into a composer constraint.
///
/// Dev branches are returned unchanged. Otherwise only `major.minor` is kept
/// and a stability suffix becomes `@stability`.
pub fn normalize_registry_version(
    version: &str,
    operator: ConstraintOperator,
) -> std::result::Result<Normalized, MalformedVersion> {
    let segments: Vec<&str> = version.trim().split('-').collect();
    if segments[0] == DEV_STABILITY {
        return Ok(Normalized {
            constraint: version.to_string(),
            is_dev: true,
        });
    }

    let mut numbers = segments[0].split('.');
    let (Some(major), Some(minor)) = (numbers.next(), numbers.next()) else {
        return Err(MalformedVersion {
            version: version.to_string(),
            reason: "has no major.minor component",
        });
    };
    if major.is_empty() || minor.is_empty() {
        return Err(MalformedVersion {
            version: version.to_string(),
            reason: "has an empty numeric component",
        });
    }

    let mut constraint = format!("{}{major}.{minor}", operator.as_str());
    if let Some(tag) = segments.get(1) {
        let stability = stability_name(tag);
        if stability == DEV_STABILITY {
            return Ok(Normalized {
                constraint: version.to_string(),
                is_dev: true,
            });
        }
        if !stability.is_empty() {
            constraint.push('@');
            constraint.push_str(stability);
        }
    }

    Ok(Normalized {
        constraint,
        is_dev: false,
    })
}
