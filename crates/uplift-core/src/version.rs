use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A dotted sequence of release components, e.g. `1.2` or `0.20.3`.
///
/// Ordering is component-wise with conceptual zero padding, so
/// `1.2 < 1.2.1` and `1.2 == 1.2.0`. This is not semver: any number of
/// components is allowed and there are no pre-release or build tags.
#[derive(Debug, Clone)]
pub struct ReleaseVersion {
    components: Vec<u64>,
}

impl ReleaseVersion {
    pub fn new(components: Vec<u64>) -> Result<Self> {
        if components.is_empty() {
            return Err(anyhow!("invalid-version: at least one component required"));
        }
        Ok(Self { components })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl FromStr for ReleaseVersion {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("invalid-version: empty version string"));
        }

        let mut components = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() {
                return Err(anyhow!("invalid-version: empty component in '{trimmed}'"));
            }
            let value = part.parse::<u64>().map_err(|_| {
                anyhow!("invalid-version: non-integer component '{part}' in '{trimmed}'")
            })?;
            components.push(value);
        }

        Ok(Self { components })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .components
            .iter()
            .map(|component| component.to_string())
            .collect::<Vec<_>>()
            .join(".");
        formatter.write_str(&rendered)
    }
}

impl PartialEq for ReleaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReleaseVersion {}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.components.len().max(other.components.len());
        for position in 0..width {
            let left = self.components.get(position).copied().unwrap_or(0);
            let right = other.components.get(position).copied().unwrap_or(0);
            match left.cmp(&right) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}

impl Serialize for ReleaseVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ReleaseVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// True iff `available` is present and strictly newer than `installed`.
///
/// Unversioned and VC-tracked packages never reach this comparison; they
/// are handled by the VC path of candidate resolution.
pub fn is_upgrade(installed: &ReleaseVersion, available: Option<&ReleaseVersion>) -> bool {
    match available {
        Some(available) => available > installed,
        None => false,
    }
}
