//! Module versions: dot-separated non-negative integer tuples
//!
//! Not semver. A version is any `digits(.digits)*` string; comparison
//! zero-pads the shorter operand, and bumps target the fixed
//! major/minor/micro positions while preserving any further components.

use crate::core::error::{ModuleError, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The version component a bump operation targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
  Major,
  Minor,
  #[default]
  Micro,
}

impl fmt::Display for Granularity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Granularity::Major => write!(f, "major"),
      Granularity::Minor => write!(f, "minor"),
      Granularity::Micro => write!(f, "micro"),
    }
  }
}

/// A parsed module version
///
/// Immutable once constructed; `bump` returns a new value.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
  parts: Vec<u64>,
}

impl Version {
  /// Parse a `digits(.digits)*` version string
  pub fn parse(text: &str) -> ShipResult<Self> {
    let invalid = || {
      ShipError::Module(ModuleError::InvalidVersion {
        value: text.to_string(),
      })
    };

    if text.is_empty() {
      return Err(invalid());
    }

    let mut parts = Vec::new();
    for component in text.split('.') {
      if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
      }
      parts.push(component.parse::<u64>().map_err(|_| invalid())?);
    }

    Ok(Self { parts })
  }

  /// Compare against an optionally-absent version
  ///
  /// An absent version orders strictly below any concrete version.
  #[allow(dead_code)] // Comparison API; the release path only ever bumps
  pub fn compare(&self, other: Option<&Version>) -> Ordering {
    match other {
      None => Ordering::Greater,
      Some(other) => self.cmp(other),
    }
  }

  /// Return a new version bumped at the given granularity
  ///
  /// Operates on the fixed 3-component model: missing components are
  /// zero-filled first, components beyond micro are carried unchanged.
  pub fn bump(&self, level: Granularity) -> Version {
    let mut parts = self.parts.clone();
    while parts.len() < 3 {
      parts.push(0);
    }

    match level {
      Granularity::Major => {
        parts[0] += 1;
        parts[1] = 0;
        parts[2] = 0;
      }
      Granularity::Minor => {
        parts[1] += 1;
        parts[2] = 0;
      }
      Granularity::Micro => {
        parts[2] += 1;
      }
    }

    Version { parts }
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined = self
      .parts
      .iter()
      .map(|p| p.to_string())
      .collect::<Vec<_>>()
      .join(".");
    write!(f, "{}", joined)
  }
}

impl Ord for Version {
  fn cmp(&self, other: &Self) -> Ordering {
    // Zero-pad the shorter operand; first differing component decides
    let len = self.parts.len().max(other.parts.len());
    for i in 0..len {
      let a = self.parts.get(i).copied().unwrap_or(0);
      let b = other.parts.get(i).copied().unwrap_or(0);
      match a.cmp(&b) {
        Ordering::Equal => continue,
        unequal => return unequal,
      }
    }
    Ordering::Equal
  }
}

impl PartialOrd for Version {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for Version {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl TryFrom<String> for Version {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Version::parse(&value).map_err(|e| e.to_string())
  }
}

impl From<Version> for String {
  fn from(version: Version) -> Self {
    version.to_string()
  }
}
