use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::VersionError;

/// A dotted numeric language version (`1.8`, `11`, `17.0.2`).
///
/// Trailing zero components are dropped on construction, so ordering is a
/// component-wise numeric compare in which missing components count as
/// zero: `1.7 == 1.7.0 < 1.8 < 8 < 11`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LanguageVersion(Vec<u32>);

impl LanguageVersion {
    pub fn from_parts(parts: &[u32]) -> Self {
        let mut parts = parts.to_vec();
        while parts.last() == Some(&0) {
            parts.pop();
        }
        LanguageVersion(parts)
    }

    pub fn parts(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for LanguageVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }
        let parts = s
            .split('.')
            .map(|c| {
                c.parse::<u32>().map_err(|_| VersionError::InvalidComponent {
                    version: s.to_string(),
                    component: c.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_parts(&parts))
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("0");
        }
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

impl Serialize for LanguageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> LanguageVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_missing_components_are_zero() {
        assert_eq!(v("1.7"), v("1.7.0"));
        assert_eq!(v("11"), LanguageVersion::from_parts(&[11, 0, 0]));
        assert!(v("1.7") < v("1.7.1"));
    }

    #[test]
    fn test_ordering() {
        let mut versions = vec![v("11"), v("1.8"), v("8"), v("1.10"), v("1.2"), v("10.9")];
        versions.sort();
        let shown: Vec<String> = versions.iter().map(ToString::to_string).collect();
        assert_eq!(shown, ["1.2", "1.8", "1.10", "8", "10.9", "11"]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<LanguageVersion>(), Err(VersionError::Empty));
        assert!(matches!(
            "1.x".parse::<LanguageVersion>(),
            Err(VersionError::InvalidComponent { component, .. }) if component == "x"
        ));
        assert!("1..2".parse::<LanguageVersion>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(v(" 17.0.2 ").to_string(), "17.0.2");
        assert_eq!(v("0").to_string(), "0");
    }
}
