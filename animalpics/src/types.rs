//! Common type definitions.
//!
//! - [`AnimalType`]: the closed set of animals we know how to fetch pictures for
//! - [`PictureId`]: identifier assigned by the picture store

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::acquisition::AcquisitionError;

/// Synthetic id assigned by the store on insert (SQLite rowid)
pub type PictureId = i64;

/// Animal types with a configured upstream source.
///
/// Parsing is case-insensitive; the canonical form (stored, serialized, logged) is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnimalType {
    Cat,
    Dog,
    Bear,
}

impl AnimalType {
    pub const ALL: [AnimalType; 3] = [AnimalType::Cat, AnimalType::Dog, AnimalType::Bear];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalType::Cat => "cat",
            AnimalType::Dog => "dog",
            AnimalType::Bear => "bear",
        }
    }

    /// Comma-separated list of supported tags, for validation messages
    pub fn supported() -> String {
        Self::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for AnimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimalType {
    type Err = AcquisitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimalType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AcquisitionError::UnsupportedAnimalType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("cat".parse::<AnimalType>().unwrap(), AnimalType::Cat);
        assert_eq!("DOG".parse::<AnimalType>().unwrap(), AnimalType::Dog);
        assert_eq!("BeAr".parse::<AnimalType>().unwrap(), AnimalType::Bear);
    }

    #[test]
    fn test_parse_rejects_unknown_tags() {
        let err = "giraffe".parse::<AnimalType>().unwrap_err();
        assert!(matches!(err, AcquisitionError::UnsupportedAnimalType(ref t) if t == "giraffe"));
        assert!("".parse::<AnimalType>().is_err());
        assert!("cats".parse::<AnimalType>().is_err());
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(AnimalType::Bear.to_string(), "bear");
        assert_eq!(serde_json::to_string(&AnimalType::Dog).unwrap(), "\"dog\"");
        assert_eq!(AnimalType::supported(), "cat, dog, bear");
    }
}
