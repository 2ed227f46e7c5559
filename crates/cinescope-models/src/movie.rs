use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier of a movie.
///
/// The service is not consistent about whether ids travel as JSON numbers or
/// numeric strings, so both are accepted when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MovieId(u64);

impl MovieId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMovieIdError(String);

impl fmt::Display for ParseMovieIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid movie id: {:?}", self.0)
    }
}

impl std::error::Error for ParseMovieIdError {}

impl FromStr for MovieId {
    type Err = ParseMovieIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseMovieIdError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(id) => Ok(Self(id)),
            RawId::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_accepts_number_and_string() {
        let from_number: MovieId = serde_json::from_str("42").unwrap();
        let from_string: MovieId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, MovieId::new(42));
        assert_eq!(from_string, MovieId::new(42));
    }

    #[test]
    fn test_movie_id_rejects_non_numeric() {
        assert!(serde_json::from_str::<MovieId>("\"tt0133093\"").is_err());
        assert!("abc".parse::<MovieId>().is_err());
        assert_eq!(" 7 ".parse::<MovieId>().unwrap(), MovieId::new(7));
    }

    #[test]
    fn test_movie_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&MovieId::new(5)).unwrap(), "5");
    }
}
