use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of 16 MBTI personality codes.
///
/// `Mbti` is a value object: it is validated at the boundary (parsing is
/// case-insensitive) and serialized as the canonical uppercase four-letter
/// code everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Mbti {
    INFP,
    ENFP,
    INFJ,
    ENFJ,
    INTJ,
    ENTJ,
    INTP,
    ENTP,
    ISFP,
    ESFP,
    ISTP,
    ESTP,
    ISFJ,
    ESFJ,
    ISTJ,
    ESTJ,
}

/// Error returned when a string is not one of the 16 MBTI codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MBTI code: {0}")]
pub struct InvalidMbti(pub String);

impl Mbti {
    /// Number of queue partitions, one per code.
    pub const COUNT: usize = 16;

    /// Every MBTI code, in table order.
    pub const ALL: [Mbti; Mbti::COUNT] = [
        Mbti::INFP,
        Mbti::ENFP,
        Mbti::INFJ,
        Mbti::ENFJ,
        Mbti::INTJ,
        Mbti::ENTJ,
        Mbti::INTP,
        Mbti::ENTP,
        Mbti::ISFP,
        Mbti::ESFP,
        Mbti::ISTP,
        Mbti::ESTP,
        Mbti::ISFJ,
        Mbti::ESFJ,
        Mbti::ISTJ,
        Mbti::ESTJ,
    ];

    /// Canonical uppercase code.
    pub fn as_str(self) -> &'static str {
        match self {
            Mbti::INFP => "INFP",
            Mbti::ENFP => "ENFP",
            Mbti::INFJ => "INFJ",
            Mbti::ENFJ => "ENFJ",
            Mbti::INTJ => "INTJ",
            Mbti::ENTJ => "ENTJ",
            Mbti::INTP => "INTP",
            Mbti::ENTP => "ENTP",
            Mbti::ISFP => "ISFP",
            Mbti::ESFP => "ESFP",
            Mbti::ISTP => "ISTP",
            Mbti::ESTP => "ESTP",
            Mbti::ISFJ => "ISFJ",
            Mbti::ESFJ => "ESFJ",
            Mbti::ISTJ => "ISTJ",
            Mbti::ESTJ => "ESTJ",
        }
    }

    /// Stable partition index in `0..COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Mbti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mbti {
    type Err = InvalidMbti;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INFP" => Ok(Mbti::INFP),
            "ENFP" => Ok(Mbti::ENFP),
            "INFJ" => Ok(Mbti::INFJ),
            "ENFJ" => Ok(Mbti::ENFJ),
            "INTJ" => Ok(Mbti::INTJ),
            "ENTJ" => Ok(Mbti::ENTJ),
            "INTP" => Ok(Mbti::INTP),
            "ENTP" => Ok(Mbti::ENTP),
            "ISFP" => Ok(Mbti::ISFP),
            "ESFP" => Ok(Mbti::ESFP),
            "ISTP" => Ok(Mbti::ISTP),
            "ESTP" => Ok(Mbti::ESTP),
            "ISFJ" => Ok(Mbti::ISFJ),
            "ESFJ" => Ok(Mbti::ESFJ),
            "ISTJ" => Ok(Mbti::ISTJ),
            "ESTJ" => Ok(Mbti::ESTJ),
            _ => Err(InvalidMbti(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("infp".parse::<Mbti>().unwrap(), Mbti::INFP);
        assert_eq!("EnTj".parse::<Mbti>().unwrap(), Mbti::ENTJ);
        assert_eq!("ESTJ".parse::<Mbti>().unwrap(), Mbti::ESTJ);
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert!("ABCD".parse::<Mbti>().is_err());
        assert!("".parse::<Mbti>().is_err());
        assert!("INF".parse::<Mbti>().is_err());
    }

    #[test]
    fn all_codes_round_trip_through_strings() {
        for mbti in Mbti::ALL {
            assert_eq!(mbti.as_str().parse::<Mbti>().unwrap(), mbti);
        }
    }

    #[test]
    fn partition_indexes_are_distinct() {
        let mut seen = [false; Mbti::COUNT];
        for mbti in Mbti::ALL {
            assert!(!seen[mbti.index()]);
            seen[mbti.index()] = true;
        }
    }

    #[test]
    fn serde_uses_the_uppercase_code() {
        let json = serde_json::to_string(&Mbti::ISFP).unwrap();
        assert_eq!(json, "\"ISFP\"");
        let back: Mbti = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Mbti::ISFP);
    }
}
