//! Vote values accepted on the wire.

use std::{fmt, str::FromStr};

use repost_common::AppError;

/// A voter's stance on a post or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// +1
    Up,
    /// Retract any existing vote.
    None,
    /// -1
    Down,
}

impl Vote {
    /// Stored integer value. `None` is never stored; it retracts.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::None => 0,
            Self::Down => -1,
        }
    }
}

impl FromStr for Vote {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "upvote" => Ok(Self::Up),
            "0" | "novote" => Ok(Self::None),
            "-1" | "downvote" => Ok(Self::Down),
            other => Err(AppError::BadRequest(format!(
                "Invalid vote '{other}', expected 1, 0, -1, upvote, novote or downvote"
            ))),
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_named_forms() {
        assert_eq!("1".parse::<Vote>().unwrap(), Vote::Up);
        assert_eq!("upvote".parse::<Vote>().unwrap(), Vote::Up);
        assert_eq!("0".parse::<Vote>().unwrap(), Vote::None);
        assert_eq!("novote".parse::<Vote>().unwrap(), Vote::None);
        assert_eq!("-1".parse::<Vote>().unwrap(), Vote::Down);
        assert_eq!("downvote".parse::<Vote>().unwrap(), Vote::Down);
    }

    #[test]
    fn test_out_of_range_is_bad_request() {
        assert!(matches!("2".parse::<Vote>(), Err(AppError::BadRequest(_))));
        assert!(matches!("Upvote".parse::<Vote>(), Err(AppError::BadRequest(_))));
        assert!(matches!("".parse::<Vote>(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_values() {
        assert_eq!(Vote::Up.value(), 1);
        assert_eq!(Vote::None.value(), 0);
        assert_eq!(Vote::Down.value(), -1);
        assert_eq!(Vote::Down.to_string(), "-1");
    }
}
