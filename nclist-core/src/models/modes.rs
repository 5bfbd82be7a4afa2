use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::NCListError;

/// The geometric relation a candidate must have with the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlapType {
    /// Any overlap satisfying the minimum score.
    #[default]
    Any,
    /// Query and candidate share their start.
    Start,
    /// Query and candidate share their end (modulo the circle length, if any).
    End,
    /// The query lies inside the candidate.
    Within,
    /// The candidate lies inside the query.
    Extend,
    /// Same start and same end.
    Equal,
}

impl OverlapType {
    /// The same relation seen from the other side: `Within` and `Extend` trade places.
    pub fn swapped(self) -> Self {
        match self {
            OverlapType::Within => OverlapType::Extend,
            OverlapType::Extend => OverlapType::Within,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapType::Any => "any",
            OverlapType::Start => "start",
            OverlapType::End => "end",
            OverlapType::Within => "within",
            OverlapType::Extend => "extend",
            OverlapType::Equal => "equal",
        }
    }
}

impl FromStr for OverlapType {
    type Err = NCListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(OverlapType::Any),
            "start" => Ok(OverlapType::Start),
            "end" => Ok(OverlapType::End),
            "within" => Ok(OverlapType::Within),
            "extend" => Ok(OverlapType::Extend),
            "equal" => Ok(OverlapType::Equal),
            _ => Err(NCListError::InvalidArgument(format!(
                "'type' must be \"any\", \"start\", \"end\", \"within\", \"extend\", or \"equal\" (got \"{}\")",
                s
            ))),
        }
    }
}

impl Display for OverlapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How many, and which, hits are reported per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectMode {
    #[default]
    All,
    First,
    Last,
    Arbitrary,
    Count,
}

impl SelectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectMode::All => "all",
            SelectMode::First => "first",
            SelectMode::Last => "last",
            SelectMode::Arbitrary => "arbitrary",
            SelectMode::Count => "count",
        }
    }
}

impl FromStr for SelectMode {
    type Err = NCListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SelectMode::All),
            "first" => Ok(SelectMode::First),
            "last" => Ok(SelectMode::Last),
            "arbitrary" => Ok(SelectMode::Arbitrary),
            "count" => Ok(SelectMode::Count),
            _ => Err(NCListError::InvalidArgument(format!(
                "'select' must be \"all\", \"first\", \"last\", \"arbitrary\", or \"count\" (got \"{}\")",
                s
            ))),
        }
    }
}

impl Display for SelectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("any", OverlapType::Any)]
    #[case("start", OverlapType::Start)]
    #[case("end", OverlapType::End)]
    #[case("within", OverlapType::Within)]
    #[case("extend", OverlapType::Extend)]
    #[case("equal", OverlapType::Equal)]
    fn test_parse_overlap_type(#[case] s: &str, #[case] expected: OverlapType) {
        let parsed: OverlapType = s.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), s);
    }

    #[rstest]
    fn test_swapped() {
        assert_eq!(OverlapType::Within.swapped(), OverlapType::Extend);
        assert_eq!(OverlapType::Extend.swapped(), OverlapType::Within);
        assert_eq!(OverlapType::End.swapped(), OverlapType::End);
    }

    #[rstest]
    #[case("ANY")]
    #[case("overlap")]
    fn test_bad_overlap_type(#[case] s: &str) {
        assert!(matches!(
            s.parse::<OverlapType>(),
            Err(NCListError::InvalidArgument(_))
        ));
    }

    #[rstest]
    fn test_parse_select_mode() {
        assert_eq!("arbitrary".parse::<SelectMode>().unwrap(), SelectMode::Arbitrary);
        assert_eq!(SelectMode::Count.to_string(), "count");
        assert!("some".parse::<SelectMode>().is_err());
    }
}
