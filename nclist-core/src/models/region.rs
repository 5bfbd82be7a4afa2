use std::fmt::{self, Display};

use crate::errors::NCListError;

///
/// One line of a BED-like file. Coordinates are 0-based, half-open, as in BED.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Option<char>,

    /// Columns past the third, tab-joined.
    pub rest: Option<String>,
}

impl Region {
    ///
    /// Space tag for the strand: `+` is 1, `-` is -1, anything else is the
    /// wildcard 0.
    ///
    pub fn space(&self) -> i32 {
        match self.strand {
            Some('+') => 1,
            Some('-') => -1,
            _ => 0,
        }
    }

    /// The closed, 1-based range covering this region: `[start + 1, end]`.
    pub fn to_range(&self) -> Result<(i32, i32), NCListError> {
        match (i32::try_from(self.start), i32::try_from(self.end)) {
            (Ok(start), Ok(end)) if start < i32::MAX => Ok((start + 1, end)),
            _ => Err(NCListError::InvalidArgument(format!(
                "region coordinates do not fit a 32-bit integer: {}:{}-{}",
                self.chr, self.start, self.end
            ))),
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chr, self.start, self.end)?;
        if let Some(rest) = &self.rest {
            write!(f, "\t{}", rest)?;
        }
        Ok(())
    }
}
