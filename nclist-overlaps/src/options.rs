use num_traits::{PrimInt, Signed};

use nclist_core::NCListError;
pub use nclist_core::models::{OverlapType, SelectMode};

use crate::consts::NCLIST_MAX_DEPTH;

/// Settings for NCList construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NCListConfig {
    /// Deepest nesting accepted before construction fails with a
    /// [`NCListError::ConstructionError`].
    pub max_depth: usize,
}

impl Default for NCListConfig {
    fn default() -> Self {
        NCListConfig {
            max_depth: NCLIST_MAX_DEPTH,
        }
    }
}

impl NCListConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Query settings shared by every overlap entry point.
///
/// ```
/// use nclist_overlaps::{OverlapOptions, OverlapType, SelectMode};
///
/// let options = OverlapOptions::<i32>::default()
///     .with_type(OverlapType::Within)
///     .with_select(SelectMode::Count)
///     .with_min_score(3);
/// assert!(options.validate().is_ok());
///
/// let circular = OverlapOptions::<i32>::default().with_circle_length(Some(0));
/// assert!(circular.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapOptions<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    /// Minimum overlap width. Values below 1 also accept gaps of up to
    /// `-min_score` positions between query and candidate.
    pub min_score: I,
    pub overlap_type: OverlapType,
    pub select: SelectMode,
    /// Length of a circular sequence; `None` for linear coordinates.
    pub circle_length: Option<I>,
    /// Used when an index has to be built on the fly.
    pub config: NCListConfig,
}

impl<I> Default for OverlapOptions<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    fn default() -> Self {
        OverlapOptions {
            min_score: I::one(),
            overlap_type: OverlapType::Any,
            select: SelectMode::All,
            circle_length: None,
            config: NCListConfig::default(),
        }
    }
}

impl<I> OverlapOptions<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    pub fn with_min_score(mut self, min_score: I) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_type(mut self, overlap_type: OverlapType) -> Self {
        self.overlap_type = overlap_type;
        self
    }

    pub fn with_select(mut self, select: SelectMode) -> Self {
        self.select = select;
        self
    }

    pub fn with_circle_length(mut self, circle_length: Option<I>) -> Self {
        self.circle_length = circle_length;
        self
    }

    pub fn with_config(mut self, config: NCListConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validate(&self) -> Result<(), NCListError> {
        validate_circle_length(self.circle_length)
    }
}

pub(crate) fn validate_circle_length<I>(circle_length: Option<I>) -> Result<(), NCListError>
where
    I: PrimInt + Signed + Send + Sync,
{
    match circle_length {
        Some(len) if len <= I::zero() => Err(NCListError::InvalidArgument(
            "'circle_length' must be a single positive integer or unset".to_string(),
        )),
        Some(len) if len.checked_add(&len).is_none() => Err(NCListError::InvalidArgument(
            "'circle_length' is too large: twice its value must fit the coordinate type"
                .to_string(),
        )),
        _ => Ok(()),
    }
}
