use thiserror::Error;

#[derive(Error, Debug)]
pub enum NCListError {
    #[error("Cannot build NCList: {0}")]
    ConstructionError(String),

    #[error("NCList is too big to fit in an integer vector (needs {0} elements)")]
    SizeOverflowError(usize),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl NCListError {
    pub fn depth_exceeded(max_depth: usize) -> Self {
        NCListError::ConstructionError(format!(
            "cannot build an NCList object of depth > {}",
            max_depth
        ))
    }
}
