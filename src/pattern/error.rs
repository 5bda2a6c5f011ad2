use thiserror::Error;

pub type PatternResult<T> = Result<T, PatternError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("malformed pattern '{pattern}' near byte {index}")]
    BadFormat { pattern: String, index: usize },
    #[error("pattern '{pattern}' ended before an open group was closed")]
    UnexpectedEof { pattern: String },
}
