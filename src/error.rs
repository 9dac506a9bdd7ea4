use thiserror::Error;

pub type DiaryResult<T> = std::result::Result<T, DiaryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiaryError {
    #[error("invalid date `{input}`: expected YYYY-MM-DD")]
    InvalidDate { input: String },
    #[error("date arithmetic left the supported calendar range from {from}")]
    DateOutOfRange { from: String },
}
