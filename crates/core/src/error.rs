/// Why a set of entries query parameters was rejected.
///
/// Each variant corresponds to one validation rule of the entries endpoint;
/// the `Display` text is what the HTTP layer returns as the error message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Missing query parameters")]
    NoParameters,

    #[error("Missing required GetEntriesOptions query parameters: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),

    #[error("Invalid orderDirection. Must be 'ASC' or 'DESC'")]
    InvalidOrderDirection,

    #[error("Invalid {name}. Must be an integer")]
    NotAnInteger { name: &'static str },

    #[error("pageSize must be a positive integer")]
    NonPositivePageSize,

    #[error("page must be a non-negative integer")]
    NegativePage,

    #[error("dayOfWeek requires source to be specified")]
    DayOfWeekWithoutSource,

    #[error("dayOfWeek must be between 0 and 6")]
    DayOfWeekOutOfRange,

    #[error("Both answerLengthMin and answerLengthMax must be provided together")]
    IncompleteAnswerLength,

    #[error("answerLengthMin and answerLengthMax must be non-negative integers")]
    NegativeAnswerLength,

    #[error("answerLengthMin must be less than or equal to answerLengthMax")]
    InvertedAnswerLength,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
