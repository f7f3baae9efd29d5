use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("missing offset for search field '{field}'")]
    MissingOffset { field: String },

    #[error("unsupported search field type: {type_name}")]
    UnsupportedType { field: String, type_name: String },

    #[error("need to specify both min_offset and max_offset for search field '{field}'")]
    IncompleteRange { field: String },

    #[error("invalid descriptor for search field '{field}': {reason}")]
    InvalidDescriptor { field: String, reason: String },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Raised by backends when a query value does not suit the field.
    #[error("invalid query value for field '{field}': {reason}")]
    InvalidQueryValue { field: String, reason: String },

    /// A value was present in the document but failed conversion.
    #[error("cannot extract {type_name} field '{field}': {reason}")]
    Extraction {
        field: String,
        type_name: String,
        reason: String,
    },

    /// `keys` is sorted and free of duplicates.
    #[error("{subject} differs from stored ({})", .keys.join(", "))]
    Equivalence { subject: String, keys: Vec<String> },
}

pub type Result<T> = std::result::Result<T, FieldError>;
