use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn malformed_term(term: impl Into<String>, reason: impl Into<String>) -> Error {
        Error(
            ErrorKind::MalformedTerm {
                term: term.into(),
                reason: reason.into(),
            }
            .into(),
        )
    }

    pub fn missing_value(field: impl Into<String>, doc: u32) -> Error {
        Error(
            ErrorKind::MissingValue {
                field: field.into(),
                doc,
            }
            .into(),
        )
    }

    pub fn out_of_range_ordinal(ordinal: u32, len: usize) -> Error {
        Error(ErrorKind::OutOfRangeOrdinal { ordinal, len }.into())
    }

    pub fn doc_out_of_range(doc: u32, max_doc: u32) -> Error {
        Error(ErrorKind::DocOutOfRange { doc, max_doc }.into())
    }

    pub fn invalid_format(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn config(setting: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::Config {
                setting: setting.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    /// Returns `true` if this error was raised while decoding an indexed term.
    pub fn is_malformed_term(&self) -> bool {
        matches!(self.kind(), ErrorKind::MalformedTerm { .. })
    }

    /// Returns `true` if a value accessor was called for a document without a value.
    pub fn is_missing_value(&self) -> bool {
        matches!(self.kind(), ErrorKind::MissingValue { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("malformed term '{term}': {reason}")]
    MalformedTerm { term: String, reason: String },

    #[error("field '{field}' has no value for document {doc}")]
    MissingValue { field: String, doc: u32 },

    #[error("ordinal {ordinal} is out of range for a value buffer of length {len}")]
    OutOfRangeOrdinal { ordinal: u32, len: usize },

    #[error("document {doc} is out of range for a segment of {max_doc} documents")]
    DocOutOfRange { doc: u32, max_doc: u32 },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("invalid format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("invalid setting '{setting}': {message}")]
    Config { setting: String, message: String },

    #[error("failed to parse settings: {source}")]
    Json { source: serde_json::Error },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("stream", e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        ErrorKind::Json { source: e }.into()
    }
}
