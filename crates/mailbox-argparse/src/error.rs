use std::path::PathBuf;

/// Programming errors caught while describing arguments.
///
/// These mean the calling code is wrong, not the user input, so callers are
/// expected to propagate them and abort startup.
#[derive(Debug, thiserror::Error)]
pub enum DescribeError {
    #[error("argument key must not be empty")]
    EmptyKey,
    #[error("argument '{0}' is already described")]
    DuplicateKey(String),
    #[error("argument '{key}' has no switches")]
    NoSwitches { key: String },
    #[error("argument '{key}' has an empty switch")]
    EmptySwitch { key: String },
    #[error("switch '{switch}' of argument '{key}' is already used by '{existing}'")]
    DuplicateSwitch {
        key: String,
        switch: String,
        existing: String,
    },
    #[error("argument '{key}' has no label")]
    EmptyLabel { key: String },
    #[error("argument '{key}' has no help text")]
    EmptyHelp { key: String },
    #[error("argument '{key}' depends on '{dependency}', which has not been described yet")]
    UnknownDependency { key: String, dependency: String },
    #[error("argument '{key}' takes options but none were given")]
    NoOptions { key: String },
    #[error("default '{default}' of argument '{key}' is not one of its options")]
    DefaultNotAnOption { key: String, default: String },
}

/// Failure to load an args file during parsing.
#[derive(Debug, thiserror::Error)]
pub enum ArgsFileError {
    #[error("failed to read args file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse args file JSON: {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("args file must contain a JSON object: {}", path.display())]
    NotAnObject { path: PathBuf },
}

/// The kinds of problems parsing can report about user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    UnrecognisedSwitch,
    IncorrectType,
    FileSystemObjectNotFound,
    RequiredArgMissing,
    NoValue,
    UnknownOption,
}

/// One problem found in the user's input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    value: Option<String>,
    key: Option<String>,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        value: Option<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            value,
            key: Some(key.into()),
        }
    }

    pub(crate) fn unrecognised(token: String) -> Self {
        Self {
            kind: ValidationErrorKind::UnrecognisedSwitch,
            value: Some(token),
            key: None,
        }
    }

    pub(crate) fn missing(key: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::RequiredArgMissing, None, key)
    }

    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// The offending literal, when there is one.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Key of the argument the error belongs to. `None` for unrecognised
    /// switches.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}
