use crate::registry::SkipCategory;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to translate function \"{name}\"")]
    TranslateFunction {
        name: String,
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("Failed to translate typedef \"{name}\"")]
    TranslateTypedef {
        name: String,
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("Failed to translate return type")]
    TranslateResult {
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("Failed to translate argument \"{name}\"")]
    TranslateArgument {
        name: String,
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("Failed to translate field \"{name}\"")]
    TranslateField {
        name: String,
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("No mapping for type \"{ty}\": {reason}")]
    Unmapped { ty: String, reason: String },
    #[error("Unsupported feature: \"{description}\"")]
    Unsupported { description: String },
    #[error("Field \"{name}\" of type \"{ty}\" does not have the same layout as its C counterpart")]
    FieldLayout { name: String, ty: String },
    #[error("outParams for \"{function}\" has {flags} entries but the function takes {params} parameters")]
    OutParamMismatch {
        function: String,
        flags: usize,
        params: usize,
    },
    #[error("\"{function}\" has both outParams and a return type")]
    OutParamWithReturn { function: String },
    #[error("Out parameter \"{param}\" of \"{function}\" is not a pointer")]
    OutParamNotPointer { function: String, param: String },
    #[error("Out parameter \"{param}\" of \"{function}\" points to \"{ty}\", which cannot be stored on the stack")]
    OutParamNotScalar {
        function: String,
        param: String,
        ty: String,
    },
    #[error("Array parameter {index} of \"{function}\" has no length parameter after it")]
    ArrayParamWithoutLength { function: String, index: usize },
    #[error("Array parameter \"{param}\" of \"{function}\" has element type \"{ty}\" without a C layout")]
    ArrayParamLayout {
        function: String,
        param: String,
        ty: String,
    },
    #[error("In \"{function}\", need a conversion to C for \"{param}\"")]
    MissingToSource { function: String, param: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Could not read configuration")]
    ReadConfig(#[from] std::io::Error),
    #[error("Could not parse configuration")]
    ParseConfig(#[from] serde_json::Error),
}

impl Error {
    /// The skip category this error is counted under, or `None` if the error must abort generation.
    ///
    /// Wrapping errors defer to their source, so an unmapped argument buried in a function is still recoverable
    /// while a broken out-parameter table is not.
    pub fn skip_category(&self) -> Option<SkipCategory> {
        match self {
            Error::Unmapped { .. } => Some(SkipCategory::Unmapped),
            Error::Unsupported { .. } | Error::FieldLayout { .. } => Some(SkipCategory::Unsupported),
            Error::TranslateFunction { source, .. }
            | Error::TranslateTypedef { source, .. }
            | Error::TranslateResult { source }
            | Error::TranslateArgument { source, .. }
            | Error::TranslateField { source, .. } => source
                .downcast_ref::<Error>()
                .and_then(Error::skip_category),
            _ => None,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.skip_category().is_some()
    }

    pub(crate) fn unmapped(ty: &impl std::fmt::Display, reason: impl Into<String>) -> Error {
        Error::Unmapped {
            ty: ty.to_string(),
            reason: reason.into(),
        }
    }
}
