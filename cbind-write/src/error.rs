#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("String formatting error while generating")]
    FormatError(#[from] std::fmt::Error),
    #[error("Generated source does not parse")]
    ParseError(#[from] syn::Error),
    #[error("Failed to write \"{name}\"")]
    FailedToWriteItem {
        name: String,
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
}
