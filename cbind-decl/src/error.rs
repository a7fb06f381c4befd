#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error reading \"{path}\"")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Could not parse declaration list")]
    Json(#[from] serde_json::Error),
}
