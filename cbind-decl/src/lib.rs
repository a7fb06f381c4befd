pub mod decl;
pub mod error;

use std::path::Path;

pub use decl::{Declaration, StorageClass, Type, TypeKind};
use error::Error;
use tracing::debug;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Read a declaration list, as written by the header parser, from a JSON file
pub fn read_declarations<P: AsRef<Path>>(path: P) -> Result<Vec<Declaration>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;

    let decls = parse_declarations(&contents)?;
    debug!("read {} declarations from {}", decls.len(), path.display());
    Ok(decls)
}

pub fn parse_declarations(contents: &str) -> Result<Vec<Declaration>> {
    Ok(serde_json::from_str(contents)?)
}
