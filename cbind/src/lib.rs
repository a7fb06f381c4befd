//! Generates a safe Rust module over the raw cairo `ffi` bindings from a list of C declarations.
//!
//! Each declaration is either replaced by hand-written source, skipped with a recorded reason, or translated and
//! rendered. Only a broken configuration stops a run; anything wrong with a single declaration just skips it.

use std::io::Write;
use std::path::{Path, PathBuf};

use cbind_translate::registry::{self, Decision, Skip, SkipKind};
use cbind_translate::Translator;
use cbind_util::source_iter;
use cbind_write::Writer;
use tracing::{debug, info, warn};

pub mod summary;

pub use cbind_decl::{parse_declarations, read_declarations, Declaration};
pub use cbind_translate::config::Config;
pub use cbind_write::{Formatter, PrettyPlease, Verbatim};
pub use summary::Summary;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read declarations")]
    Decl(#[from] cbind_decl::error::Error),
    #[error("Translation failed")]
    Translate(#[from] cbind_translate::error::Error),
    #[error("Failed to write bindings")]
    Write(#[from] cbind_write::error::Error),
    #[error("Failed to write output to {path}")]
    Output {
        path: String,
        source: std::io::Error,
    },
}

type Result<T, E = Error> = std::result::Result<T, E>;

/// The rendered module and what happened to each declaration
#[derive(Debug)]
pub struct Generated {
    pub source: Vec<u8>,
    pub summary: Summary,
}

/// Where the generated module goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    /// `-` means stdout, anything else is a path
    pub fn parse(s: &str) -> Output {
        if s == "-" {
            Output::Stdout
        } else {
            Output::File(PathBuf::from(s))
        }
    }

    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        match self {
            Output::Stdout => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(bytes)
                    .and_then(|_| lock.flush())
                    .map_err(|source| Error::Output {
                        path: "stdout".to_string(),
                        source,
                    })
            }
            Output::File(path) => std::fs::write(path, bytes).map_err(|source| Error::Output {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

/// Generate the safe module for `decls`, in their order.
///
/// Returns an error only when the configuration is invalid or a declaration contradicts it. The output is passed
/// through `formatter`, falling back to the unformatted text if that fails.
pub fn generate(decls: &[Declaration], config: &Config, formatter: &dyn Formatter) -> Result<Generated> {
    let mut tr = Translator::new(config)?;
    let mut writer = Writer::new();
    writer.write_preamble(&tr)?;

    let mut summary = Summary::default();

    for decl in decls {
        summary.total += 1;

        match registry::decide(config, decl) {
            Decision::Override(source) => {
                debug!("{} is written by hand", decl.name);
                writer.write_manual(source);
                summary.generated += 1;
                summary.overridden += 1;
            }
            Decision::Skip(skip) => {
                log_skip(&decl.name, &skip);
                summary.skip(skip.category);
            }
            Decision::Generate => match tr.translate(decl) {
                Ok(item) => {
                    writer.write_item(&item)?;
                    summary.generated += 1;
                }
                Err(e) => match e.skip_category() {
                    Some(category) => {
                        warn!("skipping {} ({category}): {e}", decl.name);
                        for source in source_iter(&e) {
                            warn!("  because: {source}");
                        }
                        summary.skip(category);
                    }
                    None => return Err(e.into()),
                },
            },
        }
    }

    for (category, count) in &summary.skipped {
        info!("skipped {count} ({category})");
    }
    info!("{summary}");

    Ok(Generated {
        source: writer.finalize(formatter),
        summary,
    })
}

/// Read the declaration list at `input`, generate the module and write it to `output`
pub fn generate_file(
    input: &Path,
    output: &Output,
    config: &Config,
    formatter: &dyn Formatter,
) -> Result<Summary> {
    let decls = read_declarations(input)?;
    let generated = generate(&decls, config, formatter)?;
    output.write(&generated.source)?;
    Ok(generated.summary)
}

fn log_skip(name: &str, skip: &Skip) {
    match skip.category.kind() {
        SkipKind::Intentional => info!("skipping {name} ({}): {}", skip.category, skip.reason),
        SkipKind::Todo => warn!("TODO {name} ({}): {}", skip.category, skip.reason),
    }
}
