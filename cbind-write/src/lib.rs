//! Renders translated items as Rust source.

use cbind_translate::{RItem, Translator};
use tracing::warn;

pub mod error;
pub mod gen_rust;
pub mod preamble;

use error::Error;

type Result<T, E = Error> = std::result::Result<T, E>;

fn item_name(item: &RItem) -> &str {
    match item {
        RItem::Handle(h) => &h.c_name,
        RItem::Record(r) => &r.c_name,
        RItem::Enum(e) => &e.c_name,
        RItem::Function(f) => &f.c_name,
    }
}

/// Turns the generated text into its final form. Implementations may fail, in which case the unformatted text is
/// used.
pub trait Formatter {
    fn format(&self, source: &str) -> Result<String>;
}

/// Parses the source with `syn` and prints it with `prettyplease`
pub struct PrettyPlease;

impl Formatter for PrettyPlease {
    fn format(&self, source: &str) -> Result<String> {
        let file = syn::parse_file(source)?;
        Ok(prettyplease::unparse(&file))
    }
}

/// Leaves the source as it is
pub struct Verbatim;

impl Formatter for Verbatim {
    fn format(&self, source: &str) -> Result<String> {
        Ok(source.to_string())
    }
}

/// Append-only buffer for the generated module
#[derive(Debug, Default)]
pub struct Writer {
    source: String,
}

impl Writer {
    pub fn new() -> Writer {
        Writer::default()
    }

    pub fn print(&mut self, text: &str) {
        self.source.push_str(text);
    }

    pub fn write_preamble(&mut self, tr: &Translator) -> Result<()> {
        preamble::write_preamble(&mut self.source, tr)
    }

    pub fn write_item(&mut self, item: &RItem) -> Result<()> {
        gen_rust::write_item(&mut self.source, item).map_err(|source| Error::FailedToWriteItem {
            name: item_name(item).to_string(),
            source: Box::new(source),
        })
    }

    /// Write hand-written source in place of a generated item
    pub fn write_manual(&mut self, text: &str) {
        self.source.push_str(text.trim());
        self.source.push_str("\n\n");
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run the buffer through `formatter`. If that fails the error is logged and the raw text returned.
    pub fn finalize(self, formatter: &dyn Formatter) -> Vec<u8> {
        match formatter.format(&self.source) {
            Ok(formatted) => formatted.into_bytes(),
            Err(e) => {
                warn!("could not format the generated source, writing it as is: {e}");
                self.source.into_bytes()
            }
        }
    }
}
