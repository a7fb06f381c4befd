//! Conversion of C identifiers to Rust identifiers.
//!
//! [`NamingConfig::convert`] produces CamelCase names such as `ImageSurfaceCreate` from `cairo_image_surface_create`.
//! Method inference works on these names, and the final Rust spelling of functions, fields and locals is derived
//! from them with [`fn_name`].

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashSet;
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Every token is capitalized, e.g. `ImageSurfaceCreate`
    Exported,
    /// The first token is left as written, e.g. `lineWidth`
    Unexported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Tokens dropped from every name, such as the library prefix and the `_t` type suffix
    pub filler: BTreeSet<String>,
    /// Whole-name replacements consulted before splitting
    pub renames: BTreeMap<String, String>,
    /// Tokens rendered fully upper-case
    pub acronyms: BTreeSet<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig {
            filler: ["cairo", "t"].iter().map(|s| s.to_string()).collect(),
            renames: [("cairo_t".to_string(), "Context".to_string())]
                .into_iter()
                .collect(),
            acronyms: [
                "argb", "argb32", "bgr", "cogl", "ctm", "drm", "png", "rgb", "rgb16", "rgb24", "rgb30",
                "rgba", "vbgr", "vrgb", "xcb", "xml", "xor",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl NamingConfig {
    pub fn convert(&self, name: &str, case: Case) -> String {
        if let Some(renamed) = self.renames.get(name) {
            return match case {
                Case::Exported => renamed.clone(),
                Case::Unexported => lower_first(renamed),
            };
        }

        let mut out = String::new();
        for part in name.split('_') {
            if part.is_empty() || self.filler.contains(part) {
                continue;
            }

            if case == Case::Exported || !out.is_empty() {
                if self.acronyms.contains(part) {
                    out.push_str(&part.to_uppercase());
                } else {
                    out.push_str(&title(part));
                }
            } else {
                out.push_str(part);
            }
        }

        out
    }

    /// Name of the constant generated for an enumerator, e.g. `CAIRO_FORMAT_RGB24` -> `FormatRGB24`
    pub fn constant_name(&self, enumerator: &str) -> String {
        self.convert(&enumerator.to_lowercase(), Case::Exported)
    }

    /// Rust name for a parameter or local. Unnamed parameters get a positional name.
    pub fn local_name(&self, name: &str, index: usize) -> String {
        let converted = self.convert(name, Case::Unexported);
        if converted.is_empty() {
            format!("arg{index}")
        } else {
            fn_name(&converted)
        }
    }
}

/// Snake-case spelling of a converted name, escaped if it collides with a keyword
pub fn fn_name(name: &str) -> String {
    sanitize_name(&name.to_snake_case()).into_owned()
}

pub fn sanitize_name(name: &str) -> Cow<'_, str> {
    match name {
        "as" | "break" | "const" | "continue" | "crate" | "else" | "enum" | "extern" | "false"
        | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop" | "match" | "mod" | "move"
        | "mut" | "pub" | "ref" | "return" | "self" | "Self" | "static" | "struct" | "super"
        | "trait" | "true" | "type" | "unsafe" | "use" | "where" | "while" | "async" | "await"
        | "dyn" | "abstract" | "become" | "box" | "do" | "final" | "macro" | "override" | "priv"
        | "typeof" | "unsized" | "virtual" | "yield" | "try" | "union" => format!("{name}_").into(),
        _ => name.into(),
    }
}

/// Returns `name`, or `name` with a numeric suffix if it has already been used in this scope
pub fn unique_name(name: &str, used_names: &mut HashSet<String>) -> String {
    let mut result = name.to_string();
    let mut i = 1;
    while used_names.contains(&result) {
        result = format!("{name}{i}");
        i += 1;
    }

    used_names.insert(result.clone());
    result
}

fn title(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
