//! Inheritance emulation.
//!
//! cairo has a handful of "subclasses" that share the base type's C pointer, e.g. every image surface is a
//! `cairo_surface_t`. The generated code models these as structs embedding the base handle and dereferencing to it,
//! so all base methods are callable on the derived type. This module decides which functions become methods of a
//! derived type and which return values are narrowed to one.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::naming::fn_name;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypePair {
    pub derived: String,
    pub base: String,
}

impl SubtypePair {
    pub fn new(derived: &str, base: &str) -> SubtypePair {
        SubtypePair {
            derived: derived.to_string(),
            base: base.to_string(),
        }
    }

    /// Name of the field holding the embedded base value
    pub fn field(&self) -> String {
        fn_name(&self.base)
    }
}

/// Result of method inference for one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrowed {
    pub method: String,
    /// Set when the method belongs to a derived type rather than the type of the first parameter
    pub receiver: Option<String>,
}

/// The validated set of subtype relationships
#[derive(Debug, Clone)]
pub struct Subtypes {
    primary: String,
    pairs: Vec<SubtypePair>,
    aliases: BTreeMap<String, String>,
}

impl Subtypes {
    pub fn new(
        primary: &str,
        pairs: &[SubtypePair],
        aliases: &BTreeMap<String, String>,
    ) -> Result<Subtypes> {
        let mut derived = HashSet::new();
        for pair in pairs {
            if pair.derived == pair.base {
                return Err(Error::InvalidConfig(format!(
                    "\"{}\" is registered as a subtype of itself",
                    pair.derived
                )));
            }
            if !derived.insert(pair.derived.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "\"{}\" is registered as a subtype more than once",
                    pair.derived
                )));
            }
        }

        // walk the base chain from every derived type, there are only a few pairs
        for pair in pairs {
            let mut seen = HashSet::new();
            let mut current = pair.derived.as_str();
            while let Some(next) = pairs.iter().find(|p| p.derived == current) {
                if !seen.insert(current) {
                    return Err(Error::InvalidConfig(format!(
                        "subtype registrations for \"{}\" form a cycle",
                        pair.derived
                    )));
                }
                current = next.base.as_str();
            }
        }

        for a in pairs {
            for b in pairs {
                if a.derived != b.derived && a.base == b.base && b.derived.starts_with(&a.derived) {
                    return Err(Error::InvalidConfig(format!(
                        "subtypes \"{}\" and \"{}\" of \"{}\" are ambiguous: one is a prefix of the other",
                        a.derived, b.derived, a.base
                    )));
                }
            }
        }

        for (function, target) in aliases {
            if !derived.contains(target.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "return alias for \"{function}\" names \"{target}\", which is not a registered subtype"
                )));
            }
        }

        Ok(Subtypes {
            primary: primary.to_string(),
            pairs: pairs.to_vec(),
            aliases: aliases.clone(),
        })
    }

    pub fn pairs(&self) -> &[SubtypePair] {
        &self.pairs
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Decide whether the function `candidate`, whose first parameter has type `declared`, is a method and what it
    /// is called.
    ///
    /// The primary receiver keeps the whole name. Otherwise a registered subtype of `declared` that prefixes the name
    /// takes the method, then `declared` itself.
    pub fn narrow(&self, candidate: &str, declared: &str) -> Option<Narrowed> {
        if declared == self.primary {
            return Some(Narrowed {
                method: candidate.to_string(),
                receiver: None,
            });
        }

        for pair in self.pairs.iter().filter(|p| p.base == declared) {
            if let Some(method) = strip(candidate, &pair.derived) {
                return Some(Narrowed {
                    method: method.to_string(),
                    receiver: Some(pair.derived.clone()),
                });
            }
        }

        strip(candidate, declared).map(|method| Narrowed {
            method: method.to_string(),
            receiver: None,
        })
    }

    /// The subtype a returned `handle` should be wrapped in, if any
    pub fn narrow_return(&self, c_name: &str, candidate: &str, handle: &str) -> Option<&SubtypePair> {
        let alias = self.aliases.get(c_name);
        self.pairs.iter().find(|p| {
            p.base == handle
                && (alias == Some(&p.derived) || candidate.starts_with(p.derived.as_str()))
        })
    }
}

fn strip<'a>(candidate: &'a str, prefix: &str) -> Option<&'a str> {
    candidate
        .strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{Narrowed, SubtypePair, Subtypes};
    use crate::config::Config;
    use crate::error::Error;

    fn method(name: &str, receiver: Option<&str>) -> Option<Narrowed> {
        Some(Narrowed {
            method: name.to_string(),
            receiver: receiver.map(|r| r.to_string()),
        })
    }

    #[test]
    fn narrow_methods() -> Result<(), Error> {
        let subtypes = Config::default().subtypes()?;

        assert_eq!(
            subtypes.narrow("SetSourceRGB", "Context"),
            method("SetSourceRGB", None)
        );
        assert_eq!(
            subtypes.narrow("ImageSurfaceGetFormat", "Surface"),
            method("GetFormat", Some("ImageSurface"))
        );
        assert_eq!(
            subtypes.narrow("SurfaceObserverElapsed", "Surface"),
            method("Elapsed", Some("SurfaceObserver"))
        );
        assert_eq!(subtypes.narrow("SurfaceFlush", "Surface"), method("Flush", None));
        assert_eq!(subtypes.narrow("PatternStatus", "Pattern"), method("Status", None));
        // a subtype of a different base is not considered
        assert_eq!(subtypes.narrow("ImageSurfaceGetWidth", "Pattern"), None);
        assert_eq!(subtypes.narrow("Create", "Surface"), None);
        assert_eq!(subtypes.narrow("Surface", "Surface"), None);

        Ok(())
    }

    #[test]
    fn narrow_returns() -> Result<(), Error> {
        let subtypes = Config::default().subtypes()?;

        let pair = subtypes.narrow_return("cairo_image_surface_create", "ImageSurfaceCreate", "Surface");
        assert_eq!(pair.map(|p| p.derived.as_str()), Some("ImageSurface"));

        let pair = subtypes.narrow_return("cairo_surface_create_observer", "SurfaceCreateObserver", "Surface");
        assert_eq!(pair.map(|p| p.derived.as_str()), Some("SurfaceObserver"));

        assert!(subtypes
            .narrow_return("cairo_surface_create_similar", "SurfaceCreateSimilar", "Surface")
            .is_none());
        assert!(subtypes
            .narrow_return("cairo_image_surface_create", "ImageSurfaceCreate", "Pattern")
            .is_none());

        Ok(())
    }

    #[test]
    fn invalid_registrations() {
        let none = BTreeMap::new();

        let cycle = [SubtypePair::new("A", "B"), SubtypePair::new("B", "A")];
        assert!(Subtypes::new("Context", &cycle, &none).is_err());

        let twice = [SubtypePair::new("A", "B"), SubtypePair::new("A", "C")];
        assert!(Subtypes::new("Context", &twice, &none).is_err());

        let itself = [SubtypePair::new("A", "A")];
        assert!(Subtypes::new("Context", &itself, &none).is_err());

        let ambiguous = [
            SubtypePair::new("ImageSurface", "Surface"),
            SubtypePair::new("ImageSurfaceView", "Surface"),
        ];
        assert!(Subtypes::new("Context", &ambiguous, &none).is_err());

        // the same prefix under different bases is fine
        let distinct = [
            SubtypePair::new("Image", "Surface"),
            SubtypePair::new("ImagePattern", "Pattern"),
        ];
        assert!(Subtypes::new("Context", &distinct, &none).is_ok());

        let mut aliases = BTreeMap::new();
        aliases.insert("cairo_foo".to_string(), "Bar".to_string());
        assert!(Subtypes::new("Context", &distinct, &aliases).is_err());
    }

    #[test]
    fn embedded_field_name() {
        assert_eq!(SubtypePair::new("ToyFontFace", "FontFace").field(), "font_face");
    }
}
