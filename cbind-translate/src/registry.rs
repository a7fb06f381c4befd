//! Decides, before any translation is attempted, whether a declaration is replaced by hand-written source, skipped,
//! or generated.

use std::fmt::Display;

use cbind_decl::Declaration;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Why a declaration was left out of the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipCategory {
    /// Named in the exclusion table
    Excluded,
    /// Named in the TODO table
    Unhandled,
    Callback,
    UserData,
    RefCounting,
    Anonymous,
    /// A type in the declaration has no mapping
    Unmapped,
    /// The declaration uses a construct the generator cannot express
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipKind {
    Intentional,
    Todo,
}

impl SkipCategory {
    pub fn kind(&self) -> SkipKind {
        match self {
            SkipCategory::Excluded
            | SkipCategory::Callback
            | SkipCategory::UserData
            | SkipCategory::RefCounting
            | SkipCategory::Anonymous => SkipKind::Intentional,
            SkipCategory::Unhandled
            | SkipCategory::Unmapped
            | SkipCategory::Unsupported => SkipKind::Todo,
        }
    }

    pub fn is_intentional(&self) -> bool {
        self.kind() == SkipKind::Intentional
    }
}

impl Display for SkipCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipCategory::Excluded => "excluded",
            SkipCategory::Unhandled => "unhandled",
            SkipCategory::Callback => "callback",
            SkipCategory::UserData => "user data",
            SkipCategory::RefCounting => "reference counting",
            SkipCategory::Anonymous => "anonymous",
            SkipCategory::Unmapped => "unmapped type",
            SkipCategory::Unsupported => "unsupported",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub category: SkipCategory,
    pub reason: String,
}

/// A group of name suffixes that are all skipped for the same reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRule {
    pub suffixes: Vec<String>,
    pub category: SkipCategory,
    pub reason: String,
}

impl SuffixRule {
    pub fn new(suffixes: &[&str], category: SkipCategory, reason: &str) -> SuffixRule {
        SuffixRule {
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            category,
            reason: reason.to_string(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<'c> {
    /// Emit this source verbatim instead of generating anything
    Override(&'c str),
    Skip(Skip),
    Generate,
}

/// Decide what to do with `decl`. Overrides win over everything, then the exclusion and TODO tables, then suffix
/// rules. Anonymous declarations are skipped last.
pub fn decide<'c>(config: &'c Config, decl: &Declaration) -> Decision<'c> {
    if let Some(source) = config.overrides.get(&decl.name) {
        return Decision::Override(source);
    }

    if let Some(skip) = skip_reason(config, &decl.name) {
        return Decision::Skip(skip);
    }

    if decl.is_anonymous() {
        return Decision::Skip(Skip {
            category: SkipCategory::Anonymous,
            reason: "anonymous declaration".to_string(),
        });
    }

    Decision::Generate
}

/// Look `name` up in the exclusion and TODO tables and the suffix rules. Also used for the names of referenced
/// types, so a function taking an excluded type is skipped too.
pub fn skip_reason(config: &Config, name: &str) -> Option<Skip> {
    if name.is_empty() {
        return None;
    }

    if let Some(reason) = config.exclude.get(name) {
        return Some(Skip {
            category: SkipCategory::Excluded,
            reason: reason.clone(),
        });
    }

    if let Some(reason) = config.todo.get(name) {
        return Some(Skip {
            category: SkipCategory::Unhandled,
            reason: reason.clone(),
        });
    }

    config
        .suffix_rules
        .iter()
        .find(|rule| rule.matches(name))
        .map(|rule| Skip {
            category: rule.category,
            reason: rule.reason.clone(),
        })
}
