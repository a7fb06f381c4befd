//! Translation of C declarations into the model of the safe Rust API.
//!
//! A [`Translator`] is created once per run from a [`config::Config`] and fed declarations in header order. Struct
//! typedefs it has seen change how later pointers to them are mapped, so the order matters.

use std::collections::BTreeMap;
use std::fmt::Display;

use cbind_decl::Declaration;

pub mod config;
pub mod error;
pub mod function;
pub mod naming;
pub mod registry;
pub mod subtype;
pub mod typedef;
pub mod typemap;

use config::Config;
use error::Error;
use naming::Case;
use subtype::Subtypes;
use typemap::{MethodTag, ReceiverKind};

pub use function::{RArgument, RFunction, RReceiver};
pub use typedef::{RConstant, REnum, RField, RHandle, RRecord};

type Result<T, E = Error> = std::result::Result<T, E>;

/// One generated item
#[derive(Debug, Clone, PartialEq)]
pub enum RItem {
    Handle(RHandle),
    Record(RRecord),
    Enum(REnum),
    Function(RFunction),
}

/// A fragment of a generated function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Token(String),
    Block(Vec<Expr>),
    Unsafe(Box<Expr>),
    Let {
        name: String,
        ty: Option<String>,
        value: Box<Expr>,
        is_mut: bool,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    Try(Box<Expr>),
    /// An expression terminated by `;`
    Stmt(Box<Expr>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Token(s) => write!(f, "{s}"),
            Expr::Block(stmts) => {
                write!(f, "{{")?;
                for stmt in stmts {
                    write!(f, " {stmt}")?;
                }
                write!(f, " }}")
            }
            Expr::Unsafe(expr) => write!(f, "unsafe {expr}"),
            Expr::Let {
                name,
                ty,
                value,
                is_mut,
            } => {
                write!(f, "let {}{name}", if *is_mut { "mut " } else { "" })?;
                if let Some(ty) = ty {
                    write!(f, ": {ty}")?;
                }
                write!(f, " = {value};")
            }
            Expr::FunctionCall { name, args } => {
                let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
                write!(f, "{name}({})", args.join(", "))
            }
            Expr::Try(expr) => write!(f, "{expr}?"),
            Expr::Stmt(expr) => write!(f, "{expr};"),
        }
    }
}

/// What a struct typedef turned into, for mapping later references to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RecordKind {
    Handle,
    Shared(String),
    Failed,
}

pub struct Translator<'c> {
    config: &'c Config,
    subtypes: Subtypes,
    records: BTreeMap<String, RecordKind>,
}

impl<'c> Translator<'c> {
    pub fn new(config: &'c Config) -> Result<Translator<'c>> {
        config.validate()?;
        Ok(Translator {
            config,
            subtypes: config.subtypes()?,
            records: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &'c Config {
        self.config
    }

    pub fn subtypes(&self) -> &Subtypes {
        &self.subtypes
    }

    /// Rust name of the status type
    pub fn status_name(&self) -> String {
        self.config.naming.convert(&self.config.status_type, Case::Exported)
    }

    /// Whether values of the tagged type carry a status that should be checked
    pub fn has_status(&self, tag: &MethodTag) -> bool {
        tag.kind == ReceiverKind::Handle && !self.config.unchecked_receivers.contains(&tag.type_name)
    }

    /// Translate a single declaration.
    ///
    /// Errors for which [`Error::is_recoverable`] is true mean only this declaration has to be skipped.
    pub fn translate(&mut self, decl: &Declaration) -> Result<RItem> {
        if decl.is_function() {
            function::translate_function(self, decl)
                .map(RItem::Function)
                .map_err(|source| Error::TranslateFunction {
                    name: decl.name.clone(),
                    source: Box::new(source),
                })
        } else if decl.is_typedef() {
            typedef::translate_typedef(self, decl).map_err(|source| Error::TranslateTypedef {
                name: decl.name.clone(),
                source: Box::new(source),
            })
        } else {
            Err(Error::Unsupported {
                description: format!("\"{decl}\" is neither a typedef nor a function"),
            })
        }
    }
}
