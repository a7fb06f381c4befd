use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// How a declaration was introduced in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    #[default]
    Ordinary,
    Typedef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Void,
    Pointer,
    Struct,
    Union,
    Enum,
    Function,
    /// Any builtin or typedef'd non-record type, e.g. `double` or `cairo_bool_t`
    Scalar,
    Array,
}

/// One C-level symbol: a typedef, a function, a struct member, a parameter or an enumerator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub storage: StorageClass,
    #[serde(rename = "type")]
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub kind: TypeKind,
    /// Spelling of the type as written in the header. Empty for derived types such as pointers
    #[serde(default)]
    pub name: String,
    /// Pointee, function return or array element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Box<Type>>,
    /// Struct members, function parameters or enumerators. `None` on a struct means it is opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decls: Option<Vec<Declaration>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_const: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<usize>,
}

impl Declaration {
    pub fn new(name: &str, ty: Type) -> Declaration {
        Declaration {
            name: name.to_string(),
            storage: StorageClass::Ordinary,
            ty,
        }
    }

    pub fn typedef(name: &str, ty: Type) -> Declaration {
        Declaration {
            name: name.to_string(),
            storage: StorageClass::Typedef,
            ty,
        }
    }

    /// A function declaration with the given return type and parameters
    pub fn function(name: &str, result: Type, params: Vec<Declaration>) -> Declaration {
        Declaration::new(name, Type::function(result, params))
    }

    pub fn is_typedef(&self) -> bool {
        self.storage == StorageClass::Typedef
    }

    pub fn is_function(&self) -> bool {
        self.ty.kind == TypeKind::Function
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Function parameters, struct members or enumerators
    pub fn members(&self) -> &[Declaration] {
        self.ty.decls()
    }
}

impl Type {
    fn bare(kind: TypeKind, name: &str) -> Type {
        Type {
            kind,
            name: name.to_string(),
            base: None,
            decls: None,
            is_const: false,
            len: None,
        }
    }

    pub fn void() -> Type {
        Type::bare(TypeKind::Void, "void")
    }

    pub fn scalar(name: &str) -> Type {
        Type::bare(TypeKind::Scalar, name)
    }

    pub fn enumeration(name: &str, enumerators: &[&str]) -> Type {
        let mut ty = Type::bare(TypeKind::Enum, name);
        ty.decls = Some(
            enumerators
                .iter()
                .map(|e| Declaration::new(e, Type::scalar("int")))
                .collect(),
        );
        ty
    }

    /// A reference to an enum by name, as it appears in a parameter list
    pub fn enum_ref(name: &str) -> Type {
        Type::bare(TypeKind::Enum, name)
    }

    /// A struct with no visible members
    pub fn opaque(name: &str) -> Type {
        Type::bare(TypeKind::Struct, name)
    }

    pub fn record(name: &str, members: Vec<Declaration>) -> Type {
        let mut ty = Type::bare(TypeKind::Struct, name);
        ty.decls = Some(members);
        ty
    }

    pub fn pointer(pointee: Type) -> Type {
        let mut ty = Type::bare(TypeKind::Pointer, "");
        ty.base = Some(Box::new(pointee));
        ty
    }

    pub fn const_pointer(pointee: Type) -> Type {
        Type::pointer(pointee.with_const())
    }

    pub fn array(element: Type, len: usize) -> Type {
        let mut ty = Type::bare(TypeKind::Array, "");
        ty.base = Some(Box::new(element));
        ty.len = Some(len);
        ty
    }

    pub fn function(result: Type, params: Vec<Declaration>) -> Type {
        let mut ty = Type::bare(TypeKind::Function, "");
        ty.base = Some(Box::new(result));
        ty.decls = Some(params);
        ty
    }

    pub fn with_const(mut self) -> Type {
        self.is_const = true;
        self
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void
    }

    pub fn is_pointer(&self) -> bool {
        self.kind == TypeKind::Pointer
    }

    pub fn is_opaque(&self) -> bool {
        self.kind == TypeKind::Struct && self.decls.is_none()
    }

    pub fn base(&self) -> Option<&Type> {
        self.base.as_deref()
    }

    pub fn decls(&self) -> &[Declaration] {
        self.decls.as_deref().unwrap_or(&[])
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name.is_empty() {
            return write!(f, "{}", self.name);
        }

        match (self.kind, self.base()) {
            (TypeKind::Pointer, Some(base)) => write!(f, "{base}*"),
            (TypeKind::Array, Some(base)) => write!(f, "{base}[{}]", self.len.unwrap_or(0)),
            (TypeKind::Function, Some(base)) => {
                let params = self
                    .decls()
                    .iter()
                    .map(|d| d.ty.to_string())
                    .collect::<Vec<_>>();
                write!(f, "{base}({})", params.join(", "))
            }
            (kind, _) => write!(f, "<anonymous {kind:?}>"),
        }
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_typedef() {
            write!(f, "typedef ")?;
        }
        write!(f, "{} {}", self.ty, self.name)
    }
}
