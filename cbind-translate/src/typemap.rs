//! Mapping of C types to the Rust types used in the safe API, together with the conversions in both directions.
//!
//! Conversions are data rather than closures so they can be compared in tests and rendered when the function body is
//! built.

use cbind_decl::{Type, TypeKind};

use crate::error::Error;
use crate::naming::Case;
use crate::registry;
use crate::{Expr, RecordKind, Translator};

type Result<T, E = Error> = std::result::Result<T, E>;

/// How a method receiver is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverKind {
    /// `&self` on an owning handle
    Handle,
    /// `&self` or `&mut self` on a `#[repr(C)]` record
    Shared { is_const: bool },
    /// `self` on a `Copy` value type
    Value,
}

/// Marks a mapped type as able to receive methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTag {
    pub type_name: String,
    pub kind: ReceiverKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    Void,
    Scalar,
    Bool,
    Status,
    String,
    Enum,
    Handle,
    /// Reference to a record or scalar with C layout
    SharedPointer,
    RawPointer,
    /// A `#[repr(C)]` record passed by value
    Record,
}

/// Conversion from the C value to the Rust value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToTarget {
    Cast,
    Newtype(String),
    Bool,
    Status(String),
    String,
    Wrap(String),
    WrapBorrowed(String),
    Transmute,
    Pass,
    /// Wrap the value converted by `inner` in the derived type embedding it
    Narrow {
        derived: String,
        field: String,
        inner: Box<ToTarget>,
    },
}

impl ToTarget {
    pub fn apply(&self, x: &str) -> String {
        match self {
            ToTarget::Cast => format!("{x} as _"),
            ToTarget::Newtype(t) => format!("{t}({x})"),
            ToTarget::Bool => format!("{x} != 0"),
            ToTarget::Status(t) => format!("{t}({x}).to_result()"),
            ToTarget::String => format!("CStr::from_ptr({x}).to_string_lossy().into_owned()"),
            ToTarget::Wrap(t) => format!("{t}::wrap({x})"),
            ToTarget::WrapBorrowed(t) => format!("{t}::wrap_borrowed({x})"),
            ToTarget::Transmute => format!("std::mem::transmute({x})"),
            ToTarget::Pass => x.to_string(),
            ToTarget::Narrow {
                derived,
                field,
                inner,
            } => format!("{derived} {{ {field}: {} }}", inner.apply(x)),
        }
    }
}

/// Conversion from the Rust value to the C value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToSource {
    Cast,
    Field0,
    /// Copy into a temporary `CString` that lives until the end of the function
    CString,
    HandlePtr,
    SharedPtr { target: String, is_const: bool },
    Transmute,
    Pass,
}

/// A converted expression, and the statement that must run before it, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub expr: String,
    pub setup: Option<Expr>,
}

impl ToSource {
    pub fn apply(&self, x: &str) -> Converted {
        let expr = match self {
            ToSource::Cast => format!("{x} as _"),
            ToSource::Field0 => format!("{x}.0"),
            ToSource::CString => {
                let local = format!("c_{x}");
                return Converted {
                    expr: format!("{local}.as_ptr()"),
                    setup: Some(Expr::Let {
                        name: local,
                        ty: None,
                        value: Box::new(Expr::Token(format!(
                            "CString::new({x}).expect(\"string contains an interior nul byte\")"
                        ))),
                        is_mut: false,
                    }),
                };
            }
            ToSource::HandlePtr => format!("{x}.ptr"),
            ToSource::SharedPtr { target, is_const } => {
                let ptr = if *is_const { "*const" } else { "*mut" };
                format!("{x} as {ptr} {target} as {ptr} _")
            }
            ToSource::Transmute => format!("std::mem::transmute({x})"),
            ToSource::Pass => x.to_string(),
        };

        Converted { expr, setup: None }
    }
}

/// Everything the synthesizer needs to know about one C type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMapping {
    pub kind: MappingKind,
    pub target: String,
    /// Type used when the value is passed in, if it differs from `target`
    pub input: Option<String>,
    /// Rust spelling of the C representation
    pub c_repr: String,
    pub to_target: Option<ToTarget>,
    pub to_source: Option<ToSource>,
    pub method: Option<MethodTag>,
    /// True when the Rust value has the same layout as the C value
    pub layout_safe: bool,
}

impl TypeMapping {
    fn void() -> TypeMapping {
        TypeMapping {
            kind: MappingKind::Void,
            target: "()".to_string(),
            input: None,
            c_repr: "c_void".to_string(),
            to_target: None,
            to_source: None,
            method: None,
            layout_safe: false,
        }
    }

    fn value(kind: MappingKind, target: &str, c_repr: &str, to_target: ToTarget, to_source: ToSource) -> TypeMapping {
        TypeMapping {
            kind,
            target: target.to_string(),
            input: None,
            c_repr: c_repr.to_string(),
            to_target: Some(to_target),
            to_source: Some(to_source),
            method: None,
            layout_safe: true,
        }
    }

    pub fn input_type(&self) -> &str {
        self.input.as_deref().unwrap_or(&self.target)
    }

    pub fn is_void(&self) -> bool {
        self.kind == MappingKind::Void
    }

    pub fn is_status(&self) -> bool {
        self.kind == MappingKind::Status
    }

    /// Can this be declared as a local, default-initialized and written through a pointer
    pub fn is_scalar_like(&self) -> bool {
        matches!(
            self.kind,
            MappingKind::Scalar | MappingKind::Bool | MappingKind::Enum
        )
    }

    /// The method tag if this is an owning handle
    pub fn handle(&self) -> Option<&MethodTag> {
        self.method
            .as_ref()
            .filter(|m| m.kind == ReceiverKind::Handle)
    }
}

/// Rust target and C representation of the builtin scalars
fn primitive(name: &str) -> Option<(&'static str, &'static str)> {
    let p = match name {
        "int" | "signed int" => ("i32", "c_int"),
        "uint" | "unsigned int" => ("u32", "c_uint"),
        "long" | "signed long" => ("i64", "c_long"),
        "ulong" | "unsigned long" => ("u64", "c_ulong"),
        "double" => ("f64", "c_double"),
        "float" => ("f32", "c_float"),
        "char" | "signed char" => ("i8", "c_char"),
        "uchar" | "unsigned char" => ("u8", "c_uchar"),
        "short" => ("i16", "c_short"),
        "ushort" | "unsigned short" => ("u16", "c_ushort"),
        "longlong" | "long long" => ("i64", "c_longlong"),
        "ulonglong" | "unsigned long long" => ("u64", "c_ulonglong"),
        _ => return None,
    };
    Some(p)
}

impl<'c> Translator<'c> {
    /// Map `ty` to its Rust representation. Types that cannot be mapped return [`Error::Unmapped`] with the reason,
    /// which causes the enclosing declaration to be skipped.
    pub fn map_type(&self, ty: &Type) -> Result<TypeMapping> {
        let config = self.config;

        if ty.name == config.bool_type {
            let c_repr = format!("ffi::{}", ty.name);
            return Ok(TypeMapping {
                layout_safe: false,
                ..TypeMapping::value(MappingKind::Bool, "bool", &c_repr, ToTarget::Bool, ToSource::Cast)
            });
        }

        if ty.name == config.status_type {
            let status = self.status_name();
            return Ok(TypeMapping {
                kind: MappingKind::Status,
                target: format!("Result<(), {status}>"),
                input: None,
                c_repr: format!("ffi::{}", ty.name),
                to_target: Some(ToTarget::Status(status)),
                to_source: None,
                method: None,
                layout_safe: false,
            });
        }

        if config.raw_scalar_types.contains(&ty.name) {
            return Ok(TypeMapping::value(
                MappingKind::Scalar,
                "u64",
                "c_ulong",
                ToTarget::Cast,
                ToSource::Cast,
            ));
        }

        if let Some(skip) = registry::skip_reason(config, &ty.name) {
            return Err(Error::unmapped(ty, skip.reason));
        }

        match ty.kind {
            TypeKind::Void => Ok(TypeMapping::void()),
            TypeKind::Pointer => self.map_pointer(ty),
            TypeKind::Function => Err(Error::unmapped(ty, "function types are not supported")),
            TypeKind::Array => Err(Error::unmapped(
                ty,
                "arrays are only supported as record fields",
            )),
            TypeKind::Struct => self.map_record_value(ty),
            TypeKind::Union => Err(Error::unmapped(ty, "unions are not supported")),
            TypeKind::Enum => self.map_named(ty),
            TypeKind::Scalar => match primitive(&ty.name) {
                Some((target, c_repr)) => Ok(TypeMapping::value(
                    MappingKind::Scalar,
                    target,
                    c_repr,
                    ToTarget::Cast,
                    ToSource::Cast,
                )),
                None => self.map_named(ty),
            },
        }
    }

    fn map_pointer(&self, ty: &Type) -> Result<TypeMapping> {
        let config = self.config;
        let base = ty
            .base()
            .ok_or_else(|| Error::unmapped(ty, "pointer without a pointee"))?;

        match base.kind {
            TypeKind::Function => return Err(Error::unmapped(ty, "callbacks are not supported")),
            TypeKind::Pointer => return Err(Error::unmapped(ty, "pointer to pointer")),
            TypeKind::Void => return Err(Error::unmapped(ty, "untyped pointer")),
            _ if base.name.is_empty() => return Err(Error::unmapped(ty, "anonymous pointee")),
            _ => (),
        }

        if config.raw_pointer_types.contains(&base.name) {
            return Ok(TypeMapping::value(
                MappingKind::RawPointer,
                "*mut c_void",
                "*mut c_void",
                ToTarget::Pass,
                ToSource::Cast,
            ));
        }

        if config.string_pointees.contains(&base.name) {
            return Ok(TypeMapping {
                kind: MappingKind::String,
                target: "String".to_string(),
                input: Some("&str".to_string()),
                c_repr: "*const c_char".to_string(),
                to_target: Some(ToTarget::String),
                to_source: Some(ToSource::CString),
                method: None,
                layout_safe: false,
            });
        }

        if config.excluded_pointees.contains(&base.name) {
            return Err(Error::unmapped(ty, "untyped byte pointer"));
        }

        if let Some(skip) = registry::skip_reason(config, &base.name) {
            return Err(Error::unmapped(ty, skip.reason));
        }

        match base.kind {
            TypeKind::Struct => match self.records.get(&base.name) {
                Some(RecordKind::Shared(target)) => Ok(shared_pointer(target, base.is_const, true)),
                Some(RecordKind::Failed) => Err(Error::unmapped(
                    ty,
                    format!("record \"{}\" was not translated", base.name),
                )),
                Some(RecordKind::Handle) | None => Ok(self.handle(&base.name)),
            },
            TypeKind::Scalar | TypeKind::Enum => {
                let pointee = self.map_type(base)?;
                if pointee.layout_safe {
                    Ok(shared_pointer(&pointee.target, base.is_const, false))
                } else {
                    Err(Error::unmapped(
                        ty,
                        format!("\"{}\" has a different layout in Rust", pointee.target),
                    ))
                }
            }
            _ => Err(Error::unmapped(ty, "unsupported pointee")),
        }
    }

    fn handle(&self, c_name: &str) -> TypeMapping {
        let target = self.config.naming.convert(c_name, Case::Exported);
        TypeMapping {
            kind: MappingKind::Handle,
            input: Some(format!("&{target}")),
            c_repr: format!("*mut ffi::{c_name}"),
            to_target: Some(ToTarget::Wrap(target.clone())),
            to_source: Some(ToSource::HandlePtr),
            method: Some(MethodTag {
                type_name: target.clone(),
                kind: ReceiverKind::Handle,
            }),
            layout_safe: false,
            target,
        }
    }

    fn map_record_value(&self, ty: &Type) -> Result<TypeMapping> {
        match self.records.get(&ty.name) {
            Some(RecordKind::Shared(target)) => Ok(TypeMapping::value(
                MappingKind::Record,
                target,
                &format!("ffi::{}", ty.name),
                ToTarget::Transmute,
                ToSource::Transmute,
            )),
            _ => Err(Error::unmapped(
                ty,
                "only records with a C layout can be passed by value",
            )),
        }
    }

    /// Enums, and any scalar typedef that is not a builtin, become a newtype over the C type
    fn map_named(&self, ty: &Type) -> Result<TypeMapping> {
        if ty.name.is_empty() {
            return Err(Error::unmapped(ty, "anonymous type"));
        }

        let target = self.config.naming.convert(&ty.name, Case::Exported);
        let method = self
            .config
            .value_receivers
            .contains(&target)
            .then(|| MethodTag {
                type_name: target.clone(),
                kind: ReceiverKind::Value,
            });

        Ok(TypeMapping {
            method,
            ..TypeMapping::value(
                MappingKind::Enum,
                &target,
                &format!("ffi::{}", ty.name),
                ToTarget::Newtype(target.clone()),
                ToSource::Field0,
            )
        })
    }
}

fn shared_pointer(target: &str, is_const: bool, is_receiver: bool) -> TypeMapping {
    TypeMapping {
        kind: MappingKind::SharedPointer,
        target: if is_const {
            format!("&{target}")
        } else {
            format!("&mut {target}")
        },
        input: None,
        c_repr: if is_const {
            format!("*const {target}")
        } else {
            format!("*mut {target}")
        },
        // a reference with no lifetime to tie it to cannot be returned
        to_target: None,
        to_source: Some(ToSource::SharedPtr {
            target: target.to_string(),
            is_const,
        }),
        method: is_receiver.then(|| MethodTag {
            type_name: target.to_string(),
            kind: ReceiverKind::Shared { is_const },
        }),
        layout_safe: false,
    }
}

#[cfg(test)]
mod tests {
    use cbind_decl::{Declaration, Type, TypeKind};

    use super::{MappingKind, ReceiverKind, ToSource, ToTarget};
    use crate::config::Config;
    use crate::error::Error;
    use crate::registry::SkipCategory;
    use crate::Translator;

    #[test]
    fn scalars() -> Result<(), Error> {
        let config = Config::default();
        let tr = Translator::new(&config)?;

        let m = tr.map_type(&Type::scalar("double"))?;
        assert_eq!(m.target, "f64");
        assert!(m.layout_safe);
        assert_eq!(m.to_target.as_ref().map(|t| t.apply("x")).as_deref(), Some("x as _"));

        let m = tr.map_type(&Type::scalar("cairo_bool_t"))?;
        assert_eq!(m.kind, MappingKind::Bool);
        assert_eq!(m.to_target.as_ref().map(|t| t.apply("x")).as_deref(), Some("x != 0"));
        assert!(!m.layout_safe);

        let m = tr.map_type(&Type::scalar("Drawable"))?;
        assert_eq!(m.target, "u64");

        Ok(())
    }

    #[test]
    fn status_has_no_reverse_conversion() -> Result<(), Error> {
        let config = Config::default();
        let tr = Translator::new(&config)?;

        let m = tr.map_type(&Type::enum_ref("cairo_status_t"))?;
        assert!(m.is_status());
        assert_eq!(m.target, "Result<(), Status>");
        assert!(m.to_source.is_none());
        assert_eq!(
            m.to_target.map(|t| t.apply("x")).as_deref(),
            Some("Status(x).to_result()")
        );

        Ok(())
    }

    #[test]
    fn enums_and_value_receivers() -> Result<(), Error> {
        let config = Config::default();
        let tr = Translator::new(&config)?;

        let m = tr.map_type(&Type::enum_ref("cairo_format_t"))?;
        assert_eq!(m.target, "Format");
        assert_eq!(m.c_repr, "ffi::cairo_format_t");
        assert_eq!(m.method.map(|t| t.kind), Some(ReceiverKind::Value));

        let m = tr.map_type(&Type::enum_ref("cairo_antialias_t"))?;
        assert_eq!(m.target, "Antialias");
        assert!(m.method.is_none());
        assert_eq!(m.to_source, Some(ToSource::Field0));

        Ok(())
    }

    #[test]
    fn pointers() -> Result<(), Error> {
        let config = Config::default();
        let mut tr = Translator::new(&config)?;

        let m = tr.map_type(&Type::const_pointer(Type::scalar("char")))?;
        assert_eq!(m.input_type(), "&str");
        let converted = m.to_source.as_ref().map(|s| s.apply("family"));
        assert_eq!(
            converted.map(|c| c.expr).as_deref(),
            Some("c_family.as_ptr()")
        );

        let m = tr.map_type(&Type::pointer(Type::opaque("cairo_surface_t")))?;
        assert_eq!(m.target, "Surface");
        assert_eq!(m.input_type(), "&Surface");
        assert_eq!(m.to_target, Some(ToTarget::Wrap("Surface".to_string())));
        assert_eq!(m.handle().map(|t| t.type_name.as_str()), Some("Surface"));

        tr.translate(&Declaration::typedef(
            "cairo_matrix_t",
            Type::record(
                "_cairo_matrix",
                ["xx", "yx", "xy", "yy", "x0", "y0"]
                    .iter()
                    .map(|f| Declaration::new(f, Type::scalar("double")))
                    .collect(),
            ),
        ))?;

        let m = tr.map_type(&Type::const_pointer(Type::opaque("cairo_matrix_t")))?;
        assert_eq!(m.target, "&Matrix");
        assert_eq!(
            m.method.map(|t| t.kind),
            Some(ReceiverKind::Shared { is_const: true })
        );
        assert_eq!(
            m.to_source.map(|s| s.apply("matrix").expr).as_deref(),
            Some("matrix as *const Matrix as *const _")
        );

        let m = tr.map_type(&Type::pointer(Type::scalar("double")))?;
        assert_eq!(m.target, "&mut f64");
        assert!(m.method.is_none());

        let m = tr.map_type(&Type::pointer(Type::opaque("Display")))?;
        assert_eq!(m.kind, MappingKind::RawPointer);

        Ok(())
    }

    #[test]
    fn unmapped_types_are_recoverable() -> Result<(), Error> {
        let config = Config::default();
        let tr = Translator::new(&config)?;

        for ty in [
            Type::pointer(Type::scalar("unsigned char")),
            Type::pointer(Type::void()),
            Type::pointer(Type::pointer(Type::scalar("char"))),
            Type::pointer(Type::opaque("cairo_rectangle_list_t")),
            Type::pointer(Type::function(Type::void(), vec![])),
            Type::scalar("cairo_write_func_t"),
            Type::array(Type::scalar("double"), 4),
            Type::opaque("cairo_surface_t"),
            Type {
                kind: TypeKind::Union,
                ..Type::opaque("_cairo_path_data_t")
            },
        ] {
            let e = tr.map_type(&ty).err();
            assert_eq!(
                e.as_ref().and_then(|e| e.skip_category()),
                Some(SkipCategory::Unmapped),
                "{ty}"
            );
        }

        Ok(())
    }

    #[test]
    fn narrow_conversion() {
        let t = ToTarget::Narrow {
            derived: "ImageSurface".to_string(),
            field: "surface".to_string(),
            inner: Box::new(ToTarget::Wrap("Surface".to_string())),
        };
        assert_eq!(
            t.apply("ptr"),
            "ImageSurface { surface: Surface::wrap(ptr) }"
        );
    }
}
