use cbind_translate::typemap::ReceiverKind;
use cbind_translate::{Expr, REnum, RFunction, RHandle, RItem, RRecord};
use std::fmt::Write;

use crate::error::Error;
type Result<T, E = Error> = std::result::Result<T, E>;

pub fn write_item(source: &mut String, item: &RItem) -> Result<()> {
    match item {
        RItem::Handle(handle) => write_handle(source, handle)?,
        RItem::Record(record) => write_record(source, record)?,
        RItem::Enum(enm) => write_enum(source, enm)?,
        RItem::Function(fun) => write_function(source, fun)?,
    }

    writeln!(source)?;
    Ok(())
}

fn write_handle(source: &mut String, handle: &RHandle) -> Result<()> {
    let RHandle {
        name,
        c_name,
        destroy,
        reference,
    } = handle;

    writeln!(source, "/// See `{c_name}`.")?;
    writeln!(source, "pub struct {name} {{")?;
    writeln!(source, "    ptr: *mut ffi::{c_name},")?;
    writeln!(source, "}}")?;
    writeln!(source)?;

    writeln!(source, "impl {name} {{")?;
    writeln!(source, "    /// Take ownership of `ptr`.")?;
    writeln!(source, "    ///")?;
    writeln!(source, "    /// # Safety")?;
    writeln!(source, "    /// `ptr` must be valid and the caller must own a reference to it.")?;
    writeln!(source, "    pub unsafe fn wrap(ptr: *mut ffi::{c_name}) -> {name} {{")?;
    writeln!(source, "        {name} {{ ptr }}")?;
    writeln!(source, "    }}")?;
    writeln!(source)?;

    if let Some(reference) = reference {
        writeln!(source, "    /// Take a new reference to `ptr`.")?;
        writeln!(source, "    ///")?;
        writeln!(source, "    /// # Safety")?;
        writeln!(source, "    /// `ptr` must be valid.")?;
        writeln!(source, "    pub unsafe fn wrap_borrowed(ptr: *mut ffi::{c_name}) -> {name} {{")?;
        writeln!(source, "        ffi::{reference}(ptr);")?;
        writeln!(source, "        {name} {{ ptr }}")?;
        writeln!(source, "    }}")?;
        writeln!(source)?;
    }

    writeln!(source, "    pub fn as_ptr(&self) -> *mut ffi::{c_name} {{")?;
    writeln!(source, "        self.ptr")?;
    writeln!(source, "    }}")?;
    writeln!(source, "}}")?;

    if reference.is_some() {
        writeln!(source)?;
        writeln!(source, "impl Clone for {name} {{")?;
        writeln!(source, "    fn clone(&self) -> {name} {{")?;
        writeln!(source, "        unsafe {{ {name}::wrap_borrowed(self.ptr) }}")?;
        writeln!(source, "    }}")?;
        writeln!(source, "}}")?;
    }

    if let Some(destroy) = destroy {
        writeln!(source)?;
        writeln!(source, "impl Drop for {name} {{")?;
        writeln!(source, "    fn drop(&mut self) {{")?;
        writeln!(source, "        unsafe {{ ffi::{destroy}(self.ptr) }}")?;
        writeln!(source, "    }}")?;
        writeln!(source, "}}")?;
    }

    Ok(())
}

fn write_record(source: &mut String, record: &RRecord) -> Result<()> {
    writeln!(source, "/// See `{}`.", record.c_name)?;
    writeln!(source, "#[repr(C)]")?;
    writeln!(source, "#[derive(Debug, Clone, Copy, PartialEq, Default)]")?;
    writeln!(source, "pub struct {} {{", record.name)?;
    for field in &record.fields {
        writeln!(source, "    pub {}: {},", field.name, field.ty)?;
    }
    writeln!(source, "}}")?;

    Ok(())
}

fn write_enum(source: &mut String, enm: &REnum) -> Result<()> {
    let name = &enm.name;
    writeln!(source, "/// See `{}`.", enm.c_name)?;
    writeln!(source, "#[repr(transparent)]")?;
    writeln!(source, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]")?;
    writeln!(source, "pub struct {name}(pub ffi::{});", enm.c_name)?;

    if !enm.constants.is_empty() {
        writeln!(source)?;
    }
    for constant in &enm.constants {
        writeln!(
            source,
            "pub const {}: {name} = {name}(ffi::{});",
            constant.name, constant.c_name
        )?;
    }

    Ok(())
}

/// Methods get an `impl` block each, so the output follows the order of the declaration list
fn write_function(source: &mut String, fun: &RFunction) -> Result<()> {
    let depth = if fun.receiver.is_some() { 1 } else { 0 };
    let indent = "    ".repeat(depth);

    let mut args = Vec::new();
    if let Some(receiver) = &fun.receiver {
        writeln!(source, "impl {} {{", receiver.type_name)?;
        args.push(match receiver.kind {
            ReceiverKind::Handle | ReceiverKind::Shared { is_const: true } => "&self",
            ReceiverKind::Shared { is_const: false } => "&mut self",
            ReceiverKind::Value => "self",
        }
        .to_string());
    }
    args.extend(fun.arguments.iter().map(|a| format!("{}: {}", a.name, a.ty)));

    writeln!(source, "{indent}/// See `{}`.", fun.c_name)?;
    // strings are copied into a CString on the way in
    let strings = fun
        .arguments
        .iter()
        .filter(|a| a.ty == "&str")
        .map(|a| format!("`{}`", a.name))
        .collect::<Vec<_>>();
    if !strings.is_empty() {
        writeln!(source, "{indent}///")?;
        writeln!(source, "{indent}/// # Panics")?;
        writeln!(source, "{indent}///")?;
        writeln!(
            source,
            "{indent}/// Panics if {} contains an interior nul byte.",
            strings.join(" or ")
        )?;
    }
    write!(source, "{indent}pub fn {}({})", fun.name, args.join(", "))?;
    if let Some(result) = &fun.result {
        write!(source, " -> {result}")?;
    }
    write!(source, " ")?;
    write_block(source, &fun.body, depth)?;
    writeln!(source)?;

    if fun.receiver.is_some() {
        writeln!(source, "}}")?;
    }

    Ok(())
}

fn write_block(source: &mut String, stmts: &[Expr], depth: usize) -> Result<()> {
    writeln!(source, "{{")?;
    for stmt in stmts {
        write!(source, "{:width$}", "", width = (depth + 1) * 4)?;
        write_expr(source, stmt, depth + 1)?;
        writeln!(source)?;
    }
    write!(source, "{:width$}}}", "", width = depth * 4)?;

    Ok(())
}

fn write_expr(source: &mut String, e: &Expr, depth: usize) -> Result<()> {
    match e {
        Expr::Token(s) => write!(source, "{s}")?,
        Expr::Block(stmts) => write_block(source, stmts, depth)?,
        Expr::Unsafe(expr) => {
            write!(source, "unsafe ")?;
            write_expr(source, expr, depth)?;
        }
        Expr::Let {
            name,
            ty,
            value,
            is_mut,
        } => {
            write!(source, "let {}{name}", if *is_mut { "mut " } else { "" })?;
            if let Some(ty) = ty {
                write!(source, ": {ty}")?;
            }
            write!(source, " = ")?;
            write_expr(source, value, depth)?;
            write!(source, ";")?;
        }
        Expr::FunctionCall { name, args } => {
            if args.is_empty() {
                write!(source, "{name}()")?;
            } else {
                writeln!(source, "{name}(")?;
                for arg in args {
                    write!(source, "{:width$}", "", width = (depth + 1) * 4)?;
                    write_expr(source, arg, depth + 1)?;
                    writeln!(source, ",")?;
                }
                write!(source, "{:width$}", "", width = depth * 4)?;
                write!(source, ")")?;
            }
        }
        Expr::Try(expr) => {
            write_expr(source, expr, depth)?;
            write!(source, "?")?;
        }
        Expr::Stmt(expr) => {
            write_expr(source, expr, depth)?;
            write!(source, ";")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use cbind_translate::typemap::ReceiverKind;
    use cbind_translate::{Expr, RArgument, RConstant, REnum, RFunction, RItem, RReceiver};

    use super::write_item;
    use crate::error::Error;

    #[test]
    fn enum_constants_follow_the_type() -> Result<(), Error> {
        let mut source = String::new();
        write_item(
            &mut source,
            &RItem::Enum(REnum {
                name: "LineCap".to_string(),
                c_name: "cairo_line_cap_t".to_string(),
                constants: vec![RConstant {
                    name: "LineCapButt".to_string(),
                    c_name: "CAIRO_LINE_CAP_BUTT".to_string(),
                }],
            }),
        )?;

        assert_eq!(
            source,
            "/// See `cairo_line_cap_t`.\n\
             #[repr(transparent)]\n\
             #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]\n\
             pub struct LineCap(pub ffi::cairo_line_cap_t);\n\
             \n\
             pub const LineCapButt: LineCap = LineCap(ffi::CAIRO_LINE_CAP_BUTT);\n\
             \n"
        );

        Ok(())
    }

    #[test]
    fn mutable_shared_receiver() -> Result<(), Error> {
        let mut source = String::new();
        write_item(
            &mut source,
            &RItem::Function(RFunction {
                c_name: "cairo_matrix_translate".to_string(),
                name: "translate".to_string(),
                receiver: Some(RReceiver {
                    type_name: "Matrix".to_string(),
                    kind: ReceiverKind::Shared { is_const: false },
                }),
                arguments: vec![
                    RArgument {
                        name: "tx".to_string(),
                        ty: "f64".to_string(),
                    },
                    RArgument {
                        name: "ty".to_string(),
                        ty: "f64".to_string(),
                    },
                ],
                result: None,
                body: vec![Expr::Unsafe(Box::new(Expr::Block(vec![Expr::Stmt(
                    Box::new(Expr::FunctionCall {
                        name: "ffi::cairo_matrix_translate".to_string(),
                        args: vec![
                            Expr::Token("self as *mut Matrix as *mut _".to_string()),
                            Expr::Token("tx as _".to_string()),
                            Expr::Token("ty as _".to_string()),
                        ],
                    }),
                )])))],
            }),
        )?;

        assert_eq!(
            source,
            "impl Matrix {\n\
             \x20   /// See `cairo_matrix_translate`.\n\
             \x20   pub fn translate(&mut self, tx: f64, ty: f64) {\n\
             \x20       unsafe {\n\
             \x20           ffi::cairo_matrix_translate(\n\
             \x20               self as *mut Matrix as *mut _,\n\
             \x20               tx as _,\n\
             \x20               ty as _,\n\
             \x20           );\n\
             \x20       }\n\
             \x20   }\n\
             }\n\
             \n"
        );

        Ok(())
    }

    #[test]
    fn string_arguments_document_their_panic() -> Result<(), Error> {
        let mut source = String::new();
        write_item(
            &mut source,
            &RItem::Function(RFunction {
                c_name: "cairo_show_text".to_string(),
                name: "show_text".to_string(),
                receiver: Some(RReceiver {
                    type_name: "Context".to_string(),
                    kind: ReceiverKind::Handle,
                }),
                arguments: vec![RArgument {
                    name: "utf8".to_string(),
                    ty: "&str".to_string(),
                }],
                result: None,
                body: vec![Expr::Token("todo!()".to_string())],
            }),
        )?;

        assert!(source.starts_with(
            "impl Context {\n\
             \x20   /// See `cairo_show_text`.\n\
             \x20   ///\n\
             \x20   /// # Panics\n\
             \x20   ///\n\
             \x20   /// Panics if `utf8` contains an interior nul byte.\n\
             \x20   pub fn show_text(&self, utf8: &str) {\n"
        ));

        Ok(())
    }
}
