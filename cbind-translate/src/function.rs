use cbind_decl::Declaration;
use hashbrown::HashSet;
use tracing::{instrument, trace};

use crate::error::Error;
use crate::naming::{fn_name, unique_name, Case};
use crate::typemap::{MappingKind, ReceiverKind, ToTarget, TypeMapping};
use crate::{Expr, Translator};

type Result<T, E = Error> = std::result::Result<T, E>;

/// A safe wrapper around one C function
#[derive(Debug, Clone, PartialEq)]
pub struct RFunction {
    pub c_name: String,
    pub name: String,
    pub receiver: Option<RReceiver>,
    pub arguments: Vec<RArgument>,
    pub result: Option<String>,
    pub body: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RReceiver {
    pub type_name: String,
    pub kind: ReceiverKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RArgument {
    pub name: String,
    pub ty: String,
}

impl RFunction {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// An output parameter: the local it is stored in and how it is converted on return
struct OutValue {
    local: String,
    mapping: TypeMapping,
}

#[instrument(level = "trace", skip(tr), fields(name = %decl.name))]
pub(crate) fn translate_function(tr: &Translator, decl: &Declaration) -> Result<RFunction> {
    let config = tr.config();
    let c_name = decl.name.as_str();
    let candidate = config.naming.convert(c_name, Case::Exported);

    let result_ty = decl.ty.base().ok_or_else(|| Error::Unsupported {
        description: format!("function \"{c_name}\" has no return type"),
    })?;

    let mut result = if result_ty.is_void() {
        None
    } else {
        let mut m = tr
            .map_type(result_ty)
            .map_err(|source| Error::TranslateResult {
                source: Box::new(source),
            })?;

        if m.to_target.is_none() {
            return Err(Error::Unsupported {
                description: format!("cannot return a \"{result_ty}\""),
            });
        }

        // getters hand out a pointer the caller doesn't own, so take a reference to keep Drop balanced
        if let (true, Some(ToTarget::Wrap(target)), Some(pointee)) =
            (c_name.contains("_get_"), &m.to_target, result_ty.base())
        {
            let refcounted = config
                .handles
                .get(&pointee.name)
                .map(|h| h.reference.is_some())
                .unwrap_or(false);
            if refcounted {
                m.to_target = Some(ToTarget::WrapBorrowed(target.clone()));
            }
        }

        narrow_result(tr, c_name, &candidate, &mut m);
        Some(m)
    };

    let params: &[Declaration] = match decl.members() {
        [only] if only.ty.is_void() => &[],
        params => params,
    };

    let out_flags = config.out_params.get(c_name);
    if let Some(flags) = out_flags {
        if flags.len() != params.len() {
            return Err(Error::OutParamMismatch {
                function: c_name.to_string(),
                flags: flags.len(),
                params: params.len(),
            });
        }
        if result.is_some() {
            return Err(Error::OutParamWithReturn {
                function: c_name.to_string(),
            });
        }
    }

    let array_index = config.array_params.get(c_name).copied();
    if let Some(index) = array_index {
        if index + 1 >= params.len() {
            return Err(Error::ArrayParamWithoutLength {
                function: c_name.to_string(),
                index,
            });
        }
    }

    let mut used_names: HashSet<String> = HashSet::new();
    used_names.insert("ret".to_string());

    let mut receiver = None;
    let mut method_name = None;
    let mut arguments = Vec::new();
    let mut call_args = Vec::new();
    let mut checks = Vec::new();
    let mut setup = Vec::new();
    let mut outs = Vec::new();

    let mut i = 0;
    while i < params.len() {
        let param = &params[i];

        if out_flags.map(|f| f[i]).unwrap_or(false) {
            let out = out_value(tr, c_name, param, i, &mut used_names)?;
            setup.push(Expr::Let {
                name: out.local.clone(),
                ty: Some(out.mapping.c_repr.clone()),
                value: Box::new(Expr::Token("Default::default()".to_string())),
                is_mut: true,
            });
            call_args.push(format!("&mut {}", out.local));
            outs.push(out);
            i += 1;
            continue;
        }

        if array_index == Some(i) {
            let (argument, args) = array_argument(tr, c_name, param, i, &mut used_names)?;
            arguments.push(argument);
            call_args.extend(args);
            // the length parameter is consumed with the array
            i += 2;
            continue;
        }

        let mapping = tr.map_type(&param.ty).map_err(|source| Error::TranslateArgument {
            name: param.name.clone(),
            source: Box::new(source),
        })?;

        if i == 0 {
            let narrowed = mapping
                .method
                .as_ref()
                .and_then(|tag| tr.subtypes().narrow(&candidate, &tag.type_name).map(|n| (tag, n)));

            if let Some((tag, narrowed)) = narrowed {
                let to_source = mapping
                    .to_source
                    .as_ref()
                    .ok_or_else(|| Error::MissingToSource {
                        function: c_name.to_string(),
                        param: "self".to_string(),
                    })?;
                call_args.push(to_source.apply("self").expr);

                // the status accessor can't check itself
                if narrowed.method != "Status"
                    && tag.kind == ReceiverKind::Handle
                    && !config.unchecked_receivers.contains(&tag.type_name)
                {
                    checks.push(Expr::Stmt(Box::new(Expr::Try(Box::new(Expr::Token(
                        "self.status()".to_string(),
                    ))))));
                }

                trace!(
                    "{c_name} is method {} of {}",
                    narrowed.method,
                    narrowed.receiver.as_deref().unwrap_or(&tag.type_name)
                );
                receiver = Some(RReceiver {
                    type_name: narrowed.receiver.unwrap_or_else(|| tag.type_name.clone()),
                    kind: tag.kind,
                });
                method_name = Some(narrowed.method);
                i += 1;
                continue;
            }
        }

        let to_source = mapping
            .to_source
            .as_ref()
            .ok_or_else(|| Error::MissingToSource {
                function: c_name.to_string(),
                param: param.name.clone(),
            })?;

        let name = unique_name(&config.naming.local_name(&param.name, i), &mut used_names);
        let converted = to_source.apply(&name);
        if let Some(s) = converted.setup {
            setup.push(s);
        }
        call_args.push(converted.expr);
        arguments.push(RArgument {
            name,
            ty: mapping.input_type().to_string(),
        });
        i += 1;
    }

    let call = Expr::FunctionCall {
        name: format!("ffi::{c_name}"),
        args: call_args.into_iter().map(Expr::Token).collect(),
    };

    let mut body = checks;
    let receiver_checked = !body.is_empty();
    body.extend(setup);

    let mut ret_checked = false;
    match &result {
        Some(m) => {
            let value = m
                .to_target
                .as_ref()
                .map(|t| t.apply(&call.to_string()))
                .unwrap_or_else(|| call.to_string());

            body.push(Expr::Let {
                name: "ret".to_string(),
                ty: Some(m.target.clone()),
                value: Box::new(Expr::Unsafe(Box::new(Expr::Block(vec![Expr::Token(value)])))),
                is_mut: false,
            });

            if !receiver_checked {
                if let Some(tag) = m.handle() {
                    if tr.has_status(tag) {
                        body.push(Expr::Stmt(Box::new(Expr::Try(Box::new(Expr::Token(
                            "ret.status()".to_string(),
                        ))))));
                        ret_checked = true;
                    }
                }
            }
        }
        None => {
            body.push(Expr::Unsafe(Box::new(Expr::Block(vec![Expr::Stmt(
                Box::new(call),
            )]))));
        }
    }

    let fallible = receiver_checked || ret_checked;
    let status = tr.status_name();

    let (value_ty, value) = if let Some(m) = result.take() {
        (Some(m.target), Some("ret".to_string()))
    } else {
        match outs.as_slice() {
            [] => (None, None),
            [out] => (Some(out.mapping.target.clone()), Some(out_expr(out))),
            outs => (
                Some(format!(
                    "({})",
                    outs.iter()
                        .map(|o| o.mapping.target.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
                Some(format!(
                    "({})",
                    outs.iter().map(out_expr).collect::<Vec<_>>().join(", ")
                )),
            ),
        }
    };

    let returns_status = value_ty
        .as_deref()
        .map(|t| t == format!("Result<(), {status}>"))
        .unwrap_or(false);

    let (result_ty, tail) = if fallible && !returns_status {
        (
            Some(format!(
                "Result<{}, {status}>",
                value_ty.as_deref().unwrap_or("()")
            )),
            Some(format!("Ok({})", value.as_deref().unwrap_or("()"))),
        )
    } else {
        (value_ty, value)
    };

    if let Some(tail) = tail {
        body.push(Expr::Token(tail));
    }

    Ok(RFunction {
        c_name: c_name.to_string(),
        name: fn_name(method_name.as_deref().unwrap_or(&candidate)),
        receiver,
        arguments,
        result: result_ty,
        body,
    })
}

/// Wrap a returned handle in a derived type when the function is one of its constructors
fn narrow_result(tr: &Translator, c_name: &str, candidate: &str, m: &mut TypeMapping) {
    let Some(tag) = m.handle() else {
        return;
    };

    if let Some(pair) = tr.subtypes().narrow_return(c_name, candidate, &tag.type_name) {
        if let Some(inner) = m.to_target.take() {
            m.to_target = Some(ToTarget::Narrow {
                derived: pair.derived.clone(),
                field: pair.field(),
                inner: Box::new(inner),
            });
        }
        m.target = pair.derived.clone();
        if let Some(tag) = m.method.as_mut() {
            tag.type_name = pair.derived.clone();
        }
    }
}

fn out_value(
    tr: &Translator,
    c_name: &str,
    param: &Declaration,
    index: usize,
    used_names: &mut HashSet<String>,
) -> Result<OutValue> {
    let local = unique_name(&tr.config().naming.local_name(&param.name, index), used_names);

    let pointee = match param.ty.base() {
        Some(base) if param.ty.is_pointer() => base,
        _ => {
            return Err(Error::OutParamNotPointer {
                function: c_name.to_string(),
                param: local,
            })
        }
    };

    let not_scalar = || Error::OutParamNotScalar {
        function: c_name.to_string(),
        param: param.name.clone(),
        ty: pointee.to_string(),
    };

    let mapping = tr.map_type(pointee).map_err(|_| not_scalar())?;
    if !mapping.is_scalar_like() || mapping.to_target.is_none() {
        return Err(not_scalar());
    }

    Ok(OutValue { local, mapping })
}

fn out_expr(out: &OutValue) -> String {
    match &out.mapping.to_target {
        Some(t) => t.apply(&out.local),
        None => out.local.clone(),
    }
}

/// A pointer and the length following it, collapsed into one slice argument
fn array_argument(
    tr: &Translator,
    c_name: &str,
    param: &Declaration,
    index: usize,
    used_names: &mut HashSet<String>,
) -> Result<(RArgument, Vec<String>)> {
    let name = unique_name(&tr.config().naming.local_name(&param.name, index), used_names);

    let element = match param.ty.base() {
        Some(base) if param.ty.is_pointer() => base,
        _ => {
            return Err(Error::ArrayParamLayout {
                function: c_name.to_string(),
                param: name,
                ty: param.ty.to_string(),
            })
        }
    };

    let mapping = tr
        .map_type(element)
        .map_err(|source| Error::TranslateArgument {
            name: param.name.clone(),
            source: Box::new(source),
        })?;

    if !mapping.layout_safe || mapping.kind == MappingKind::Void {
        return Err(Error::ArrayParamLayout {
            function: c_name.to_string(),
            param: name,
            ty: element.to_string(),
        });
    }

    let (ty, ptr) = if element.is_const {
        (
            format!("&[{}]", mapping.target),
            format!("{name}.as_ptr() as *const _"),
        )
    } else {
        (
            format!("&mut [{}]", mapping.target),
            format!("{name}.as_mut_ptr() as *mut _"),
        )
    };
    let len = format!("{name}.len() as _");

    Ok((RArgument { name, ty }, vec![ptr, len]))
}
