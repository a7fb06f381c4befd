use cbind_decl::{Declaration, TypeKind};
use hashbrown::HashSet;
use tracing::instrument;

use crate::error::Error;
use crate::naming::{unique_name, Case};
use crate::{RItem, RecordKind, Translator};

type Result<T, E = Error> = std::result::Result<T, E>;

/// An owning wrapper around an opaque pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RHandle {
    pub name: String,
    pub c_name: String,
    pub destroy: Option<String>,
    pub reference: Option<String>,
}

/// A struct with the same layout as its C counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RRecord {
    pub name: String,
    pub c_name: String,
    pub fields: Vec<RField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RField {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct REnum {
    pub name: String,
    pub c_name: String,
    pub constants: Vec<RConstant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RConstant {
    pub name: String,
    pub c_name: String,
}

#[instrument(level = "trace", skip(tr))]
pub(crate) fn translate_typedef(tr: &mut Translator, decl: &Declaration) -> Result<RItem> {
    let config = tr.config();
    let name = config.naming.convert(&decl.name, Case::Exported);

    match decl.ty.kind {
        TypeKind::Struct if decl.ty.is_opaque() || config.opaque_records.contains(&decl.name) => {
            let ownership = config.handles.get(&decl.name);
            let handle = RHandle {
                name,
                c_name: decl.name.clone(),
                destroy: ownership.and_then(|o| o.destroy.clone()),
                reference: ownership.and_then(|o| o.reference.clone()),
            };
            tr.records.insert(decl.name.clone(), RecordKind::Handle);
            Ok(RItem::Handle(handle))
        }
        TypeKind::Struct => match translate_record(tr, decl, &name) {
            Ok(record) => {
                tr.records
                    .insert(decl.name.clone(), RecordKind::Shared(name));
                Ok(RItem::Record(record))
            }
            Err(e) => {
                tr.records.insert(decl.name.clone(), RecordKind::Failed);
                Err(e)
            }
        },
        TypeKind::Enum => {
            let constants = decl
                .members()
                .iter()
                .map(|c| RConstant {
                    name: config.naming.constant_name(&c.name),
                    c_name: c.name.clone(),
                })
                .collect();

            Ok(RItem::Enum(REnum {
                name,
                c_name: decl.name.clone(),
                constants,
            }))
        }
        kind => Err(Error::Unsupported {
            description: format!("typedef of {kind:?}"),
        }),
    }
}

fn translate_record(tr: &Translator, decl: &Declaration, name: &str) -> Result<RRecord> {
    let naming = &tr.config().naming;
    let mut used_names = HashSet::new();
    let mut fields = Vec::new();

    for (i, member) in decl.members().iter().enumerate() {
        let field_name = unique_name(&naming.local_name(&member.name, i), &mut used_names);

        let (element, len) = match (member.ty.kind, member.ty.base(), member.ty.len) {
            (TypeKind::Array, Some(element), Some(len)) => (element, Some(len)),
            (TypeKind::Array, ..) => {
                return Err(Error::TranslateField {
                    name: member.name.clone(),
                    source: Box::new(Error::Unsupported {
                        description: "array without an element type or length".to_string(),
                    }),
                })
            }
            _ => (&member.ty, None),
        };

        let mapping = tr
            .map_type(element)
            .map_err(|source| Error::TranslateField {
                name: member.name.clone(),
                source: Box::new(source),
            })?;

        if !mapping.layout_safe {
            return Err(Error::FieldLayout {
                name: member.name.clone(),
                ty: member.ty.to_string(),
            });
        }

        let ty = match len {
            Some(len) => format!("[{}; {len}]", mapping.target),
            None => mapping.target,
        };

        fields.push(RField {
            name: field_name,
            ty,
        });
    }

    Ok(RRecord {
        name: name.to_string(),
        c_name: decl.name.clone(),
        fields,
    })
}
