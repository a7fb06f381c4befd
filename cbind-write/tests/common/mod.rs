use cbind_decl::{Declaration, Type};
use cbind_translate::config::Config;
use cbind_translate::{RItem, Translator};
use cbind_util::Error;

pub(crate) fn surface() -> Type {
    Type::pointer(Type::opaque("cairo_surface_t"))
}

/// A surface typedef followed by a few of its functions
pub(crate) fn surface_decls() -> Vec<Declaration> {
    vec![
        Declaration::typedef("cairo_surface_t", Type::opaque("_cairo_surface")),
        Declaration::typedef(
            "cairo_status_t",
            Type::enumeration("_cairo_status", &["CAIRO_STATUS_SUCCESS", "CAIRO_STATUS_NO_MEMORY"]),
        ),
        Declaration::function(
            "cairo_surface_flush",
            Type::void(),
            vec![Declaration::new("surface", surface())],
        ),
        Declaration::function(
            "cairo_surface_status",
            Type::enum_ref("cairo_status_t"),
            vec![Declaration::new("surface", surface())],
        ),
    ]
}

pub(crate) fn translate_all(config: &Config, decls: &[Declaration]) -> Result<Vec<RItem>, Error> {
    let mut tr = Translator::new(config)?;
    let mut items = Vec::new();
    for decl in decls {
        items.push(tr.translate(decl)?);
    }
    Ok(items)
}
