use cbind::{parse_declarations, Declaration};
use indoc::indoc;

/// A cut down cairo.h covering each way a declaration can be handled
pub(crate) const CAIRO_JSON: &str = indoc!(
    r#"
    [
        {"name": "cairo_t", "storage": "typedef", "type": {"kind": "struct", "name": "_cairo"}},
        {"name": "cairo_surface_t", "storage": "typedef", "type": {"kind": "struct", "name": "_cairo_surface"}},
        {
            "name": "cairo_status_t",
            "storage": "typedef",
            "type": {
                "kind": "enum",
                "name": "_cairo_status",
                "decls": [
                    {"name": "CAIRO_STATUS_SUCCESS", "type": {"kind": "scalar", "name": "int"}},
                    {"name": "CAIRO_STATUS_NO_MEMORY", "type": {"kind": "scalar", "name": "int"}}
                ]
            }
        },
        {
            "name": "cairo_format_t",
            "storage": "typedef",
            "type": {
                "kind": "enum",
                "name": "_cairo_format",
                "decls": [
                    {"name": "CAIRO_FORMAT_INVALID", "type": {"kind": "scalar", "name": "int"}},
                    {"name": "CAIRO_FORMAT_ARGB32", "type": {"kind": "scalar", "name": "int"}},
                    {"name": "CAIRO_FORMAT_RGB24", "type": {"kind": "scalar", "name": "int"}}
                ]
            }
        },
        {
            "name": "cairo_matrix_t",
            "storage": "typedef",
            "type": {
                "kind": "struct",
                "name": "_cairo_matrix",
                "decls": [
                    {"name": "xx", "type": {"kind": "scalar", "name": "double"}},
                    {"name": "yx", "type": {"kind": "scalar", "name": "double"}},
                    {"name": "xy", "type": {"kind": "scalar", "name": "double"}},
                    {"name": "yy", "type": {"kind": "scalar", "name": "double"}},
                    {"name": "x0", "type": {"kind": "scalar", "name": "double"}},
                    {"name": "y0", "type": {"kind": "scalar", "name": "double"}}
                ]
            }
        },
        {
            "name": "cairo_path_data_t",
            "storage": "typedef",
            "type": {
                "kind": "union",
                "name": "_cairo_path_data_t",
                "decls": [
                    {"name": "header", "type": {"kind": "struct", "decls": []}},
                    {"name": "point", "type": {"kind": "struct", "decls": []}}
                ]
            }
        },
        {
            "name": "cairo_path_t",
            "storage": "typedef",
            "type": {
                "kind": "struct",
                "name": "cairo_path",
                "decls": [
                    {"name": "status", "type": {"kind": "enum", "name": "cairo_status_t"}},
                    {"name": "data", "type": {"kind": "pointer", "base": {"kind": "scalar", "name": "cairo_path_data_t"}}},
                    {"name": "num_data", "type": {"kind": "scalar", "name": "int"}}
                ]
            }
        },
        {"name": "cairo_bool_t", "storage": "typedef", "type": {"kind": "scalar", "name": "int"}},
        {
            "name": "cairo_write_func_t",
            "storage": "typedef",
            "type": {
                "kind": "pointer",
                "base": {
                    "kind": "function",
                    "base": {"kind": "enum", "name": "cairo_status_t"},
                    "decls": [
                        {"name": "closure", "type": {"kind": "pointer", "base": {"kind": "void"}}},
                        {"name": "data", "type": {"kind": "pointer", "base": {"kind": "scalar", "name": "unsigned char", "is_const": true}}},
                        {"name": "length", "type": {"kind": "scalar", "name": "uint"}}
                    ]
                }
            }
        },
        {
            "name": "cairo_create",
            "type": {
                "kind": "function",
                "base": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}},
                "decls": [
                    {"name": "target", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_surface_t"}}}
                ]
            }
        },
        {
            "name": "cairo_reference",
            "type": {
                "kind": "function",
                "base": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}},
                "decls": [
                    {"name": "cr", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}}}
                ]
            }
        },
        {
            "name": "cairo_destroy",
            "type": {
                "kind": "function",
                "base": {"kind": "void"},
                "decls": [
                    {"name": "cr", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}}}
                ]
            }
        },
        {
            "name": "cairo_status",
            "type": {
                "kind": "function",
                "base": {"kind": "enum", "name": "cairo_status_t"},
                "decls": [
                    {"name": "cr", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}}}
                ]
            }
        },
        {
            "name": "cairo_copy_path",
            "type": {
                "kind": "function",
                "base": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_path_t"}},
                "decls": [
                    {"name": "cr", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}}}
                ]
            }
        },
        {
            "name": "cairo_get_current_point",
            "type": {
                "kind": "function",
                "base": {"kind": "void"},
                "decls": [
                    {"name": "cr", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}}},
                    {"name": "x", "type": {"kind": "pointer", "base": {"kind": "scalar", "name": "double"}}},
                    {"name": "y", "type": {"kind": "pointer", "base": {"kind": "scalar", "name": "double"}}}
                ]
            }
        },
        {
            "name": "cairo_has_current_point",
            "type": {
                "kind": "function",
                "base": {"kind": "scalar", "name": "cairo_bool_t"},
                "decls": [
                    {"name": "cr", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}}}
                ]
            }
        },
        {
            "name": "cairo_set_dash",
            "type": {
                "kind": "function",
                "base": {"kind": "void"},
                "decls": [
                    {"name": "cr", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_t"}}},
                    {"name": "dashes", "type": {"kind": "pointer", "base": {"kind": "scalar", "name": "double", "is_const": true}}},
                    {"name": "num_dashes", "type": {"kind": "scalar", "name": "int"}},
                    {"name": "offset", "type": {"kind": "scalar", "name": "double"}}
                ]
            }
        },
        {
            "name": "cairo_surface_status",
            "type": {
                "kind": "function",
                "base": {"kind": "enum", "name": "cairo_status_t"},
                "decls": [
                    {"name": "surface", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_surface_t"}}}
                ]
            }
        },
        {
            "name": "cairo_surface_write_to_png_stream",
            "type": {
                "kind": "function",
                "base": {"kind": "enum", "name": "cairo_status_t"},
                "decls": [
                    {"name": "surface", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_surface_t"}}},
                    {"name": "write_func", "type": {"kind": "scalar", "name": "cairo_write_func_t"}},
                    {"name": "closure", "type": {"kind": "pointer", "base": {"kind": "void"}}}
                ]
            }
        },
        {
            "name": "cairo_image_surface_create",
            "type": {
                "kind": "function",
                "base": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_surface_t"}},
                "decls": [
                    {"name": "format", "type": {"kind": "enum", "name": "cairo_format_t"}},
                    {"name": "width", "type": {"kind": "scalar", "name": "int"}},
                    {"name": "height", "type": {"kind": "scalar", "name": "int"}}
                ]
            }
        },
        {
            "name": "cairo_image_surface_create_for_data",
            "type": {
                "kind": "function",
                "base": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_surface_t"}},
                "decls": [
                    {"name": "data", "type": {"kind": "pointer", "base": {"kind": "scalar", "name": "unsigned char"}}},
                    {"name": "format", "type": {"kind": "enum", "name": "cairo_format_t"}},
                    {"name": "width", "type": {"kind": "scalar", "name": "int"}},
                    {"name": "height", "type": {"kind": "scalar", "name": "int"}},
                    {"name": "stride", "type": {"kind": "scalar", "name": "int"}}
                ]
            }
        },
        {
            "name": "cairo_image_surface_get_format",
            "type": {
                "kind": "function",
                "base": {"kind": "enum", "name": "cairo_format_t"},
                "decls": [
                    {"name": "surface", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_surface_t"}}}
                ]
            }
        },
        {
            "name": "cairo_matrix_init_identity",
            "type": {
                "kind": "function",
                "base": {"kind": "void"},
                "decls": [
                    {"name": "matrix", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_matrix_t"}}}
                ]
            }
        },
        {
            "name": "cairo_pattern_get_rgba",
            "type": {
                "kind": "function",
                "base": {"kind": "enum", "name": "cairo_status_t"},
                "decls": [
                    {"name": "pattern", "type": {"kind": "pointer", "base": {"kind": "struct", "name": "cairo_pattern_t"}}},
                    {"name": "red", "type": {"kind": "pointer", "base": {"kind": "scalar", "name": "double"}}}
                ]
            }
        },
        {
            "type": {
                "kind": "enum",
                "decls": [
                    {"name": "CAIRO_MIME_TYPE_UNUSED", "type": {"kind": "scalar", "name": "int"}}
                ]
            }
        }
    ]
    "#
);

pub(crate) fn cairo_decls() -> Vec<Declaration> {
    match parse_declarations(CAIRO_JSON) {
        Ok(decls) => decls,
        Err(e) => panic!("fixture does not parse: {e}"),
    }
}
