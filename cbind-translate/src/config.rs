use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::naming::NamingConfig;
use crate::registry::{SkipCategory, SuffixRule};
use crate::subtype::{SubtypePair, Subtypes};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Destroy and reference functions of an opaque handle type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleOwnership {
    pub destroy: Option<String>,
    pub reference: Option<String>,
}

/// Everything that is specific to the wrapped library.
///
/// `Config::default()` is the configuration for cairo. A configuration file only needs to name the fields it changes,
/// the rest keep their cairo values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub naming: NamingConfig,
    /// Functions whose first parameter is this type are always methods and keep their whole name
    pub primary_receiver: String,
    pub subtypes: Vec<SubtypePair>,
    /// Function name -> derived type its return value is narrowed to, for constructors not named after that type
    pub return_aliases: BTreeMap<String, String>,
    /// Receivers that never get an implicit status check
    pub unchecked_receivers: BTreeSet<String>,
    /// Value types that can act as receivers, taking `self` by value
    pub value_receivers: BTreeSet<String>,
    /// Function name -> one flag per parameter, true for output parameters
    pub out_params: BTreeMap<String, Vec<bool>>,
    /// Function name -> index of a pointer parameter that is immediately followed by its length
    pub array_params: BTreeMap<String, usize>,
    /// Declarations that are never generated, with the reason
    pub exclude: BTreeMap<String, String>,
    /// Declarations that cannot be generated yet, with the reason
    pub todo: BTreeMap<String, String>,
    /// Declaration name -> Rust source emitted in its place
    pub overrides: BTreeMap<String, String>,
    pub suffix_rules: Vec<SuffixRule>,
    /// Structs treated as opaque handles even though their members are visible
    pub opaque_records: BTreeSet<String>,
    /// Platform types passed through as `*mut c_void`
    pub raw_pointer_types: BTreeSet<String>,
    /// Platform integer handles passed through as `u64`
    pub raw_scalar_types: BTreeSet<String>,
    pub handles: BTreeMap<String, HandleOwnership>,
    pub bool_type: String,
    pub status_type: String,
    /// Pointees that make a pointer a string
    pub string_pointees: BTreeSet<String>,
    /// Pointees that make a pointer an untyped buffer, which is not mapped
    pub excluded_pointees: BTreeSet<String>,
}

fn strings(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn table(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Config {
    pub fn cairo() -> Config {
        let pairs = [
            ("ImageSurface", "Surface"),
            ("RecordingSurface", "Surface"),
            ("SurfaceObserver", "Surface"),
            ("ToyFontFace", "FontFace"),
            ("MeshPattern", "Pattern"),
            ("XlibSurface", "Surface"),
            ("XlibDevice", "Device"),
        ];

        let rect = vec![false, true, true, true, true];
        let point = vec![false, true, true];
        let out_params = [
            ("cairo_clip_extents", &rect),
            ("cairo_fill_extents", &rect),
            ("cairo_path_extents", &rect),
            ("cairo_stroke_extents", &rect),
            ("cairo_recording_surface_ink_extents", &rect),
            ("cairo_get_current_point", &point),
            ("cairo_surface_get_device_scale", &point),
            ("cairo_surface_get_device_offset", &point),
            ("cairo_surface_get_fallback_resolution", &point),
        ]
        .into_iter()
        .map(|(name, flags)| (name.to_string(), flags.clone()))
        .collect();

        let array_params = [
            "cairo_set_dash",
            "cairo_show_glyphs",
            "cairo_glyph_path",
            "cairo_glyph_extents",
            "cairo_scaled_font_glyph_extents",
        ]
        .into_iter()
        .map(|name| (name.to_string(), 1))
        .collect();

        let mut handles = BTreeMap::new();
        for (c_type, stem) in [
            ("cairo_t", "cairo"),
            ("cairo_surface_t", "cairo_surface"),
            ("cairo_pattern_t", "cairo_pattern"),
            ("cairo_font_face_t", "cairo_font_face"),
            ("cairo_scaled_font_t", "cairo_scaled_font"),
            ("cairo_device_t", "cairo_device"),
            ("cairo_region_t", "cairo_region"),
        ] {
            handles.insert(
                c_type.to_string(),
                HandleOwnership {
                    destroy: Some(format!("{stem}_destroy")),
                    reference: Some(format!("{stem}_reference")),
                },
            );
        }
        for (c_type, stem) in [
            ("cairo_font_options_t", "cairo_font_options"),
            ("cairo_path_t", "cairo_path"),
        ] {
            handles.insert(
                c_type.to_string(),
                HandleOwnership {
                    destroy: Some(format!("{stem}_destroy")),
                    reference: None,
                },
            );
        }

        Config {
            naming: NamingConfig::default(),
            primary_receiver: "Context".to_string(),
            subtypes: pairs
                .iter()
                .map(|(derived, base)| SubtypePair::new(derived, base))
                .collect(),
            return_aliases: table(&[("cairo_surface_create_observer", "SurfaceObserver")]),
            unchecked_receivers: strings(&["Format", "Matrix", "Path"]),
            value_receivers: strings(&["Format"]),
            out_params,
            array_params,
            exclude: table(&[
                ("cairo_bool_t", "mapped to bool"),
                ("cairo_user_data_key_t", "user data is not exposed"),
                ("cairo_matrix_init", "construct the struct directly"),
                ("cairo_status_to_string", "used by Display for Status"),
                ("cairo_surface_write_to_png", "use write_to_png_stream"),
                ("cairo_surface_write_to_png_stream", "written by hand"),
                ("cairo_glyph_allocate", "use a Vec of glyphs"),
                ("cairo_glyph_free", "use a Vec of glyphs"),
                ("Drawable", ""),
                ("Pixmap", ""),
                ("Display", ""),
                ("Visual", ""),
                ("Screen", ""),
            ]),
            todo: table(&[
                ("cairo_pattern_get_rgba", "mix of out params and status"),
                ("cairo_pattern_get_color_stop_rgba", "mix of out params and status"),
                ("cairo_pattern_get_color_stop_count", "mix of out params and status"),
                ("cairo_pattern_get_linear_points", "mix of out params and status"),
                ("cairo_pattern_get_radial_circles", "mix of out params and status"),
                ("cairo_mesh_pattern_get_patch_count", "mix of out params and status"),
                ("cairo_mesh_pattern_get_corner_color_rgba", "mix of out params and status"),
                ("cairo_mesh_pattern_get_control_point", "mix of out params and status"),
                ("cairo_scaled_font_text_to_glyphs", "fancy font APIs"),
                ("cairo_surface_get_mime_data", "mime functions"),
                ("cairo_surface_set_mime_data", "mime functions"),
                ("cairo_pattern_get_surface", "refcounting"),
                ("cairo_rectangle_int_t", "hard to wrap API"),
                ("cairo_rectangle_list_t", "hard to wrap API"),
                ("cairo_text_cluster_t", "needs work"),
                ("cairo_raster_source_acquire_func_t", "callbacks"),
                ("cairo_raster_source_release_func_t", "callbacks"),
                ("cairo_raster_source_snapshot_func_t", "callbacks"),
                ("cairo_raster_source_copy_func_t", "callbacks"),
            ]),
            overrides: table(&[
                (
                    "cairo_surface_write_to_png_stream",
                    include_str!("overrides/write_to_png_stream.rs"),
                ),
                // the segment union is only read through Path::iter
                ("cairo_path_data_t", include_str!("overrides/path_iter.rs")),
            ]),
            suffix_rules: vec![
                SuffixRule::new(
                    &["_func", "_func_t", "_callback", "_callback_data", "_callback_t"],
                    SkipCategory::Callback,
                    "callbacks",
                ),
                SuffixRule::new(
                    &["_user_data"],
                    SkipCategory::UserData,
                    "user data is not exposed",
                ),
                SuffixRule::new(
                    &["_reference", "_destroy", "_get_reference_count"],
                    SkipCategory::RefCounting,
                    "ownership is handled by Drop",
                ),
            ],
            opaque_records: strings(&["cairo_path_t"]),
            raw_pointer_types: strings(&["Display", "Visual", "Screen"]),
            raw_scalar_types: strings(&["Drawable", "Pixmap"]),
            handles,
            bool_type: "cairo_bool_t".to_string(),
            status_type: "cairo_status_t".to_string(),
            string_pointees: strings(&["char"]),
            excluded_pointees: strings(&["uchar", "unsigned char", "void"]),
        }
    }

    /// Read a configuration from a JSON file. Fields missing from the file keep their cairo defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&contents)?;
        debug!("read configuration from {}", path.as_ref().display());
        config.validate()?;
        Ok(config)
    }

    /// Check the tables for inconsistencies that would otherwise only show up halfway through a run
    pub fn validate(&self) -> Result<()> {
        self.subtypes()?;

        if let Some(name) = self.exclude.keys().find(|k| self.todo.contains_key(*k)) {
            return Err(Error::InvalidConfig(format!(
                "\"{name}\" is both excluded and on the TODO list"
            )));
        }

        if let Some(rule) = self
            .suffix_rules
            .iter()
            .find(|r| matches!(r.category, SkipCategory::Unmapped | SkipCategory::Unsupported))
        {
            return Err(Error::InvalidConfig(format!(
                "suffix rule {:?} uses category \"{}\", which is reserved for translation failures",
                rule.suffixes, rule.category
            )));
        }

        if self.primary_receiver.is_empty() {
            return Err(Error::InvalidConfig(
                "primary_receiver must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn subtypes(&self) -> Result<Subtypes> {
        Subtypes::new(&self.primary_receiver, &self.subtypes, &self.return_aliases)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::cairo()
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::error::Error;
    use crate::subtype::SubtypePair;

    #[test]
    fn cairo_config_is_valid() -> Result<(), Error> {
        let config = Config::default();
        config.validate()?;
        assert_eq!(config.out_params["cairo_fill_extents"].len(), 5);
        assert_eq!(config.array_params["cairo_set_dash"], 1);
        assert_eq!(
            config.handles["cairo_surface_t"].destroy.as_deref(),
            Some("cairo_surface_destroy")
        );
        assert!(config.handles["cairo_path_t"].reference.is_none());
        assert!(config.overrides["cairo_path_data_t"].contains("pub fn iter(&self) -> PathIter<'_>"));
        assert!(!config.exclude.contains_key("cairo_path_data_t"));
        Ok(())
    }

    #[test]
    fn partial_config_keeps_defaults() -> Result<(), Error> {
        let config: Config = serde_json::from_str(r#"{"primary_receiver": "Canvas"}"#)?;
        assert_eq!(config.primary_receiver, "Canvas");
        assert_eq!(config.subtypes.len(), 7);
        assert!(config.overrides.contains_key("cairo_surface_write_to_png_stream"));
        Ok(())
    }

    #[test]
    fn conflicting_tables_are_rejected() {
        let mut config = Config::default();
        config
            .todo
            .insert("cairo_matrix_init".to_string(), "later".to_string());
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config
            .subtypes
            .push(SubtypePair::new("ImageSurfaceView", "Surface"));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
