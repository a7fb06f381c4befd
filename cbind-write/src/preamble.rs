use cbind_translate::subtype::SubtypePair;
use cbind_translate::Translator;
use indoc::indoc;
use std::fmt::Write;

use crate::error::Error;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Module header, imports and the support code the generated items rely on
pub fn write_preamble(source: &mut String, tr: &Translator) -> Result<()> {
    source.push_str(indoc!(
        r#"
        //! Safe wrappers over the raw `ffi` module.
        //!
        //! Generated by cbind from the C declaration list. Do not edit.
        #![allow(non_upper_case_globals)]
        #![allow(unused_imports)]
        #![allow(clippy::missing_safety_doc)]

        use std::ffi::{CStr, CString};
        use std::os::raw::{
            c_char, c_double, c_float, c_int, c_long, c_longlong, c_short, c_uchar, c_uint, c_ulong,
            c_ulonglong, c_ushort, c_void,
        };

        use crate::ffi;

        "#
    ));

    write_status(source, tr)?;

    for pair in tr.subtypes().pairs() {
        write_embedding(source, pair)?;
        writeln!(source)?;
    }

    Ok(())
}

fn write_status(source: &mut String, tr: &Translator) -> Result<()> {
    let status = tr.status_name();
    let c_status = &tr.config().status_type;
    let stem = c_status.strip_suffix("_t").unwrap_or(c_status);
    let success = format!("{}_SUCCESS", stem.to_uppercase());

    writeln!(source, "impl {status} {{")?;
    writeln!(source, "    /// `Ok(())` on success, the status itself otherwise.")?;
    writeln!(source, "    pub fn to_result(self) -> Result<(), {status}> {{")?;
    writeln!(source, "        if self.0 == ffi::{success} {{")?;
    writeln!(source, "            Ok(())")?;
    writeln!(source, "        }} else {{")?;
    writeln!(source, "            Err(self)")?;
    writeln!(source, "        }}")?;
    writeln!(source, "    }}")?;
    writeln!(source, "}}")?;
    writeln!(source)?;

    writeln!(source, "impl std::fmt::Display for {status} {{")?;
    writeln!(source, "    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {{")?;
    writeln!(source, "        let s = unsafe {{ CStr::from_ptr(ffi::{stem}_to_string(self.0)) }};")?;
    writeln!(source, "        write!(f, \"{{}}\", s.to_string_lossy())")?;
    writeln!(source, "    }}")?;
    writeln!(source, "}}")?;
    writeln!(source)?;

    writeln!(source, "impl std::error::Error for {status} {{}}")?;
    writeln!(source)?;

    Ok(())
}

/// The derived type embeds its base and dereferences to it
fn write_embedding(source: &mut String, pair: &SubtypePair) -> Result<()> {
    let SubtypePair { derived, base } = pair;
    let field = pair.field();

    writeln!(source, "/// A {derived} is a {base}, and dereferences to it.")?;
    writeln!(source, "pub struct {derived} {{")?;
    writeln!(source, "    {field}: {base},")?;
    writeln!(source, "}}")?;
    writeln!(source)?;

    writeln!(source, "impl std::ops::Deref for {derived} {{")?;
    writeln!(source, "    type Target = {base};")?;
    writeln!(source)?;
    writeln!(source, "    fn deref(&self) -> &{base} {{")?;
    writeln!(source, "        &self.{field}")?;
    writeln!(source, "    }}")?;
    writeln!(source, "}}")?;
    writeln!(source)?;

    writeln!(source, "impl AsRef<{base}> for {derived} {{")?;
    writeln!(source, "    fn as_ref(&self) -> &{base} {{")?;
    writeln!(source, "        &self.{field}")?;
    writeln!(source, "    }}")?;
    writeln!(source, "}}")?;
    writeln!(source)?;

    writeln!(source, "impl From<{derived}> for {base} {{")?;
    writeln!(source, "    fn from(value: {derived}) -> {base} {{")?;
    writeln!(source, "        value.{field}")?;
    writeln!(source, "    }}")?;
    writeln!(source, "}}")?;

    Ok(())
}
