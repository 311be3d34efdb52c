//! C header backend.
//!
//! Every symbol is prefixed with the package name so several generated
//! headers can be included in one translation unit. C forbids empty array
//! initializers, so empty tables get a single zeroed sentinel and rely on the
//! `_count` constant.

use std::io::{self, Write};

use vfsc_manifest::{Catalog, IndexRedirectTable};

use crate::escape::{c_string, write_hex_lines};
use crate::{Emitter, GENERATED_NOTICE};

/// C header backend
#[derive(Debug, Clone)]
pub struct CEmitter {
    prefix: String,
}

impl CEmitter {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            prefix: package.into(),
        }
    }

    fn guard(&self) -> String {
        format!("{}_VIRTUAL_FILE_SYSTEM_H", self.prefix.to_ascii_uppercase())
    }
}

impl Emitter for CEmitter {
    fn name(&self) -> &'static str {
        "c"
    }

    fn emit(
        &self,
        catalog: &Catalog,
        redirects: &IndexRedirectTable,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let p = &self.prefix;
        let guard = self.guard();

        writeln!(out, "/* {GENERATED_NOTICE} */")?;
        writeln!(out, "#ifndef {guard}")?;
        writeln!(out, "#define {guard}")?;
        writeln!(out)?;
        writeln!(out, "#include <stddef.h>")?;
        writeln!(out)?;
        writeln!(out, "typedef struct {{")?;
        writeln!(out, "    const char *path;")?;
        writeln!(out, "    const unsigned char *data;")?;
        writeln!(out, "    size_t length;")?;
        writeln!(out, "}} {p}_virtual_file;")?;
        writeln!(out)?;
        writeln!(out, "typedef struct {{")?;
        writeln!(out, "    const char *directory;")?;
        writeln!(out, "    const char *index;")?;
        writeln!(out, "}} {p}_index_file;")?;
        writeln!(out)?;

        for (i, entry) in catalog.iter().enumerate() {
            if entry.is_empty() {
                writeln!(out, "static const unsigned char {p}_data_{i}[1] = {{ 0 }};")?;
            } else {
                writeln!(out, "static const unsigned char {p}_data_{i}[{}] = {{", entry.len())?;
                write_hex_lines(out, entry.bytes(), "    ")?;
                writeln!(out, "}};")?;
            }
        }
        if !catalog.is_empty() {
            writeln!(out)?;
        }

        writeln!(out, "static const {p}_virtual_file {p}_files[] = {{")?;
        for (i, entry) in catalog.iter().enumerate() {
            writeln!(
                out,
                "    {{ {}, {p}_data_{i}, {} }},",
                c_string(entry.virtual_path().as_str()),
                entry.len()
            )?;
        }
        if catalog.is_empty() {
            writeln!(out, "    {{ NULL, NULL, 0 }},")?;
        }
        writeln!(out, "}};")?;
        writeln!(out, "static const size_t {p}_files_count = {};", catalog.len())?;
        writeln!(out)?;

        writeln!(out, "static const {p}_index_file {p}_index_files[] = {{")?;
        for (directory, index) in redirects.iter() {
            writeln!(
                out,
                "    {{ {}, {} }},",
                c_string(directory),
                c_string(index.as_str())
            )?;
        }
        if redirects.is_empty() {
            writeln!(out, "    {{ NULL, NULL }},")?;
        }
        writeln!(out, "}};")?;
        writeln!(
            out,
            "static const size_t {p}_index_files_count = {};",
            redirects.len()
        )?;
        writeln!(out)?;
        writeln!(out, "#endif /* {guard} */")?;
        Ok(())
    }
}
