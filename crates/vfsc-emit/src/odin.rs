//! Odin backend.
//!
//! Emits a `VirtualFile` record type, a `virtual_files` array and an
//! `index_files` array of directory/index pairs. The lookup procedures live
//! in the consuming program.

use std::io::{self, Write};

use vfsc_manifest::{Catalog, IndexRedirectTable};

use crate::escape::{odin_string, write_hex_lines};
use crate::{Emitter, GENERATED_NOTICE};

/// Odin source backend
#[derive(Debug, Clone)]
pub struct OdinEmitter {
    package: String,
}

impl OdinEmitter {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }
}

impl Emitter for OdinEmitter {
    fn name(&self) -> &'static str {
        "odin"
    }

    fn emit(
        &self,
        catalog: &Catalog,
        redirects: &IndexRedirectTable,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(out, "// {GENERATED_NOTICE}")?;
        writeln!(out)?;
        writeln!(out, "package {}", self.package)?;
        writeln!(out)?;
        out.write_all(
            b"VirtualFile :: struct {\n\
              \tpath:   string,\n\
              \tdata:   []u8,\n\
              \tlength: int,\n\
              }\n\n\
              IndexFile :: struct {\n\
              \tdirectory: string,\n\
              \tindex:     string,\n\
              }\n\n",
        )?;

        writeln!(out, "virtual_files := [?]VirtualFile{{")?;
        for entry in catalog {
            writeln!(out, "\t{{")?;
            writeln!(out, "\t\tpath = {},", odin_string(entry.virtual_path().as_str()))?;
            if entry.is_empty() {
                writeln!(out, "\t\tdata = []u8{{}},")?;
            } else {
                writeln!(out, "\t\tdata = []u8{{")?;
                write_hex_lines(out, entry.bytes(), "\t\t\t")?;
                writeln!(out, "\t\t}},")?;
            }
            writeln!(out, "\t\tlength = {},", entry.len())?;
            writeln!(out, "\t}},")?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "index_files := [?]IndexFile{{")?;
        for (directory, index) in redirects.iter() {
            writeln!(
                out,
                "\t{{directory = {}, index = {}}},",
                odin_string(directory),
                odin_string(index.as_str())
            )?;
        }
        writeln!(out, "}}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfsc_manifest::{index, FileEntry, VirtualPath};

    fn render(files: &[(&str, &[u8])]) -> String {
        let (catalog, redirects) = index(files.iter().map(|(path, bytes)| {
            FileEntry::new(VirtualPath::parse(path).unwrap(), *path, bytes.to_vec())
        }));
        let mut out = Vec::new();
        OdinEmitter::new("vfs")
            .emit(&catalog, &redirects, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_example_tree() {
        let text = render(&[("/a.txt", b"hi"), ("/sub/index.html", b"<p>x</p>")]);

        assert!(text.starts_with("// Code generated by vfsc. DO NOT EDIT.\n\npackage vfs\n"));
        assert!(text.contains(
            "\t{\n\t\tpath = \"/a.txt\",\n\t\tdata = []u8{\n\t\t\t0x68, 0x69,\n\t\t},\n\t\tlength = 2,\n\t},\n"
        ));
        assert!(text.contains("\t\tpath = \"/sub/index.html\",\n"));
        assert!(text.contains("\t\tlength = 8,\n"));
        assert!(text.contains(
            "index_files := [?]IndexFile{\n\t{directory = \"/sub/\", index = \"/sub/index.html\"},\n}\n"
        ));
    }

    #[test]
    fn test_length_uses_assignment_syntax() {
        let text = render(&[("/a.txt", b"hi")]);
        assert!(text.contains("length = 2,"));
        assert!(!text.contains("length:  2"));
        assert!(!text.contains("length: 2"));
    }

    #[test]
    fn test_empty_catalog() {
        let text = render(&[]);
        assert!(text.contains("virtual_files := [?]VirtualFile{\n}\n"));
        assert!(text.contains("index_files := [?]IndexFile{\n}\n"));
    }

    #[test]
    fn test_empty_file() {
        let text = render(&[("/empty", b"")]);
        assert!(text.contains("\t\tdata = []u8{},\n\t\tlength = 0,\n"));
    }

    #[test]
    fn test_quote_in_path_escaped() {
        let text = render(&[("/say \"hi\".txt", b"x")]);
        assert!(text.contains(r#"path = "/say \"hi\".txt","#));
    }
}
