//! JSON backend.
//!
//! ```json
//! {"package":"vfs","files":[{"path":"/a.txt","data":[104,105],"length":2}],
//!  "index_files":{"/sub/":"/sub/index.html"}}
//! ```
//!
//! Entries and index files keep catalog order. Serialization borrows the
//! catalog; nothing is copied.

use std::io::{self, Write};

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use vfsc_manifest::{Catalog, FileEntry, IndexRedirectTable};

use crate::Emitter;

/// JSON document backend
#[derive(Debug, Clone)]
pub struct JsonEmitter {
    package: String,
}

impl JsonEmitter {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }
}

impl Emitter for JsonEmitter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn emit(
        &self,
        catalog: &Catalog,
        redirects: &IndexRedirectTable,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let document = Document {
            package: &self.package,
            files: Files(catalog),
            index_files: IndexFiles(redirects),
        };
        serde_json::to_writer(&mut *out, &document)?;
        out.write_all(b"\n")
    }
}

#[derive(Serialize)]
struct Document<'a> {
    package: &'a str,
    files: Files<'a>,
    index_files: IndexFiles<'a>,
}

struct Files<'a>(&'a Catalog);

impl Serialize for Files<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for entry in self.0 {
            seq.serialize_element(&File(entry))?;
        }
        seq.end()
    }
}

struct File<'a>(&'a FileEntry);

impl Serialize for File<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("VirtualFile", 3)?;
        record.serialize_field("path", self.0.virtual_path().as_str())?;
        record.serialize_field("data", self.0.bytes())?;
        record.serialize_field("length", &self.0.len())?;
        record.end()
    }
}

struct IndexFiles<'a>(&'a IndexRedirectTable);

impl Serialize for IndexFiles<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (directory, index) in self.0.iter() {
            map.serialize_entry(directory, index.as_str())?;
        }
        map.end()
    }
}
