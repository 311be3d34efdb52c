//! Request resolution against a compiled catalog.
//!
//! A request path is first matched exactly. On a miss it is normalized to end
//! with `/` and looked up in the index redirect table:
//!
//! ```text
//! LookupExact ─┬─► Found                                   (200, body)
//!              └─► NotFound ─► NormalizeTrailingSlash ─► RedirectLookup ─┬─► RedirectFound     (302)
//!                                                                        └─► RedirectNotFound ─► TerminalNotFound (404)
//! ```
//!
//! Content types come from a [`MimeResolver`] supplied by the consumer.

use std::borrow::Cow;

use crate::{Catalog, FileEntry, IndexRedirectTable, VirtualPath};

/// Maps a virtual path to a content type
pub trait MimeResolver {
    fn mime_type(&self, path: &str) -> String;
}

impl<F> MimeResolver for F
where
    F: Fn(&str) -> String,
{
    fn mime_type(&self, path: &str) -> String {
        self(path)
    }
}

/// States visited while resolving a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupState {
    LookupExact,
    Found,
    NotFound,
    NormalizeTrailingSlash,
    RedirectLookup,
    RedirectFound,
    RedirectNotFound,
    TerminalNotFound,
}

/// Outcome of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Exact match: serve the bytes
    Found {
        entry: &'a FileEntry,
        content_type: String,
    },
    /// Directory request: redirect to its index file, no body
    Redirect { location: &'a VirtualPath },
    /// No resource
    NotFound,
}

impl Resolution<'_> {
    /// HTTP-equivalent status code
    pub fn status(&self) -> u16 {
        match self {
            Resolution::Found { .. } => 200,
            Resolution::Redirect { .. } => 302,
            Resolution::NotFound => 404,
        }
    }
}

/// Answers requests from a catalog and redirect table it borrows
pub struct Router<'a, M> {
    catalog: &'a Catalog,
    redirects: &'a IndexRedirectTable,
    mime: M,
}

impl<'a, M: MimeResolver> Router<'a, M> {
    pub fn new(catalog: &'a Catalog, redirects: &'a IndexRedirectTable, mime: M) -> Self {
        Self {
            catalog,
            redirects,
            mime,
        }
    }

    /// Resolve a request path
    pub fn resolve(&self, path: &str) -> Resolution<'a> {
        self.run(path, |_| {})
    }

    /// Resolve a request path and report every state visited
    pub fn resolve_traced(&self, path: &str) -> (Resolution<'a>, Vec<LookupState>) {
        let mut states = Vec::new();
        let resolution = self.run(path, |state| states.push(state));
        (resolution, states)
    }

    fn run(&self, path: &str, mut visit: impl FnMut(LookupState)) -> Resolution<'a> {
        let mut state = LookupState::LookupExact;
        let mut directory: Cow<'_, str> = Cow::Borrowed(path);
        let mut found: Option<&'a FileEntry> = None;
        let mut target: Option<&'a VirtualPath> = None;

        loop {
            visit(state);
            state = match state {
                LookupState::LookupExact => {
                    found = self.catalog.get(path);
                    if found.is_some() {
                        LookupState::Found
                    } else {
                        LookupState::NotFound
                    }
                }
                LookupState::Found => {
                    return match found {
                        Some(entry) => Resolution::Found {
                            entry,
                            content_type: self.mime.mime_type(entry.virtual_path().as_str()),
                        },
                        None => Resolution::NotFound,
                    };
                }
                LookupState::NotFound => LookupState::NormalizeTrailingSlash,
                LookupState::NormalizeTrailingSlash => {
                    if !directory.ends_with('/') {
                        directory = Cow::Owned(format!("{path}/"));
                    }
                    LookupState::RedirectLookup
                }
                LookupState::RedirectLookup => {
                    target = self.redirects.get(&directory);
                    if target.is_some() {
                        LookupState::RedirectFound
                    } else {
                        LookupState::RedirectNotFound
                    }
                }
                LookupState::RedirectFound => {
                    return match target {
                        Some(location) => Resolution::Redirect { location },
                        None => Resolution::NotFound,
                    };
                }
                LookupState::RedirectNotFound => LookupState::TerminalNotFound,
                LookupState::TerminalNotFound => return Resolution::NotFound,
            };
        }
    }
}
