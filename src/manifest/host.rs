//! Host manifest generation.
//!
//! The host loads a module through a line-oriented manifest:
//!
//! ```text
//! fx_version 'cerulean'
//! name 'foo'
//! version '1.0.0'
//! client_scripts { 'shared/config.lua', 'client/client.js' }
//! server_scripts { 'shared/config.lua', 'server/server.js' }
//! files { 'ui/index.html' }
//! dependencies { 'core' }
//! ```
//!
//! It is regenerated from scratch on every build, never merged.

use std::collections::BTreeMap;

use super::Manifest;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Value(String, String),
    List(String, Vec<String>),
}

/// Ordered host manifest entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostManifest {
    entries: Vec<Entry>,
}

/// Staged files of one side, relative to the staging root.
#[derive(Debug, Clone, Default)]
pub struct SideScripts {
    /// Compiled bundle, when the side had entry points.
    pub compiled: Option<String>,
    /// Copied scripts found under the side directory.
    pub scripts: Vec<String>,
}

impl SideScripts {
    fn is_empty(&self) -> bool {
        self.compiled.is_none() && self.scripts.is_empty()
    }
}

/// Everything the generator needs to know about a staged module.
#[derive(Debug, Clone, Default)]
pub struct StagedLayout {
    pub shared: Vec<String>,
    pub locales: Vec<String>,
    pub client: SideScripts,
    pub server: SideScripts,
    /// Non-script assets the host must ship (UI markup, data files).
    pub files: Vec<String>,
}

impl StagedLayout {
    /// Script list of one side: shared, locales, compiled, remaining.
    ///
    /// A side with neither a bundle nor scripts of its own gets nothing, not
    /// even the shared scripts.
    pub fn side_list(&self, side: &SideScripts) -> Vec<String> {
        if side.is_empty() {
            return Vec::new();
        }
        self.shared
            .iter()
            .chain(&self.locales)
            .chain(&side.compiled)
            .chain(&side.scripts)
            .cloned()
            .collect()
    }
}

impl HostManifest {
    pub fn value(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push(Entry::Value(key.into(), value.into()));
        self
    }

    /// Add an array section. Empty sections are not emitted.
    pub fn list(&mut self, key: impl Into<String>, items: Vec<String>) -> &mut Self {
        if !items.is_empty() {
            self.entries.push(Entry::List(key.into(), items));
        }
        self
    }

    /// Items of section `key`, empty when absent.
    pub fn items(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                Entry::List(k, items) if k == key => Some(items.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                Entry::Value(key, value) => {
                    out.push_str(&format!("{key} {}\n", quote(value)));
                }
                Entry::List(key, items) => {
                    let items: Vec<_> = items.iter().map(|s| quote(s)).collect();
                    out.push_str(&format!("{key} {{ {} }}\n", items.join(", ")));
                }
            }
        }
        out
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Build the host manifest: header keys, metadata, then array sections.
pub fn generate(
    header: &BTreeMap<String, String>,
    manifest: &Manifest,
    layout: &StagedLayout,
) -> HostManifest {
    let mut host = HostManifest::default();

    for (key, value) in header {
        host.value(key, value);
    }

    host.value("name", &manifest.name)
        .value("version", &manifest.version);
    if let Some(description) = &manifest.description {
        host.value("description", description);
    }
    if let Some(author) = &manifest.author {
        host.value("author", author);
    }

    host.list("client_scripts", layout.side_list(&layout.client))
        .list("server_scripts", layout.side_list(&layout.server))
        .list("files", layout.files.clone())
        .list("dependencies", manifest.dependencies.clone());

    host
}
