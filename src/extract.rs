//! Save archive extraction
//!
//! Loads an unpacked save folder into flat `(path, content)` entries and
//! classifies each entry by its position in the save layout. All path-based
//! correlation (which property an object belongs to, which NPC a message
//! file describes) is decided here and nowhere else.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::error::SaveError;
use crate::models::ArchiveEntry;

/// What a save entry holds, with the names embedded in its path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind<'a> {
    /// `<root>/Products/Products.json`
    ProductManifest,
    /// Any other JSON file under `<root>/Products/`
    ProductInstance,
    /// `<root>/Properties/<property>/Property.json`
    PropertyRecord { property: &'a str },
    /// `<root>/Properties/<property>/Employees/<employee>/NPC.json`
    PropertyEmployee { property: &'a str, employee: &'a str },
    /// `<root>/Properties/<property>/.../*Data.json`
    PropertyObject { property: &'a str },
    /// `<root>/NPCs/<npc>/.../NPC.json`
    Npc { npc: &'a str },
    /// `<root>/NPCs/<npc>/.../CustomerData.json`
    CustomerData { npc: &'a str },
    /// `<root>/NPCs/<npc>/.../MessageConversation.json`
    MessageConversation { npc: &'a str },
    /// `<root>/NPCs/<npc>/.../Relationship.json`
    Relationship { npc: &'a str },
    /// `<root>/<category>.json`
    Global { category: &'a str },
    Other,
}

/// Top-level area of the save an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Products,
    Properties,
    Npcs,
    Globals,
    Other,
}

impl EntryKind<'_> {
    pub fn section(&self) -> Section {
        match self {
            EntryKind::ProductManifest | EntryKind::ProductInstance => Section::Products,
            EntryKind::PropertyRecord { .. }
            | EntryKind::PropertyEmployee { .. }
            | EntryKind::PropertyObject { .. } => Section::Properties,
            EntryKind::Npc { .. }
            | EntryKind::CustomerData { .. }
            | EntryKind::MessageConversation { .. }
            | EntryKind::Relationship { .. } => Section::Npcs,
            EntryKind::Global { .. } => Section::Globals,
            EntryKind::Other => Section::Other,
        }
    }
}

fn is_json(file: &str) -> bool {
    file.ends_with(".json")
}

/// Classify an entry path of the form `<root>/...`
pub fn classify(path: &str) -> EntryKind<'_> {
    let segments: Vec<&str> = path.split('/').collect();

    match segments.as_slice() {
        [_, "Products", "Products.json"] => EntryKind::ProductManifest,
        [_, "Products", .., file] if is_json(file) => EntryKind::ProductInstance,

        [_, "Properties", property, "Property.json"] => {
            EntryKind::PropertyRecord { property: *property }
        }
        [_, "Properties", property, "Employees", employee, "NPC.json"] => {
            EntryKind::PropertyEmployee {
                property: *property,
                employee: *employee,
            }
        }
        [_, "Properties", property, .., file] if file.ends_with("Data.json") => {
            EntryKind::PropertyObject { property: *property }
        }

        [_, "NPCs", npc, .., file] => {
            let npc = *npc;
            match *file {
                "NPC.json" => EntryKind::Npc { npc },
                f if f.ends_with("CustomerData.json") => EntryKind::CustomerData { npc },
                f if f.ends_with("MessageConversation.json") => {
                    EntryKind::MessageConversation { npc }
                }
                f if f.ends_with("Relationship.json") => EntryKind::Relationship { npc },
                _ => EntryKind::Other,
            }
        }

        [_, file] if is_json(file) => EntryKind::Global {
            category: (*file).trim_end_matches(".json"),
        },

        _ => EntryKind::Other,
    }
}

/// Deserialize an entry, logging and returning `None` when it does not fit
/// the expected shape
pub fn read_json<T: DeserializeOwned>(entry: &ArchiveEntry) -> Option<T> {
    match serde_json::from_str(&entry.content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping malformed file {}: {}", entry.path, e);
            None
        }
    }
}

/// The entries of one save, grouped by section
#[derive(Debug)]
pub struct SaveLayout<'a> {
    pub root: &'a str,
    manifest: Option<&'a ArchiveEntry>,
    product_instances: Vec<&'a ArchiveEntry>,
    properties: Vec<&'a ArchiveEntry>,
    npcs: Vec<&'a ArchiveEntry>,
    globals: Vec<&'a ArchiveEntry>,
}

impl<'a> SaveLayout<'a> {
    /// Group entries under the save root, taken from the first entry's
    /// leading folder. Entries outside the root are ignored.
    pub fn scan(entries: &'a [ArchiveEntry]) -> Result<Self, SaveError> {
        let first = entries.first().ok_or(SaveError::EmptyArchive)?;
        let root = match first.path.split_once('/') {
            Some((root, _)) if !root.is_empty() => root,
            _ => return Err(SaveError::MissingRoot),
        };

        let mut layout = SaveLayout {
            root,
            manifest: None,
            product_instances: Vec::new(),
            properties: Vec::new(),
            npcs: Vec::new(),
            globals: Vec::new(),
        };

        let mut outside = 0usize;
        for entry in entries {
            let under_root = entry
                .path
                .strip_prefix(root)
                .is_some_and(|rest| rest.starts_with('/'));
            if !under_root {
                outside += 1;
                continue;
            }

            let kind = classify(&entry.path);
            match kind.section() {
                Section::Products if kind == EntryKind::ProductManifest => {
                    layout.manifest = Some(entry)
                }
                Section::Products => layout.product_instances.push(entry),
                Section::Properties => layout.properties.push(entry),
                Section::Npcs => layout.npcs.push(entry),
                Section::Globals => layout.globals.push(entry),
                Section::Other => {}
            }
        }

        if outside > 0 {
            warn!("Ignored {} entries outside save root '{}'", outside, root);
        }
        debug!(
            "Save '{}': {} product files, {} property files, {} NPC files, {} global files",
            root,
            layout.product_instances.len(),
            layout.properties.len(),
            layout.npcs.len(),
            layout.globals.len()
        );

        Ok(layout)
    }

    /// Product instance files followed by the manifest as the last element
    pub fn product_files(&self) -> Result<Vec<&'a ArchiveEntry>, SaveError> {
        let manifest = self.manifest.ok_or_else(|| SaveError::MissingProductsManifest {
            root: self.root.to_string(),
        })?;
        let mut files = self.product_instances.clone();
        files.push(manifest);
        Ok(files)
    }

    pub fn property_files(&self) -> &[&'a ArchiveEntry] {
        &self.properties
    }

    pub fn npc_files(&self) -> &[&'a ArchiveEntry] {
        &self.npcs
    }

    pub fn global_files(&self) -> &[&'a ArchiveEntry] {
        &self.globals
    }
}

/// Read every JSON file below an unpacked save folder.
///
/// Entry paths start with the folder's own name so they look exactly like
/// the paths inside a zipped save.
pub fn load_save_dir(save_dir: &Path) -> Result<Vec<ArchiveEntry>, SaveError> {
    let root = save_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SaveError::UnnamedDirectory(save_dir.to_path_buf()))?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(save_dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }

        let Ok(relative) = path.strip_prefix(save_dir) else {
            continue;
        };
        let mut segments = vec![root];
        segments.extend(relative.components().filter_map(|c| c.as_os_str().to_str()));

        match fs::read_to_string(path) {
            Ok(content) => entries.push(ArchiveEntry::new(segments.join("/"), content)),
            Err(e) => warn!("Skipping unreadable file {}: {}", path.display(), e),
        }
    }

    debug!("Loaded {} entries from {}", entries.len(), save_dir.display());
    Ok(entries)
}
