//! Font resolution.
//!
//! Each [`FontRole`] resolves through a fixed chain: an explicitly configured file, then
//! well-known file names inside the font directory, then the system font database. A role
//! that resolves nowhere yields `None`; callers skip the text and log a warning.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::Digest as _;

use crate::scene::model::FontRole;

/// Where a face came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// Explicit per-role file.
    File(PathBuf),
    /// Candidate file found in the font directory.
    Directory(PathBuf),
    /// Face from the system font database.
    System,
}

/// A face ready for shaping and rasterization.
#[derive(Clone, Debug)]
pub struct LoadedFont {
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection.
    pub index: u32,
    /// Descriptive family name (file stem or database family).
    pub family: String,
    /// Resolution source.
    pub origin: FontOrigin,
}

impl LoadedFont {
    /// Hex SHA-256 of the font bytes, for diagnostics.
    pub fn sha256_hex(&self) -> String {
        let digest = sha2::Sha256::digest(self.bytes.as_slice());
        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }
}

/// File names tried inside the font directory, in order.
pub fn directory_candidates(role: FontRole) -> &'static [&'static str] {
    match role {
        FontRole::Mono => &[
            "GeistMono-Regular.ttf",
            "IBMPlexMono-Regular.ttf",
            "JetBrainsMono-Regular.ttf",
            "DejaVuSansMono.ttf",
        ],
        FontRole::MonoBold => &[
            "JetBrainsMono-Bold.ttf",
            "GeistMono-Bold.ttf",
            "IBMPlexMono-Bold.ttf",
            "DejaVuSansMono-Bold.ttf",
        ],
        FontRole::Sans => &["InstrumentSans-Regular.ttf", "DejaVuSans.ttf"],
        FontRole::SansBold => &["InstrumentSans-Bold.ttf", "DejaVuSans-Bold.ttf"],
    }
}

fn system_families(role: FontRole) -> [usvg::fontdb::Family<'static>; 4] {
    use usvg::fontdb::Family;
    match role {
        FontRole::Mono | FontRole::MonoBold => [
            Family::Name("DejaVu Sans Mono"),
            Family::Name("Liberation Mono"),
            Family::Name("Noto Sans Mono"),
            Family::Monospace,
        ],
        FontRole::Sans | FontRole::SansBold => [
            Family::Name("DejaVu Sans"),
            Family::Name("Liberation Sans"),
            Family::Name("Noto Sans"),
            Family::SansSerif,
        ],
    }
}

/// Caches one resolved face per role.
pub struct FontBook {
    dir: Option<PathBuf>,
    files: HashMap<FontRole, PathBuf>,
    use_system: bool,
    system: Option<usvg::fontdb::Database>,
    cache: HashMap<FontRole, Option<Arc<LoadedFont>>>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FontBook {
    /// Book searching `dir` (if any) and then the system database.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            files: HashMap::new(),
            use_system: true,
            system: None,
            cache: HashMap::new(),
        }
    }

    /// Disable the system database step.
    pub fn without_system_fonts(mut self) -> Self {
        self.use_system = false;
        self
    }

    /// Pin `role` to a specific file, ahead of every other source.
    pub fn set_file(&mut self, role: FontRole, path: impl Into<PathBuf>) {
        self.files.insert(role, path.into());
        self.cache.remove(&role);
    }

    /// Configured font directory.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Pinned files in [`FontRole::ALL`] order.
    pub fn pinned_files(&self) -> Vec<(FontRole, PathBuf)> {
        FontRole::ALL
            .into_iter()
            .filter_map(|role| self.files.get(&role).map(|p| (role, p.clone())))
            .collect()
    }

    /// Whether the system database step is enabled.
    pub fn uses_system_fonts(&self) -> bool {
        self.use_system
    }

    /// Resolve `role`, caching the outcome (including failure).
    pub fn resolve(&mut self, role: FontRole) -> Option<Arc<LoadedFont>> {
        if let Some(hit) = self.cache.get(&role) {
            return hit.clone();
        }
        let found = self.lookup(role).map(Arc::new);
        match &found {
            Some(f) => tracing::debug!(?role, family = %f.family, origin = ?f.origin, "font resolved"),
            None => tracing::warn!(?role, "no font available; text using it will be skipped"),
        }
        self.cache.insert(role, found.clone());
        found
    }

    fn lookup(&mut self, role: FontRole) -> Option<LoadedFont> {
        if let Some(path) = self.files.get(&role).cloned() {
            match read_font(&path) {
                Some(bytes) => {
                    return Some(LoadedFont {
                        bytes,
                        index: 0,
                        family: file_stem(&path),
                        origin: FontOrigin::File(path),
                    });
                }
                None => tracing::warn!(path = %path.display(), "configured font file unreadable"),
            }
        }

        if let Some(dir) = self.dir.clone() {
            for name in directory_candidates(role) {
                let path = dir.join(name);
                if !path.is_file() {
                    continue;
                }
                if let Some(bytes) = read_font(&path) {
                    return Some(LoadedFont {
                        bytes,
                        index: 0,
                        family: file_stem(&path),
                        origin: FontOrigin::Directory(path),
                    });
                }
            }
        }

        if self.use_system {
            return self.lookup_system(role);
        }
        None
    }

    fn lookup_system(&mut self, role: FontRole) -> Option<LoadedFont> {
        let db = self.system.get_or_insert_with(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "system font database loaded");
            db
        });

        let weight = if role.is_bold() {
            usvg::fontdb::Weight::BOLD
        } else {
            usvg::fontdb::Weight::NORMAL
        };
        for family in system_families(role) {
            let families = [family];
            let query = usvg::fontdb::Query {
                families: &families,
                weight,
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            let Some(id) = db.query(&query) else {
                continue;
            };
            let name = db
                .face(id)
                .and_then(|f| f.families.first().map(|(n, _)| n.clone()))
                .unwrap_or_default();
            if let Some((bytes, index)) =
                db.with_face_data(id, |data, index| (data.to_vec(), index))
            {
                return Some(LoadedFont {
                    bytes: Arc::new(bytes),
                    index,
                    family: name,
                    origin: FontOrigin::System,
                });
            }
        }
        None
    }
}

fn read_font(path: &Path) -> Option<Arc<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Some(Arc::new(bytes)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "font read failed");
            None
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
