//! Asset library — image folders and price-list files on disk.
//!
//! Layout:
//! - `motors/<FOLDER>/*.jpg` — one folder per model, one photo per colour
//! - `informasi-tambahan/<name>.jpg` — one price-list image per model
//!
//! Lookups try the literal name first and fall back to the resolver, so the
//! LLM may say `BEAT_STREET` for a folder called `NEW_BEAT_STREET`.
//!
//! Lookups read the directories synchronously. Async callers run them on
//! the blocking pool (`Catalog::produce_report`, `plan_reply_blocking`).

use dealerbot_config::AssetsConfig;
use dealerbot_core::catalog::{AssetCategory, CandidateSource};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::resolver::MatchPolicy;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
const DIRECT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const PRICE_LIST_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Names from the LLM are joined onto directories only when they cannot escape them.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// Sorted names of the entries of `dir` accepted by `keep`.
fn list_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Asset directory not readable");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| keep(&entry.path()))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

#[derive(Debug, Clone)]
pub struct AssetLibrary {
    motors_dir: PathBuf,
    price_lists_dir: PathBuf,
    policy: MatchPolicy,
}

impl AssetLibrary {
    pub fn new(motors_dir: impl Into<PathBuf>, price_lists_dir: impl Into<PathBuf>) -> Self {
        Self {
            motors_dir: motors_dir.into(),
            price_lists_dir: price_lists_dir.into(),
            policy: MatchPolicy::default(),
        }
    }

    pub fn from_config(config: &AssetsConfig) -> Self {
        Self::new(&config.motors_dir, &config.price_lists_dir)
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Model folders under the motors directory.
    pub fn motor_folders(&self) -> Vec<String> {
        list_entries(&self.motors_dir, Path::is_dir)
    }

    /// Price-list image files.
    pub fn price_list_files(&self) -> Vec<String> {
        list_entries(&self.price_lists_dir, |p| p.is_file() && is_image(p))
    }

    /// Every image in a folder, sorted by file name; `None` when there is none.
    pub fn images_in(&self, folder: &Path) -> Option<Vec<PathBuf>> {
        let images: Vec<PathBuf> = list_entries(folder, |p| p.is_file() && is_image(p))
            .into_iter()
            .map(|name| folder.join(name))
            .collect();
        (!images.is_empty()).then_some(images)
    }

    /// Closest model folder to `name`.
    pub fn resolve_folder(&self, name: &str) -> Option<String> {
        self.policy.resolve(name, &self.motor_folders()).candidate
    }

    /// All colour photos for a model.
    pub fn motor_images(&self, name: &str) -> Option<Vec<PathBuf>> {
        if is_plain_name(name) {
            let exact = self.motors_dir.join(name);
            if exact.is_dir() {
                return self.images_in(&exact);
            }
        }

        match self.resolve_folder(name) {
            Some(folder) => {
                info!(requested = %name, folder = %folder, "Fuzzy folder match");
                self.images_in(&self.motors_dir.join(folder))
            }
            None => {
                warn!(requested = %name, "No images found, even with fuzzy match");
                None
            }
        }
    }

    /// One representative photo for a model.
    pub fn motor_image(&self, name: &str) -> Option<PathBuf> {
        if let Some(folder) = self.resolve_folder(name) {
            if let Some(first) = self
                .images_in(&self.motors_dir.join(&folder))
                .and_then(|images| images.into_iter().next())
            {
                debug!(requested = %name, image = %first.display(), "Motor image found via fuzzy match");
                return Some(first);
            }
        }

        if is_plain_name(name) {
            for ext in DIRECT_EXTENSIONS {
                let direct = self.motors_dir.join(format!("{name}.{ext}"));
                if direct.is_file() {
                    return Some(direct);
                }
            }
        }

        warn!(requested = %name, "Motor image not found");
        None
    }

    /// The price-list image for a model.
    pub fn price_list(&self, name: &str) -> Option<PathBuf> {
        if is_plain_name(name) {
            let spaced = name.replace('_', " ");
            for stem in [name, spaced.as_str()] {
                for ext in PRICE_LIST_EXTENSIONS {
                    let candidate = self.price_lists_dir.join(format!("{stem}.{ext}"));
                    if candidate.is_file() {
                        debug!(file = %candidate.display(), "Price list found (exact)");
                        return Some(candidate);
                    }
                }
            }
        }

        let files = self.price_list_files();
        let stems: Vec<&str> = files
            .iter()
            .map(|f| Path::new(f).file_stem().and_then(|s| s.to_str()).unwrap_or(f.as_str()))
            .collect();

        let result = self.policy.resolve(name, &stems);
        let Some(stem) = result.candidate else {
            warn!(requested = %name, "Price list not found");
            return None;
        };

        let index = stems.iter().position(|s| *s == stem)?;
        info!(requested = %name, file = %files[index], score = result.score, "Price list found (fuzzy)");
        Some(self.price_lists_dir.join(&files[index]))
    }
}

impl CandidateSource for AssetLibrary {
    fn list_candidates(&self, category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Motors => self.motor_folders(),
            AssetCategory::PriceLists => self.price_list_files(),
        }
    }
}
