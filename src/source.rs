//! Image source resolution.
//!
//! Each entry lists candidate sources; the first one that decodes wins.
//! The filesystem resolver reads paths relative to the project root and
//! keeps decoded images for the rest of the run, since many entries
//! share sources.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{AsmError, Result};
use crate::types::TemplateEntry;

/// Turns a source descriptor into a decoded RGBA buffer.
pub trait ImageResolver {
    /// Resolve one source, failing with [`AsmError::Load`].
    fn resolve(&mut self, source: &str) -> Result<RgbaImage>;
}

/// Resolve the first source of `entry` that loads.
pub fn load_first<R: ImageResolver + ?Sized>(resolver: &mut R, entry: &TemplateEntry) -> Result<RgbaImage> {
    if entry.sources.is_empty() {
        return Err(AsmError::Config {
            message: format!("Entry '{}' has no image sources", entry.name),
            help: Some("Add at least one path to \"images\"".to_string()),
        });
    }

    let mut failures = Vec::new();
    for source in &entry.sources {
        match resolver.resolve(source) {
            Ok(image) => return Ok(image),
            Err(e) => failures.push(format!("{}: {}", source, e)),
        }
    }

    Err(AsmError::Load {
        message: format!("Unable to load any image for '{}'", entry.name),
        help: Some(failures.join("; ")),
    })
}

/// Resolves local paths, caching decoded images per source string.
#[derive(Debug)]
pub struct FsResolver {
    root: PathBuf,
    cache: HashMap<String, RgbaImage>,
}

impl FsResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of decoded images held.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl ImageResolver for FsResolver {
    fn resolve(&mut self, source: &str) -> Result<RgbaImage> {
        if let Some(image) = self.cache.get(source) {
            return Ok(image.clone());
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            return Err(AsmError::Load {
                message: format!("Remote source '{}' is not fetched by the local resolver", source),
                help: Some("List a local mirror path as a later candidate".to_string()),
            });
        }

        let path = if Path::new(source).is_absolute() {
            PathBuf::from(source)
        } else {
            self.root.join(source)
        };

        let image = image::open(&path)
            .map_err(|e| AsmError::Load {
                message: format!("Failed to decode {}: {}", path.display(), e),
                help: None,
            })?
            .to_rgba8();

        self.cache.insert(source.to_string(), image.clone());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    /// In-memory resolver for driving the fallback chain.
    struct MapResolver(HashMap<String, RgbaImage>);

    impl ImageResolver for MapResolver {
        fn resolve(&mut self, source: &str) -> Result<RgbaImage> {
            self.0.get(source).cloned().ok_or_else(|| AsmError::Load {
                message: format!("missing {}", source),
                help: None,
            })
        }
    }

    #[test]
    fn test_first_success_wins() {
        let mut images = HashMap::new();
        images.insert("b.png".to_string(), RgbaImage::new(2, 2));
        images.insert("c.png".to_string(), RgbaImage::new(3, 3));
        let mut resolver = MapResolver(images);

        let entry = TemplateEntry::new("e", 0, 0)
            .with_source("a.png")
            .with_source("b.png")
            .with_source("c.png");
        let image = load_first(&mut resolver, &entry).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
    }

    #[test]
    fn test_all_sources_failing_is_load_error() {
        let mut resolver = MapResolver(HashMap::new());
        let entry = TemplateEntry::new("e", 0, 0).with_source("a.png").with_source("b.png");
        let err = load_first(&mut resolver, &entry).unwrap_err();

        assert!(matches!(err, AsmError::Load { .. }));
        let help = err.help_text().unwrap();
        assert!(help.contains("a.png") && help.contains("b.png"));
    }

    #[test]
    fn test_no_sources_is_config_error() {
        let mut resolver = MapResolver(HashMap::new());
        let err = load_first(&mut resolver, &TemplateEntry::new("e", 0, 0)).unwrap_err();
        assert!(matches!(err, AsmError::Config { .. }));
    }

    #[test]
    fn test_fs_resolver_decodes_and_caches() {
        let dir = tempdir().unwrap();
        let img = RgbaImage::from_pixel(3, 2, Rgba([255, 69, 0, 255]));
        img.save(dir.path().join("art.png")).unwrap();

        let mut resolver = FsResolver::new(dir.path());
        assert_eq!(resolver.resolve("art.png").unwrap(), img);
        assert_eq!(resolver.cached(), 1);

        std::fs::remove_file(dir.path().join("art.png")).unwrap();
        assert_eq!(resolver.resolve("art.png").unwrap(), img);
    }

    #[test]
    fn test_fs_resolver_falls_back_past_remote_and_missing() {
        let dir = tempdir().unwrap();
        RgbaImage::new(1, 1).save(dir.path().join("mirror.png")).unwrap();

        let mut resolver = FsResolver::new(dir.path());
        let entry = TemplateEntry::new("e", 0, 0)
            .with_source("https://cdn.example/art.png")
            .with_source("missing.png")
            .with_source("mirror.png");
        assert_eq!(load_first(&mut resolver, &entry).unwrap().dimensions(), (1, 1));
    }
}
