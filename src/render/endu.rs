//! Endu template export.
//!
//! Export groups are redistributed as an endu-style template JSON: one
//! record per group with a display name, a reference to its cropped
//! image, and the crop's top-left coordinates.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AsmError, Result};

use super::group::FinishedGroup;

/// Faction details carried through from `template.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnduInfo {
    /// Faction display name.
    pub name: Option<String>,
    pub contact: Option<String>,
    /// URL prefix under which exported images will be hosted.
    pub source_root: Option<String>,
}

impl EnduInfo {
    /// Resolve an exported file name to the reference published in the template.
    pub fn image_reference(&self, file_name: &str) -> String {
        match self.source_root.as_deref() {
            Some(root) if !root.is_empty() => {
                format!("{}/{}", root.trim_end_matches('/'), file_name)
            }
            _ => file_name.to_string(),
        }
    }
}

/// One exported group, as consumed by the foreign template format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDescriptor {
    pub name: String,
    /// Resolvable reference to the cropped image.
    pub image: String,
    pub x: u32,
    pub y: u32,
}

impl GroupDescriptor {
    pub fn new(group: &FinishedGroup, image: impl Into<String>) -> Self {
        Self {
            name: group.name.clone(),
            image: image.into(),
            x: group.x,
            y: group.y,
        }
    }
}

/// Build the endu template document.
pub fn endu_document(info: &EnduInfo, groups: &[GroupDescriptor]) -> EnduTemplate {
    EnduTemplate {
        faction: info.name.clone(),
        contact: info.contact.clone(),
        templates: groups
            .iter()
            .map(|g| EnduEntry {
                name: g.name.clone(),
                sources: vec![g.image.clone()],
                x: g.x,
                y: g.y,
            })
            .collect(),
        whitelist: vec![],
        blacklist: vec![],
    }
}

/// Write the endu template JSON.
pub fn write_endu_json(info: &EnduInfo, groups: &[GroupDescriptor], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&endu_document(info, groups)).map_err(|e| {
        AsmError::Build {
            message: format!("Failed to serialize endu template: {}", e),
            help: None,
        }
    })?;
    fs::write(path, json).map_err(|e| AsmError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write endu template: {}", e),
    })?;
    Ok(())
}

// --- endu JSON serialization types ---

#[derive(Debug, Serialize)]
pub struct EnduTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    faction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact: Option<String>,
    templates: Vec<EnduEntry>,
    whitelist: Vec<EnduLink>,
    blacklist: Vec<EnduLink>,
}

#[derive(Debug, Serialize)]
struct EnduEntry {
    name: String,
    sources: Vec<String>,
    x: u32,
    y: u32,
}

#[derive(Debug, Serialize)]
struct EnduLink {
    name: String,
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use tempfile::tempdir;

    fn finished(name: &str, x: u32, y: u32) -> FinishedGroup {
        FinishedGroup {
            name: name.to_string(),
            image: RgbaImage::new(2, 2),
            x,
            y,
        }
    }

    #[test]
    fn test_image_reference_with_root() {
        let info = EnduInfo {
            source_root: Some("http://cdn.example/mlp/".to_string()),
            ..Default::default()
        };
        assert_eq!(info.image_reference("endu-a.png"), "http://cdn.example/mlp/endu-a.png");
        assert_eq!(EnduInfo::default().image_reference("endu-a.png"), "endu-a.png");
    }

    #[test]
    fn test_descriptor_fields() {
        let d = GroupDescriptor::new(&finished("starter", 451, 712), "endu-starter.png");
        insta::assert_json_snapshot!(d, @r###"
        {
          "name": "starter",
          "image": "endu-starter.png",
          "x": 451,
          "y": 712
        }
        "###);
    }

    #[test]
    fn test_write_endu_json() {
        let info = EnduInfo {
            name: Some("r/place bronies".to_string()),
            contact: Some("#diplomacy".to_string()),
            source_root: None,
        };
        let groups = vec![
            GroupDescriptor::new(&finished("a", 1, 2), "endu-a.png"),
            GroupDescriptor::new(&finished("b", 3, 4), "endu-b.png"),
        ];

        let dir = tempdir().unwrap();
        let path = dir.path().join("endu.json");
        write_endu_json(&info, &groups, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["faction"], "r/place bronies");
        assert_eq!(parsed["templates"][0]["name"], "a");
        assert_eq!(parsed["templates"][0]["sources"][0], "endu-a.png");
        assert_eq!(parsed["templates"][1]["x"], 3);
        assert_eq!(parsed["templates"][1]["y"], 4);
        assert!(parsed["whitelist"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_empty_info_omits_faction() {
        let doc = serde_json::to_value(endu_document(&EnduInfo::default(), &[])).unwrap();
        assert!(doc.get("faction").is_none());
        assert!(doc["templates"].as_array().unwrap().is_empty());
    }
}
