//! Persist an assembly: the fixed canvases, one PNG per export group,
//! and the endu template describing the groups.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AsmError, Result};
use crate::render::{group_file_name, write_endu_json, write_png, EnduInfo, GroupDescriptor};

use super::Assembly;

/// File name of the endu template written beside the group crops.
pub const ENDU_FILENAME: &str = "endu.json";

/// Paths written by [`write_assembly`].
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    pub canvases: Vec<PathBuf>,
    pub groups: Vec<PathBuf>,
    /// Only written when there is at least one group.
    pub endu: Option<PathBuf>,
}

impl WrittenFiles {
    pub fn len(&self) -> usize {
        self.canvases.len() + self.groups.len() + usize::from(self.endu.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write every output of `assembly` into `dir`, creating it if needed.
pub fn write_assembly(assembly: &Assembly, info: &EnduInfo, dir: &Path) -> Result<WrittenFiles> {
    fs::create_dir_all(dir).map_err(|e| AsmError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let mut written = WrittenFiles::default();

    for canvas in assembly.canvases() {
        let path = dir.join(format!("{}.png", canvas.name));
        write_png(canvas.image(), &path)?;
        written.canvases.push(path);
    }

    let mut used = HashSet::new();
    let mut descriptors = Vec::with_capacity(assembly.groups.len());
    for group in &assembly.groups {
        let file_name = unique_name(&mut used, &group_file_name(&group.name));
        let path = dir.join(&file_name);
        write_png(&group.image, &path)?;
        descriptors.push(GroupDescriptor::new(group, info.image_reference(&file_name)));
        written.groups.push(path);
    }

    if !descriptors.is_empty() {
        let path = dir.join(ENDU_FILENAME);
        write_endu_json(info, &descriptors, &path)?;
        written.endu = Some(path);
    }

    Ok(written)
}

/// Suffix `-2`, `-3`, ... until `file_name` is unused.
fn unique_name(used: &mut HashSet<String>, file_name: &str) -> String {
    let stem = file_name.trim_end_matches(".png");
    let mut candidate = file_name.to_string();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}-{}.png", stem, n);
        n += 1;
    }
    candidate
}
