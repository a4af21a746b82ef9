use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::layout::InventoryLayout;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SelectedFile {
    #[serde(default)]
    selected: Vec<String>,
}

/// Names the operator explicitly asked for, as opposed to packages pulled
/// in some other way. The upgrade path must never edit this list: a
/// replacement install keeps whatever request status the name already had.
pub fn read_selected_names(layout: &InventoryLayout) -> Result<Vec<String>> {
    let path = layout.selected_path();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed reading selected list: {}", path.display()))?;
    let file: SelectedFile = toml::from_str(&content)
        .with_context(|| format!("failed parsing selected list: {}", path.display()))?;

    let mut names = file.selected;
    names.sort();
    names.dedup();
    Ok(names)
}

pub fn mark_selected(layout: &InventoryLayout, name: &str) -> Result<()> {
    let mut names = read_selected_names(layout)?;
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
        names.sort();
    }
    write_selected_names(layout, &names)
}

pub fn unmark_selected(layout: &InventoryLayout, name: &str) -> Result<()> {
    let mut names = read_selected_names(layout)?;
    names.retain(|existing| existing != name);
    write_selected_names(layout, &names)
}

fn write_selected_names(layout: &InventoryLayout, names: &[String]) -> Result<()> {
    layout.ensure_base_dirs()?;
    let path = layout.selected_path();
    let file = SelectedFile {
        selected: names.to_vec(),
    };
    let content = toml::to_string(&file)
        .with_context(|| format!("failed serializing selected list: {}", path.display()))?;
    fs::write(&path, content)
        .with_context(|| format!("failed writing selected list: {}", path.display()))
}
