use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::graph::PageNode;

#[derive(Debug, Deserialize)]
struct PathsDocument {
    paths: Vec<Vec<PageNode>>,
}

pub fn load_paths(file: &Path) -> Result<Vec<Vec<PageNode>>> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("failed to read paths file {}", file.display()))?;
    parse_paths(&raw).with_context(|| format!("invalid paths file {}", file.display()))
}

/// Accepts either a bare top-level array of paths or an object wrapping the
/// array under a `paths` key. An empty collection is valid (the viewer renders
/// nothing); a path entry without a usable title is not.
pub fn parse_paths(raw: &str) -> Result<Vec<Vec<PageNode>>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON")?;

    let paths = if parsed.is_array() {
        Vec::<Vec<PageNode>>::deserialize(&parsed).context("invalid path array")?
    } else if parsed.is_object() {
        PathsDocument::deserialize(&parsed)
            .context("expected a `paths` array")?
            .paths
    } else {
        return Err(anyhow!("expected a JSON array or object at the top level"));
    };

    for (index, path) in paths.iter().enumerate() {
        for page in path {
            if page.title.trim().is_empty() {
                return Err(anyhow!("path {index} contains an entry without a title"));
            }
        }
    }

    Ok(paths)
}
