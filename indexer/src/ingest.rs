use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tripdata_core::{Catalog, DestinationRecord, FallbackEntry, ServiceConfig};
use walkdir::WalkDir;

/// `.json` and `.jsonl` files under `input` (or `input` itself), in path order.
pub fn collect_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

/// Load every document from a file or directory. A `.json` file holds one
/// object or an array of objects; a `.jsonl` file holds one object per line.
pub fn load_documents<T: DeserializeOwned>(input: &Path) -> Result<Vec<T>> {
    let mut docs = Vec::new();
    for file in collect_files(input) {
        if extension(&file) == Some("jsonl") {
            load_jsonl(&file, &mut docs)?;
        } else {
            load_json(&file, &mut docs)?;
        }
    }
    Ok(docs)
}

fn extension(p: &Path) -> Option<&str> {
    p.extension().and_then(|s| s.to_str())
}

fn load_jsonl<T: DeserializeOwned>(file: &Path, docs: &mut Vec<T>) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(file: &Path, docs: &mut Vec<T>) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let json: serde_json::Value =
        serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v).with_context(|| format!("decoding {}", file.display()))?);
            }
        }
        serde_json::Value::Object(_) => {
            docs.push(serde_json::from_value(json).with_context(|| format!("decoding {}", file.display()))?);
        }
        _ => tracing::warn!(file = %file.display(), "ignoring non-object JSON document"),
    }
    Ok(())
}

/// Built-in catalog, or the configured one, plus any fallback records from
/// the configured directory.
pub fn load_catalog(config: &ServiceConfig) -> Result<Catalog> {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)?,
        None => Catalog::builtin(),
    };
    let Some(dir) = &config.fallback_dir else {
        return Ok(catalog);
    };
    let records: Vec<DestinationRecord> = load_documents(dir)?;
    tracing::info!(count = records.len(), dir = %dir.display(), "loaded fallback destinations");
    Ok(catalog.with_fallback(records.into_iter().map(FallbackEntry::from_record).collect()))
}
