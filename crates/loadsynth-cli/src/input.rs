//! Loading load definition files.

use std::path::Path;

use anyhow::{Context, Result};
use loadsynth_spec::LoadStore;

/// Reads a definition file holding one definition or an array of them.
pub fn load_store(path: &Path) -> Result<LoadStore> {
    let text = read_text(path)?;
    let store = LoadStore::from_json(&text)
        .with_context(|| format!("Failed to parse load definitions: {}", path.display()))?;
    log::debug!("loaded {} definition(s) from {}", store.count(), path.display());
    Ok(store)
}

/// Reads a UTF-8 text file.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Writes the store, computed arrays included, as pretty JSON.
pub fn write_store(store: &LoadStore, path: &Path) -> Result<()> {
    let json = store
        .to_json_pretty()
        .context("Failed to serialize load definitions")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_single_and_array() {
        let tmp = tempfile::tempdir().unwrap();
        let single = tmp.path().join("one.json");
        std::fs::write(
            &single,
            r#"{"name": "a", "end_time": 1.0, "delta_time": 0.1,
                "input": {"mode": "expression", "expression": "t"}}"#,
        )
        .unwrap();
        assert_eq!(load_store(&single).unwrap().count(), 1);

        let array = tmp.path().join("many.json");
        std::fs::write(
            &array,
            r#"[{"name": "a", "end_time": 1.0, "delta_time": 0.1,
                 "input": {"mode": "expression", "expression": "t"}},
                {"name": "b", "end_time": 1.0, "delta_time": 0.1,
                 "input": {"mode": "tabular", "times": [0, 1], "amplitudes": [0, 1]}}]"#,
        )
        .unwrap();
        assert_eq!(load_store(&array).unwrap().count(), 2);
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.json");
        let err = load_store(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.json"));

        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "{").unwrap();
        let err = load_store(&bad).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
