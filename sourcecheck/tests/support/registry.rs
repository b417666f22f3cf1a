use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

/// `(key, name, api)`の並びからレジストリJSONを書き出す
#[allow(dead_code)]
pub fn write_registry(dir: &Path, entries: &[(&str, &str, &str)]) -> PathBuf {
    let mut map = Map::new();
    for (key, name, api) in entries {
        map.insert(key.to_string(), json!({ "name": name, "api": api }));
    }
    let path = dir.join("sources.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&Value::Object(map)).unwrap()).unwrap();
    path
}
