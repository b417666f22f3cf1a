//! エンドポイントレジストリの読み込み
//!
//! キー → `{ name, api }` のマッピングをJSONまたはYAMLから読み込む。
//! ドキュメント上の順序がそのまま投入順になる。

use crate::error::{Result, SourceCheckError};
use reqwest::Url;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use sourcecheck_common::types::Endpoint;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// レジストリの1エントリ
#[derive(Debug, Deserialize)]
struct RegistryEntry {
    /// 表示名
    name: String,
    /// APIベースURL
    api: String,
    /// 詳細ページURL（読み捨て）
    #[serde(default)]
    #[allow(dead_code)]
    detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistryFormat {
    Json,
    Yaml,
}

impl RegistryFormat {
    fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// レジストリファイルを読み込んでエンドポイント一覧を返す
///
/// ファイルが存在しない・読めない・形式が不正な場合は致命的エラー。
pub async fn load_registry(path: &Path) -> Result<Vec<Endpoint>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SourceCheckError::RegistryNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(SourceCheckError::Io(e)),
    };

    let endpoints = parse_registry(&content, RegistryFormat::from_path(path)).map_err(
        |message| SourceCheckError::Registry {
            path: path.to_path_buf(),
            message,
        },
    )?;

    info!(
        path = %path.display(),
        count = endpoints.len(),
        "Loaded endpoint registry"
    );
    Ok(endpoints)
}

/// ドキュメント順のエントリ列
///
/// マッピングを順に読み、同じキーが2度現れた時点でエラーにする。
struct RegistryDocument(Vec<(String, RegistryEntry)>);

impl<'de> Deserialize<'de> for RegistryDocument {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RegistryVisitor)
    }
}

struct RegistryVisitor;

impl<'de> Visitor<'de> for RegistryVisitor {
    type Value = RegistryDocument;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping of endpoint keys to entries")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            if !seen.insert(key.clone()) {
                return Err(<A::Error as de::Error>::custom(format!(
                    "entry '{}': duplicate key",
                    key
                )));
            }
            let entry = map
                .next_value::<RegistryEntry>()
                .map_err(|e| <A::Error as de::Error>::custom(format!("entry '{}': {}", key, e)))?;
            entries.push((key, entry));
        }
        Ok(RegistryDocument(entries))
    }
}

fn parse_registry(
    content: &str,
    format: RegistryFormat,
) -> std::result::Result<Vec<Endpoint>, String> {
    let RegistryDocument(entries) = match format {
        RegistryFormat::Json => serde_json::from_str::<RegistryDocument>(content)
            .map_err(|e| e.to_string())?,
        RegistryFormat::Yaml => serde_yaml::from_str::<RegistryDocument>(content)
            .map_err(|e| e.to_string())?,
    };

    entries
        .into_iter()
        .map(|(key, entry)| to_endpoint(key, entry))
        .collect()
}

fn to_endpoint(key: String, entry: RegistryEntry) -> std::result::Result<Endpoint, String> {
    if key.trim().is_empty() {
        return Err("registry key must not be empty".to_string());
    }
    let name = entry.name.trim();
    if name.is_empty() {
        return Err(format!("entry '{}' has an empty name", key));
    }
    let base_url = entry.api.trim();
    let parsed =
        Url::parse(base_url).map_err(|e| format!("entry '{}' has an invalid api URL: {}", key, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!(
            "entry '{}' must use http or https, got '{}'",
            key,
            parsed.scheme()
        ));
    }

    debug!(endpoint_key = %key, base_url = %base_url, "Registry entry accepted");
    Ok(Endpoint::new(key, name, base_url))
}
