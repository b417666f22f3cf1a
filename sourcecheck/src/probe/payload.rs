//! 応答ペイロードの簡易判定
//!
//! 2xx応答のJSONから一覧形式のフィールドを探し、件数を数える。
//! 内容の妥当性までは検証しない。

use serde_json::Value;

/// 一覧として扱うトップレベルのフィールド名（優先順）
pub const LIST_FIELDS: [&str; 5] = ["list", "data", "items", "results", "videos"];

/// 一覧フィールドの件数を返す
///
/// - ボディ自体が配列ならその長さ
/// - オブジェクトなら`LIST_FIELDS`の順に最初に見つかった配列フィールドの長さ
/// - どちらでもなければ`None`
pub fn extract_item_count(body: &Value) -> Option<usize> {
    match body {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => LIST_FIELDS
            .iter()
            .find_map(|field| map.get(*field).and_then(Value::as_array))
            .map(Vec::len),
        _ => None,
    }
}
