use serde_json::Value;

/// Pull the file paths out of a drop notification payload.
///
/// Accepts either a bare array of strings or an object with a `paths`
/// array. In the object form non-string entries are skipped; any other
/// shape yields no paths.
pub fn extract_paths(payload: &Value) -> Vec<String> {
    if let Value::Array(items) = payload {
        if items.iter().all(Value::is_string) {
            return strings(items);
        }
    }
    match payload.get("paths") {
        Some(Value::Array(items)) => strings(items),
        _ => Vec::new(),
    }
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_of_strings_is_returned_unchanged() {
        let payload = json!(["/b", "/a", "/c d.txt", "/a"]);
        assert_eq!(extract_paths(&payload), vec!["/b", "/a", "/c d.txt", "/a"]);
        assert!(extract_paths(&json!([])).is_empty());
    }

    #[test]
    fn paths_field_keeps_only_strings_in_order() {
        let payload = json!({ "paths": ["/x", 1, null, "/y", {"p": "/z"}, ["/w"], "/v"], "position": {"x": 3} });
        assert_eq!(extract_paths(&payload), vec!["/x", "/y", "/v"]);
    }

    #[test]
    fn mixed_top_level_array_yields_nothing() {
        assert!(extract_paths(&json!(["/a", 2])).is_empty());
    }

    #[test]
    fn other_shapes_yield_nothing() {
        for payload in [
            json!(null),
            json!(42),
            json!(true),
            json!("/single/path"),
            json!({}),
            json!({ "files": ["/a"] }),
            json!({ "paths": "/a" }),
            json!({ "paths": null }),
        ] {
            assert!(extract_paths(&payload).is_empty(), "payload {payload}");
        }
    }
}
