use serde_json::Value;

/// Folds partial operation objects into one, in order.
pub fn merge_operations<'a, I>(parts: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut root = Value::Object(Default::default());
    for part in parts {
        deep_merge(&mut root, part.clone());
    }
    root
}

/// Recursive deep merge that never replaces what is already there.
/// - Maps: Merged recursively.
/// - Arrays: Appended.
/// - Scalars (and mismatched kinds): The target (left-hand side) wins.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(t_map), Value::Object(s_map)) => {
            for (key, s_val) in s_map {
                match t_map.get_mut(&key) {
                    Some(t_val) => deep_merge(t_val, s_val),
                    None => {
                        t_map.insert(key, s_val);
                    }
                }
            }
        }
        (Value::Array(t_seq), Value::Array(s_seq)) => {
            t_seq.extend(s_seq);
        }
        (t, s) => {
            if *t != s {
                log::warn!("Merge conflict: keeping {} over later {}", t, s);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_responses_coexist() {
        let ok = json!({ "responses": { "200": { "description": "OK" } } });
        let bad = json!({ "responses": { "400": { "description": "Bad Request" } } });

        let merged = merge_operations([&ok, &bad]);
        assert_eq!(merged["responses"]["200"]["description"], "OK");
        assert_eq!(merged["responses"]["400"]["description"], "Bad Request");
    }

    #[test]
    fn test_arrays_append_in_order() {
        let a = json!({ "security": [{ "bearer": [] }] });
        let b = json!({ "security": [{ "cookie": [] }] });

        let merged = merge_operations([&a, &b]);
        assert_eq!(merged["security"], json!([{ "bearer": [] }, { "cookie": [] }]));
    }

    #[test]
    fn test_earlier_scalar_wins() {
        let a = json!({ "summary": "first" });
        let b = json!({ "summary": "second", "deprecated": true });

        let merged = merge_operations([&a, &b]);
        assert_eq!(merged["summary"], "first");
        assert_eq!(merged["deprecated"], true);
    }

    #[test]
    fn test_empty_input() {
        let merged = merge_operations(std::iter::empty::<&Value>());
        assert_eq!(merged, json!({}));
    }
}
