//! Fixed manifest schema.

use std::sync::LazyLock;

use jsonschema::Validator;
use serde_json::{Value, json};

static VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    jsonschema::validator_for(&schema()).expect("built-in manifest schema is valid")
});

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "version"],
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "version": { "type": "string", "pattern": "^[0-9]+\\.[0-9]+\\.[0-9]+" },
            "description": { "type": "string" },
            "author": { "type": "string" },
            "ui": { "type": "string", "minLength": 1 },
            "dependencies": string_list(),
            "permissions": string_list(),
            "shared": string_list(),
            "exports": {
                "type": "object",
                "properties": {
                    "client": string_list(),
                    "server": string_list()
                }
            }
        }
    })
}

/// Every schema violation in `instance`, one message each.
pub(super) fn violations(instance: &Value) -> Vec<String> {
    VALIDATOR
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_compiles() {
        assert!(jsonschema::validator_for(&schema()).is_ok());
    }

    #[test]
    fn test_valid_instance_has_no_violations() {
        assert!(violations(&json!({"name": "foo", "version": "1.0.0"})).is_empty());
    }

    #[test]
    fn test_each_missing_required_field_counts() {
        assert_eq!(violations(&json!({})).len(), 2);
    }

    #[test]
    fn test_non_object_root() {
        assert_eq!(violations(&json!([1, 2])).len(), 1);
    }
}
