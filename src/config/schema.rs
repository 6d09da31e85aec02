use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "backend": {
                "type": "object",
                "properties": {
                    "url": { "type": "string", "format": "uri" },
                    "timeout_secs": { "type": "integer", "minimum": 1, "maximum": 600 },
                    "auth_token": { "type": "string" },
                    "retry_attempts": { "type": "integer", "minimum": 1, "maximum": 10 },
                    "retry_base_delay_ms": { "type": "integer", "minimum": 0 }
                },
                "additionalProperties": false
            },
            "simulation": {
                "type": "object",
                "properties": {
                    "tick_ms": { "type": "integer", "minimum": 1 },
                    "stagger_ms": { "type": "integer", "minimum": 0 },
                    "startup_delay_ms": { "type": "integer", "minimum": 0 },
                    "min_duration_ms": { "type": "integer", "minimum": 1 },
                    "max_duration_ms": { "type": "integer", "minimum": 1 },
                    "jitter": { "type": "number", "minimum": 0, "maximum": 100 }
                },
                "additionalProperties": false
            },
            "polling": {
                "type": "object",
                "properties": {
                    "interval_ms": { "type": "integer", "minimum": 1 },
                    "activity_interval_ms": { "type": "integer", "minimum": 1 }
                },
                "additionalProperties": false
            },
            "history": {
                "type": "object",
                "properties": {
                    "database": { "type": "string" },
                    "max_jobs": { "type": "integer", "minimum": 1 },
                    "max_exports": { "type": "integer", "minimum": 1 }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
});
