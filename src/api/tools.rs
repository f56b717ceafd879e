use std::sync::LazyLock;

use serde_json::{json, Value};

use crate::errors::SmugglerError;
use crate::scanner::tool::{SMUGGLER_ARGS_HELP, TOOL_DESCRIPTION, TOOL_NAME};

pub static SMUGGLER_INPUT_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "url": {
                "type": "string",
                "format": "uri",
                "description": "Target URL to detect HTTP Request Smuggling"
            },
            "smuggler_args": {
                "type": "array",
                "items": { "type": "string" },
                "description": SMUGGLER_ARGS_HELP
            }
        },
        "required": ["url"]
    })
});

/// Entry advertised by `tools/list`.
pub fn smuggler_descriptor() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "inputSchema": SMUGGLER_INPUT_SCHEMA.clone(),
    })
}

/// Check tool arguments against the advertised input schema.
pub fn validate_arguments(arguments: &Value) -> Result<(), SmugglerError> {
    let compiled = jsonschema::JSONSchema::compile(&SMUGGLER_INPUT_SCHEMA)
        .map_err(|e| SmugglerError::Internal(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(arguments) {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        return Err(SmugglerError::InvalidArguments(messages.join("; ")));
    }

    Ok(())
}
