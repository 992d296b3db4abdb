use serde_json::{json, Number, Value};
use crate::{error::Error, tools::ToolParam};
use super::Role;

/// Get the wire role name.
pub fn role_to_llm(role: Role) -> &'static str {
    const ROLES: [&str; 3] = ["system", "assistant", "user"];
    ROLES[role as usize]
}

/// Get logical role by model role.
pub fn llm_to_role(role: &str) -> Result<Role, Error> {
    match role {
        "system" => Ok(Role::System),
        "model" | "assistant" => Ok(Role::Model),
        "user" => Ok(Role::User),
        _ => Err(Error::LLMResponseError("LLM returned message with an unknown role."))
    }
}

/// Interpret value as str
#[macro_export(local_inner_macros)]
macro_rules! val_as_str {
    ($val:expr, $element:literal) => {
        $val
            .as_str()
            .ok_or(Error::LLMResponseError(std::concat!("can't extract ", $element, " from LLM API response.")))?
    }
}

pub fn set_i64_param(payload: &mut Value, key: &str, val: &Option<i64>) {
    if let Some(v) = val {
        payload[key] = Value::Number(Number::from(*v));
    }
}

pub fn set_f64_param(payload: &mut Value, key: &str, val: &Option<f64>) {
    if let Some(num) = val.and_then(Number::from_f64) {
        payload[key] = Value::Number(num);
    }
}

/// Merge the top-level keys of `extra` into `payload`.
pub fn merge_object(payload: &mut Value, extra: &Value) {
    if let (Some(target), Some(source)) = (payload.as_object_mut(), extra.as_object()) {
        for (k, v) in source {
            target.insert(k.clone(), v.clone());
        }
    }
}

pub fn tool_params_to_value(params: &[ToolParam]) -> Value {
    let mut required = Vec::with_capacity(params.len());

    let mut result = json!({
        "type": "object",
        "properties": {},
    });

    for param in params {
        let mut property = json!({
            "type": param.data_type,
            "description": param.description,
        });
        if !param.allowed.is_empty() {
            property["enum"] = json!(param.allowed);
        }
        result["properties"][&param.name] = property;

        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    result["required"] = Value::Array(required);

    result
}
