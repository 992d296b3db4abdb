use crate::error::Error;
use crate::llm::ToolParam as InputParam;
use super::{ParamType, Tool, ToolParam, ToolSpec};

/// Name of the probe tool.
pub const WEATHER_TOOL: &str = "get_weather";

/// Dummy weather lookup the probes ask the model to call.
pub struct WeatherTool {}

impl WeatherTool {

    /// Create an instance.
    pub fn new() -> Self {
        WeatherTool {}
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for WeatherTool {

    fn get_tool_spec(&self) -> ToolSpec {
        ToolSpec {
            name: WEATHER_TOOL.to_owned(),
            description: "Get the current weather in a given location".to_owned(),
            params: vec![
                ToolParam {
                    name: "location".to_string(),
                    description: "The city and state, e.g. San Francisco, CA".to_string(),
                    data_type: ParamType::String,
                    required: true,
                    allowed: vec![],
                },
                ToolParam {
                    name: "unit".to_string(),
                    description: "The unit of temperature".to_string(),
                    data_type: ParamType::String,
                    required: false,
                    allowed: vec!["celsius".to_string(), "fahrenheit".to_string()],
                },
            ]
        }
    }

    fn call_tool(&self, params: &[InputParam]) -> Result<String, Error> {
        let mut location = None;
        let mut unit = "celsius";

        for param in params {
            match param.name.as_str() {
                "location" => location = param.value.as_str(),
                "unit" => if let Some(u) = param.value.as_str() {
                    unit = u;
                },
                _ => return Ok(format!("unknown parameter \"{}\", expect \"location\" and optional \"unit\".", param.name)),
            }
        }

        if let Some(location) = location {
            Ok(format!("The weather in {location} is sunny with a temperature of 22 degrees {unit}"))
        } else {
            Ok("missing parameter, expect \"location\" of type string.".to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use super::*;

    #[test]
    fn test_weather_tool_call() {
        let tool = WeatherTool::new();

        let params = vec![
            InputParam { name: "location".into(), value: Value::String("Paris".into()) },
            InputParam { name: "unit".into(), value: Value::String("fahrenheit".into()) },
        ];
        let result = tool.call_tool(&params).expect("tool result");
        assert_eq!(result, "The weather in Paris is sunny with a temperature of 22 degrees fahrenheit");

        let params = vec![
            InputParam { name: "location".into(), value: Value::String("Oslo".into()) },
        ];
        assert!(tool.call_tool(&params).unwrap().ends_with("22 degrees celsius"));

        let result = tool.call_tool(&[]).unwrap();
        assert!(result.starts_with("missing parameter"));

        let params = vec![
            InputParam { name: "city".into(), value: Value::String("Oslo".into()) },
        ];
        assert!(tool.call_tool(&params).unwrap().starts_with("unknown parameter"));
    }

    #[test]
    fn test_weather_tool_spec() {
        let spec = WeatherTool::new().get_tool_spec();
        assert_eq!(spec.name, WEATHER_TOOL);
        assert_eq!(spec.params.len(), 2);
        assert!(spec.params[0].required);
        assert_eq!(spec.params[1].allowed, vec!["celsius", "fahrenheit"]);
    }
}
