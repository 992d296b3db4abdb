//! Tools offered to the model.

mod tool;
mod weather;

pub use tool::ParamType;
pub use tool::ToolSpec;
pub use tool::ToolParam;
pub use tool::ToolChoice;
pub use tool::Tool;
pub use weather::WeatherTool;
pub use weather::WEATHER_TOOL;
