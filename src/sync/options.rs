use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PanelOptions {
    /// Upper bound on points kept per channel.
    #[serde(default = "default_max_data_points")]
    pub max_data_points: usize,
    #[serde(default = "default_auto_zoom")]
    pub auto_zoom: bool,
    #[serde(default = "default_line_color")]
    pub line_color: String,
    #[serde(default = "default_point_color")]
    pub point_color: String,
    /// Skip hover recomputation when the query timestamp repeats.
    #[serde(default)]
    pub dedupe_hover: bool,
    #[serde(default)]
    pub redraw_delay_ms: u64,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            max_data_points: default_max_data_points(),
            auto_zoom: default_auto_zoom(),
            line_color: default_line_color(),
            point_color: default_point_color(),
            dedupe_hover: false,
            redraw_delay_ms: 0,
        }
    }
}

impl PanelOptions {
    pub fn redraw_delay(&self) -> Duration {
        Duration::from_millis(self.redraw_delay_ms)
    }
}

fn default_max_data_points() -> usize {
    500
}

fn default_auto_zoom() -> bool {
    true
}

fn default_line_color() -> String {
    "red".to_string()
}

fn default_point_color() -> String {
    "royalblue".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let options: PanelOptions = serde_yaml::from_str("auto_zoom: false").unwrap();
        assert!(!options.auto_zoom);
        assert_eq!(options.max_data_points, 500);
        assert_eq!(options.line_color, "red");
        assert_eq!(options.point_color, "royalblue");
        assert!(!options.dedupe_hover);
    }
}
