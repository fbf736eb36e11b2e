/// Conventions shared by the day pipeline and its input records.
pub struct PipelineSettings {
    /// Device id reserved for the synthetic mass-start punch.
    pub mass_start_device_id: i32,
    /// Event-definition rows with this name suffix merge into the matching
    /// course's best-segment descriptor instead of creating a new event.
    pub best_segment_suffix: &'static str,
    /// Wall-clock punch timestamp format (single day, no date part).
    pub time_format: &'static str,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            mass_start_device_id: -1,
            best_segment_suffix: " best-segment",
            time_format: "%H:%M:%S",
        }
    }
}

pub struct AppConfig {
    pub pipeline: PipelineSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            pipeline: PipelineSettings::default(),
        }
    }
}
