use crate::{DisplayBackend, DisplayError, DisplayMode, DisplayResult};

/// Stand-in for systems without a supported display API. It knows no modes and
/// refuses every change.
#[derive(Debug, Default)]
pub struct SystemBackend;

impl SystemBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DisplayBackend for SystemBackend {
    type Config = DisplayMode;

    fn mode_at(&self, _index: u32) -> Option<DisplayMode> {
        None
    }

    fn active_config(&self) -> DisplayResult<DisplayMode> {
        Err(DisplayError::UnsupportedPlatform)
    }

    fn submit_config(&self, _config: &mut DisplayMode) -> DisplayResult {
        Err(DisplayError::UnsupportedPlatform)
    }

    fn store_dpi(&self, _dpi: u32) -> DisplayResult {
        Err(DisplayError::UnsupportedPlatform)
    }

    fn broadcast_settings_change(&self) -> DisplayResult {
        Err(DisplayError::UnsupportedPlatform)
    }

    fn prefers_chinese(&self) -> bool {
        std::env::var("LANG")
            .map(|lang| lang.to_lowercase().starts_with("zh"))
            .unwrap_or(false)
    }
}
