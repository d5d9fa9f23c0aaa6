//! The seam between the display logic and the operating system.

use crate::{DisplayMode, DisplayResult, RefreshRate, Resolution};

/// A mutable copy of the active display configuration.
///
/// Only the fields touched through the setters are submitted back, everything
/// else keeps the value it had when the configuration was read.
pub trait ModeConfig {
    fn mode(&self) -> DisplayMode;
    fn set_resolution(&mut self, resolution: Resolution);
    fn set_refresh_rate(&mut self, refresh_rate: RefreshRate);
}

impl ModeConfig for DisplayMode {
    fn mode(&self) -> DisplayMode {
        *self
    }

    fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    fn set_refresh_rate(&mut self, refresh_rate: RefreshRate) {
        self.refresh_rate = refresh_rate;
    }
}

/// Access to the primary display adapter and the user's display preferences.
pub trait DisplayBackend {
    type Config: ModeConfig;

    /// Mode number `index` as reported by the driver, `None` past the last one.
    ///
    /// Backends that cannot query the adapter at all also return `None`.
    fn mode_at(&self, index: u32) -> Option<DisplayMode>;

    /// Reads the configuration currently in effect.
    fn active_config(&self) -> DisplayResult<Self::Config>;

    /// Makes `config` the active configuration and stores it as the new
    /// default, so it survives logout and reboot.
    fn submit_config(&self, config: &mut Self::Config) -> DisplayResult;

    /// Writes the desktop DPI into the user's display preferences.
    fn store_dpi(&self, dpi: u32) -> DisplayResult;

    /// Tells every top-level window that display settings changed.
    fn broadcast_settings_change(&self) -> DisplayResult;

    /// Whether the user interface language is Chinese.
    fn prefers_chinese(&self) -> bool {
        false
    }
}
