use log::debug;
use winsafe::prelude::*;
use winsafe::{co, msg, GmidxEnum, RegistryValue, DEVMODE, HKEY, HWND};

use super::{enum_found, is_chinese};
use crate::{DisplayBackend, DisplayError, DisplayMode, DisplayResult, ModeConfig, RefreshRate, Resolution};

const DESKTOP_KEY: &str = "Control Panel\\Desktop";
const LOG_PIXELS: &str = "LogPixels";
/// `SPI_SETLOGICALDPIOVERRIDE`, not exposed by winsafe
const SPI_SETLOGICALDPIOVERRIDE: usize = 0x009F;

/// Talks to the primary display through `winuser.h` and to the current user's
/// registry hive for the desktop DPI.
#[derive(Debug, Default)]
pub struct SystemBackend;

impl SystemBackend {
    pub fn new() -> Self {
        Self
    }
}

/// The active `DEVMODE` of the primary display
pub struct ActiveMode(DEVMODE);

impl ModeConfig for ActiveMode {
    fn mode(&self) -> DisplayMode {
        DisplayMode::new(self.0.dmPelsWidth, self.0.dmPelsHeight, self.0.dmDisplayFrequency)
    }

    // Resets the field mask, so only resolution and refresh rate get submitted.
    fn set_resolution(&mut self, resolution: Resolution) {
        self.0.dmPelsWidth = resolution.width;
        self.0.dmPelsHeight = resolution.height;
        self.0.dmFields = co::DM::PELSWIDTH | co::DM::PELSHEIGHT;
    }

    fn set_refresh_rate(&mut self, refresh_rate: RefreshRate) {
        self.0.dmDisplayFrequency = refresh_rate.0;
        self.0.dmFields |= co::DM::DISPLAYFREQUENCY;
    }
}

impl DisplayBackend for SystemBackend {
    type Config = ActiveMode;

    fn mode_at(&self, index: u32) -> Option<DisplayMode> {
        let mut devmode = DEVMODE::default();
        let found = winsafe::EnumDisplaySettings(None, GmidxEnum::Gmidx(index), &mut devmode);
        if enum_found(found) {
            Some(ActiveMode(devmode).mode())
        } else {
            None
        }
    }

    fn active_config(&self) -> DisplayResult<ActiveMode> {
        let mut devmode = DEVMODE::default();
        let found = winsafe::EnumDisplaySettings(
            None,
            GmidxEnum::Enum(co::ENUM_SETTINGS::CURRENT),
            &mut devmode,
        );
        if !enum_found(found) {
            return Err(DisplayError::NoActiveMode);
        }
        Ok(ActiveMode(devmode))
    }

    fn submit_config(&self, config: &mut ActiveMode) -> DisplayResult {
        // "restart required" is reported as Ok, but the mode is not active yet
        match winsafe::ChangeDisplaySettingsEx(None, Some(&mut config.0), co::CDS::UPDATEREGISTRY) {
            Ok(status) if status == co::DISP_CHANGE::SUCCESSFUL => Ok(()),
            Ok(status) | Err(status) => Err(DisplayError::ApplyFailed(status.to_string())),
        }
    }

    fn store_dpi(&self, dpi: u32) -> DisplayResult {
        // the guard closes the key on every path
        let key = HKEY::CURRENT_USER.RegOpenKeyEx(
            Some(DESKTOP_KEY),
            co::REG_OPTION::default(),
            co::KEY::SET_VALUE,
        )?;
        key.RegSetValueEx(Some(LOG_PIXELS), RegistryValue::Dword(dpi))?;
        debug!("wrote {}\\{} = {}", DESKTOP_KEY, LOG_PIXELS, dpi);
        Ok(())
    }

    fn broadcast_settings_change(&self) -> DisplayResult {
        HWND::BROADCAST.SendMessage(msg::WndMsg::new(
            co::WM::SETTINGCHANGE,
            SPI_SETLOGICALDPIOVERRIDE,
            0,
        ));
        Ok(())
    }

    fn prefers_chinese(&self) -> bool {
        // SAFETY: takes no arguments and only reads the user's settings
        let langid = unsafe { windows_sys::Win32::Globalization::GetUserDefaultUILanguage() };
        is_chinese(langid)
    }
}
