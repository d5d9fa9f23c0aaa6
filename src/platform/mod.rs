//! The [`DisplayBackend`](crate::DisplayBackend) of the running operating system.

#[cfg(windows)]
#[path = "windows.rs"]
mod imp;

#[cfg(not(windows))]
#[path = "unsupported.rs"]
mod imp;

pub use imp::SystemBackend;

/// Primary language id of Chinese in a Win32 `LANGID`
#[cfg_attr(not(windows), allow(dead_code))]
const LANG_CHINESE: u16 = 0x04;

/// `EnumDisplaySettings` reports the end of the mode list as `Ok(false)`, not
/// as an error.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn enum_found<E>(result: Result<bool, E>) -> bool {
    matches!(result, Ok(true))
}

/// Whether a Win32 `LANGID` names any Chinese locale.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn is_chinese(langid: u16) -> bool {
    langid & 0x3ff == LANG_CHINESE
}
