use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for the display module
#[derive(Error, Debug)]
pub enum DisplayError {
    #[cfg(windows)]
    #[error("Error when calling the Windows API")]
    WinApi(#[from] winsafe::co::ERROR),
    #[error("Apply failed, returned status: {0}")]
    ApplyFailed(String),
    #[error("Could not read the active display mode")]
    NoActiveMode,
    #[error("Scaling percentage {0}% is outside of 100%..=500%")]
    ScalingOutOfRange(i32),
    #[error("Changing display settings is not supported on this platform")]
    UnsupportedPlatform,
}

pub type DisplayResult<T = ()> = std::result::Result<T, DisplayError>;

/// Contains the resolution of a display
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Creates a new resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Refresh rate in Hz. Zero stands for "unspecified", letting the driver pick.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshRate(pub u32);

impl RefreshRate {
    pub const UNSPECIFIED: RefreshRate = RefreshRate(0);

    pub fn is_specified(self) -> bool {
        self.0 > 0
    }
}

/// A mode a display adapter can render at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayMode {
    #[serde(flatten)]
    pub resolution: Resolution,
    pub refresh_rate: RefreshRate,
}

impl DisplayMode {
    pub fn new(width: u32, height: u32, refresh_rate: u32) -> Self {
        Self {
            resolution: Resolution::new(width, height),
            refresh_rate: RefreshRate(refresh_rate),
        }
    }

    /// Whether `offered` satisfies this mode when used as a request.
    ///
    /// Width and height must be equal. The refresh rate is only compared when
    /// this request specifies one.
    pub fn accepts(&self, offered: &DisplayMode) -> bool {
        self.resolution == offered.resolution
            && (!self.refresh_rate.is_specified() || self.refresh_rate == offered.refresh_rate)
    }

    /// Parses `<width> <height> [refresh]` command line values.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ParseModeError> {
        let mut values = args.iter().map(|arg| arg.as_ref().trim().parse::<i64>());
        let width = values.next().ok_or(ParseModeError::Missing)??;
        let height = values.next().ok_or(ParseModeError::Missing)??;
        let refresh_rate = values.next().transpose()?.unwrap_or(0);

        if width <= 0 || height <= 0 || refresh_rate < 0 {
            return Err(ParseModeError::NotPositive);
        }

        let narrow = |value: i64| u32::try_from(value).map_err(|_| ParseModeError::OutOfRange(value));
        Ok(Self::new(narrow(width)?, narrow(height)?, narrow(refresh_rate)?))
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolution)?;
        if self.refresh_rate.is_specified() {
            write!(f, " @{}Hz", self.refresh_rate.0)?;
        }
        Ok(())
    }
}

/// Errors that occur while parsing a display mode from command line values
#[derive(Error, Debug)]
pub enum ParseModeError {
    #[error("Error parsing integer")]
    IntError(#[from] std::num::ParseIntError),
    #[error("Width and height are required")]
    Missing,
    #[error("Resolution and refresh rate must be positive numbers")]
    NotPositive,
    #[error("Value {0} is too large")]
    OutOfRange(i64),
}

/// Desktop DPI scaling as a percentage of the 96 DPI baseline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScalingFactor(u32);

impl ScalingFactor {
    pub const MIN: i32 = 100;
    pub const MAX: i32 = 500;
    pub const BASELINE_DPI: u32 = 96;

    pub fn new(percentage: i32) -> DisplayResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&percentage) {
            return Err(DisplayError::ScalingOutOfRange(percentage));
        }
        Ok(Self(percentage as u32))
    }

    pub fn percentage(self) -> u32 {
        self.0
    }

    /// DPI value stored for this factor, rounded down.
    pub fn dpi(self) -> u32 {
        Self::BASELINE_DPI * self.0 / 100
    }
}

impl fmt::Display for ScalingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Result of checking a requested mode against the mode catalog
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Valid,
    ResolutionUnsupported,
    RefreshRateUnsupported,
}

impl ValidationOutcome {
    pub fn is_valid(self) -> bool {
        self == ValidationOutcome::Valid
    }
}
