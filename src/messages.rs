//! User facing text in English and Chinese.

use std::str::FromStr;

use thiserror::Error;

use crate::{DisplayMode, ScalingFactor};

/// Language of the console output
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Zh,
}

/// Errors that occur while parsing a language from a string
#[derive(Error, Debug)]
pub enum ParseLanguageError {
    #[error("Invalid language. Allowed values: `en`, `zh`")]
    InvalidLanguage,
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "zh" | "chinese" | "cn" => Ok(Language::Zh),
            _ => Err(ParseLanguageError::InvalidLanguage),
        }
    }
}

/// Message catalog for one [`Language`]
#[derive(Debug, Copy, Clone)]
pub struct Messages {
    lang: Language,
}

impl Messages {
    pub fn new(lang: Language) -> Self {
        Self { lang }
    }

    fn pick(&self, en: &'static str, zh: &'static str) -> &'static str {
        match self.lang {
            Language::En => en,
            Language::Zh => zh,
        }
    }

    pub fn current_resolution(&self, mode: &DisplayMode) -> String {
        format!("{}{}", self.pick("Current resolution: ", "当前分辨率: "), mode)
    }

    pub fn available_resolutions(&self) -> &'static str {
        self.pick("Available resolutions:", "可用分辨率:")
    }

    pub fn setting_resolution(&self, mode: &DisplayMode) -> String {
        let mut line = format!(
            "{}{}",
            self.pick("Setting resolution to ", "正在设置分辨率为 "),
            mode.resolution
        );
        if mode.refresh_rate.is_specified() {
            line.push_str(&format!("@{}Hz", mode.refresh_rate.0));
        }
        line.push_str("...");
        line
    }

    pub fn resolution_success(&self) -> &'static str {
        self.pick("Resolution set successfully!", "分辨率设置成功！")
    }

    pub fn resolution_failed(&self) -> &'static str {
        self.pick("Failed to set resolution!", "分辨率设置失败！")
    }

    pub fn resolution_unsupported(&self) -> &'static str {
        self.pick(
            "Error: Unsupported resolution. Use -a to see available resolutions.",
            "错误：不支持的分辨率。请使用 -a 参数查看可用分辨率列表。",
        )
    }

    pub fn refresh_rate_unsupported(&self) -> &'static str {
        self.pick(
            "Error: Unsupported resolution and refresh rate combination. Use -a to see available resolutions.",
            "错误：不支持该分辨率和刷新率的组合。请使用 -a 参数查看可用分辨率列表。",
        )
    }

    pub fn invalid_number(&self) -> &'static str {
        self.pick("Error: Invalid numeric argument.", "错误：无效的数字参数。")
    }

    pub fn invalid_resolution_values(&self) -> &'static str {
        self.pick(
            "Error: Resolution and refresh rate must be positive numbers.",
            "错误：分辨率和刷新率必须为正数。",
        )
    }

    pub fn scaling_range(&self) -> &'static str {
        self.pick(
            "Scaling percentage must be between 100% and 500%",
            "缩放比例必须在100%-500%之间",
        )
    }

    pub fn setting_scaling(&self, percentage: i32) -> String {
        format!(
            "{}{}%...",
            self.pick("Setting scaling to ", "正在设置缩放比例为 "),
            percentage
        )
    }

    pub fn scaling_success(&self, scaling: ScalingFactor) -> String {
        match self.lang {
            Language::En => format!(
                "Scaling set to {} successfully! Please log out and log back in for full effect.",
                scaling
            ),
            Language::Zh => format!("缩放比例已设置为 {}！请注销并重新登录以完全生效。", scaling),
        }
    }

    pub fn scaling_failed(&self) -> &'static str {
        self.pick("Failed to set scaling!", "缩放比例设置失败！")
    }

    pub fn invalid_command(&self) -> &'static str {
        self.pick("Invalid command line arguments!", "无效的命令行参数！")
    }

    pub fn force_warning(&self) -> &'static str {
        self.pick(
            "Warning: Force setting resolution, skipping validation...",
            "警告：正在强制设置分辨率，跳过验证...",
        )
    }

    pub fn usage(&self) -> String {
        let lines: &[&str] = match self.lang {
            Language::En => &[
                "Usage:",
                "  ezres -r <width> <height> [refresh]     - Set resolution",
                "  ezres -f -r <width> <height> [refresh]  - Force set resolution (skip validation)",
                "  ezres -s <percentage>                   - Set scaling (100-500)",
                "  ezres -l                                - Show current settings",
                "  ezres -a                                - Show all available resolutions",
                "  ezres -h                                - Show help",
                "",
                "Options:",
                "  --json                                  - Print -l and -a output as JSON",
                "  --lang <en|zh>                          - Output language",
                "",
                "Examples:",
                "  ezres -r 1920 1080                      - Set to 1920x1080",
                "  ezres -r 1920 1080 60                   - Set to 1920x1080@60Hz",
                "  ezres -s 125                            - Set scaling to 125%",
                "  ezres -f -r 1920 1080                   - Force set to 1920x1080",
            ],
            Language::Zh => &[
                "用法:",
                "  ezres -r <宽度> <高度> [刷新率]         - 设置分辨率",
                "  ezres -f -r <宽度> <高度> [刷新率]      - 强制设置分辨率（跳过验证）",
                "  ezres -s <百分比>                       - 设置缩放比例 (100-500)",
                "  ezres -l                                - 显示当前设置",
                "  ezres -a                                - 显示所有可用分辨率",
                "  ezres -h                                - 显示帮助",
                "",
                "选项:",
                "  --json                                  - 以 JSON 格式输出 -l 和 -a 的结果",
                "  --lang <en|zh>                          - 输出语言",
                "",
                "示例:",
                "  ezres -r 1920 1080                      - 设置为1920x1080",
                "  ezres -r 1920 1080 60                   - 设置为1920x1080@60Hz",
                "  ezres -s 125                            - 设置缩放为125%",
                "  ezres -f -r 1920 1080                   - 强制设置为1920x1080",
            ],
        };
        lines.join("\n")
    }
}
