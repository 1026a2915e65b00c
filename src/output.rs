//! # Output Configuration
//!
//! Terminal presentation policy for the CLI: whether colours and emoji are
//! used, and small helpers that render catalog state consistently across
//! commands.
//!
//! The following flags and environment variables are respected:
//! - `--color=never|always|auto`
//! - `NO_COLOR` disables colours when set (https://no-color.org/)
//! - `CLICOLOR=0` disables colours
//! - `CLICOLOR_FORCE=1` forces colours even when stdout is not a TTY
//! - `TERM=dumb` disables colours
//!
//! ```rust,ignore
//! use component_catalog::output::{OutputConfig, emoji};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Resolving...", emoji(&config, "🔗", "[DEPS]"));
//! ```

use std::env;

use console::Style;

use crate::manifest::Component;

/// Output configuration for controlling colours and emoji.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Build from the `--color` flag value ("always", "never" or "auto").
    ///
    /// In auto mode colours are off when `NO_COLOR` is set, `CLICOLOR=0`,
    /// `TERM=dumb`, or stdout is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Apply `style` when colours are enabled.
    pub fn paint(&self, style: &Style, text: &str) -> String {
        if self.use_color {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// The emoji when colours are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Selection box for a component: `[x]` checked, `[ ]` unchecked, `[#]`
/// required (always checked, cannot be changed).
pub fn checkbox(component: &Component) -> &'static str {
    if component.info.required {
        "[#]"
    } else if component.checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Short trailing status tags for a component line.
pub fn status_tags(config: &OutputConfig, component: &Component) -> String {
    let mut tags = Vec::new();
    if component.installed {
        tags.push(config.paint(&Style::new().green(), "installed"));
        if !component.checked {
            tags.push(config.paint(&Style::new().red(), "remove"));
        }
    } else if component.checked {
        tags.push(config.paint(&Style::new().cyan(), "download"));
    }

    if tags.is_empty() {
        String::new()
    } else {
        format!(" ({})", tags.join(", "))
    }
}
