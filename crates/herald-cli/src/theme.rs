//! CLI theme and styling.

use colored::Colorize;
use herald_policy::{ActionState, PrimaryAction};

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Format a key-value pair.
    pub(crate) fn kv(key: &str, value: &str) -> String {
        format!("{}: {}", key.bold(), value)
    }

    /// Format an action state.
    pub(crate) fn action_state(state: &ActionState) -> String {
        match state {
            ActionState::Enabled => "enabled".green().to_string(),
            ActionState::Disabled { denial } => {
                format!("{} {}", "disabled".yellow(), format!("({denial})").dimmed())
            },
            ActionState::Hidden { denial } => format!("hidden ({denial})").dimmed().to_string(),
        }
    }

    /// Format the primary link of a row.
    pub(crate) fn primary(action: PrimaryAction) -> String {
        match action {
            PrimaryAction::Edit => "edit".cyan().to_string(),
            PrimaryAction::View => "view".blue().to_string(),
            PrimaryAction::None => "-".dimmed().to_string(),
        }
    }

    /// Format a yes/no capability flag.
    pub(crate) fn flag(enabled: bool) -> String {
        if enabled {
            "yes".green().to_string()
        } else {
            "no".dimmed().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_policy::Denial;

    #[test]
    fn test_action_state_text() {
        colored::control::set_override(false);
        assert_eq!(Theme::action_state(&ActionState::Enabled), "enabled");
        assert_eq!(
            Theme::action_state(&ActionState::disabled(Denial::Provisioned)),
            "disabled (contact point is provisioned)"
        );
        assert_eq!(
            Theme::action_state(&ActionState::hidden(Denial::Unsupported)),
            "hidden (not supported by this alertmanager)"
        );
    }

    #[test]
    fn test_primary_and_flag() {
        colored::control::set_override(false);
        assert_eq!(Theme::primary(PrimaryAction::Edit), "edit");
        assert_eq!(Theme::primary(PrimaryAction::None), "-");
        assert_eq!(Theme::flag(true), "yes");
        assert_eq!(Theme::flag(false), "no");
    }
}
