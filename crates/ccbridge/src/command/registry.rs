//! Commands registered with the chat host.
//!
//! The host splits `/name args` at the first whitespace and only accepts
//! ASCII command names. Typing a marker straight after the primary command
//! (`/cc最近`) therefore names an unknown command and never reaches us, so
//! each marker also gets its own ASCII sub-command that injects the marker
//! in front of the user's arguments.

use ccbridge_plugin_protocol::CommandRegistration;

use super::intent::{CURRENT_MARKER, NEW_MARKER, RECENT_MARKER, RESUME_MARKER};

/// Name of the primary command.
pub const PRIMARY_COMMAND: &str = "cc";

/// One registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Marker placed in front of the arguments before resolution.
    pub inject: Option<&'static str>,
}

impl CommandSpec {
    /// Argument text handed to the resolver for this command.
    pub fn effective_args(&self, args: &str) -> String {
        match self.inject {
            Some(marker) => format!("{marker} {args}").trim().to_string(),
            None => args.to_string(),
        }
    }

    pub fn registration(&self) -> CommandRegistration {
        CommandRegistration {
            name: self.name.to_string(),
            description: self.description.to_string(),
            accepts_args: true,
            require_auth: true,
        }
    }
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: PRIMARY_COMMAND,
        description: "Remote-control Claude Code through the task API",
        inject: None,
    },
    CommandSpec {
        name: "cc-recent",
        description: "List recent CC sessions",
        inject: Some(RECENT_MARKER),
    },
    CommandSpec {
        name: "cc-now",
        description: "Show the current CC session",
        inject: Some(CURRENT_MARKER),
    },
    CommandSpec {
        name: "cc-new",
        description: "Reset the CC session (optionally with a prompt)",
        inject: Some(NEW_MARKER),
    },
    CommandSpec {
        name: "cc-resume",
        description: "Continue a specific CC session",
        inject: Some(RESUME_MARKER),
    },
];

/// Lookup table over the registered commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRegistry;

impl CommandRegistry {
    /// Find a command by exact name.
    pub fn get(&self, name: &str) -> Option<&'static CommandSpec> {
        COMMANDS.iter().find(|spec| spec.name == name)
    }

    /// Resolver input for `name args`, or None if `name` is not registered.
    pub fn route(&self, name: &str, args: &str) -> Option<String> {
        self.get(name).map(|spec| spec.effective_args(args))
    }

    /// Route slash text the way the host does: split at the first whitespace.
    pub fn route_slash(&self, text: &str) -> Option<String> {
        let (name, args) = split_slash(text)?;
        self.route(name, args)
    }

    pub fn registrations(&self) -> Vec<CommandRegistration> {
        COMMANDS.iter().map(CommandSpec::registration).collect()
    }
}

/// Split `/name rest` into `("name", "rest")`.
pub fn split_slash(text: &str) -> Option<(&str, &str)> {
    let body = text.trim().strip_prefix('/')?;
    match body.find(char::is_whitespace) {
        Some(idx) => Some((&body[..idx], body[idx..].trim_start())),
        None => Some((body, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_command_passes_args_through() {
        let registry = CommandRegistry;
        assert_eq!(registry.route("cc", "hello"), Some("hello".to_string()));
        assert_eq!(registry.route("cc", ""), Some(String::new()));
    }

    #[test]
    fn subcommands_inject_markers() {
        let registry = CommandRegistry;
        assert_eq!(registry.route("cc-recent", ""), Some("最近".to_string()));
        assert_eq!(registry.route("cc-now", ""), Some("当前".to_string()));
        assert_eq!(
            registry.route("cc-new", "fix it"),
            Some("新会话 fix it".to_string())
        );
        assert_eq!(
            registry.route("cc-resume", "abcdef01 go"),
            Some("接续 abcdef01 go".to_string())
        );
    }

    #[test]
    fn unknown_command_is_not_routed() {
        assert_eq!(CommandRegistry.route("cc-delete", "x"), None);
    }

    #[test]
    fn split_slash_at_first_whitespace() {
        assert_eq!(split_slash("/cc-new hello world"), Some(("cc-new", "hello world")));
        assert_eq!(split_slash("  /cc  "), Some(("cc", "")));
        assert_eq!(split_slash("hello"), None);
    }

    #[test]
    fn marker_glued_to_primary_command_is_unknown() {
        assert_eq!(split_slash("/cc最近"), Some(("cc最近", "")));
        assert_eq!(CommandRegistry.route_slash("/cc最近"), None);
        assert_eq!(CommandRegistry.route_slash("/cc 最近"), Some("最近".to_string()));
    }

    #[test]
    fn registrations_are_ascii_and_require_auth() {
        let registrations = CommandRegistry.registrations();
        assert_eq!(registrations.len(), 5);
        assert_eq!(registrations[0].name, "cc");
        for r in &registrations {
            assert!(r.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
            assert!(r.accepts_args);
            assert!(r.require_auth);
        }
    }
}
