//! Factory for commands in the devtools `Console` domain.

use crate::devtools::command::Command;

const DOMAIN: &str = "Console";

fn command(method: &str) -> Command {
    Command::new(format!("{DOMAIN}.{method}"))
}

pub fn enable() -> Command {
    command("enable")
}

pub fn disable() -> Command {
    command("disable")
}

pub fn clear_messages() -> Command {
    command("clearMessages")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(enable().method(), "Console.enable");
        assert_eq!(clear_messages().method(), "Console.clearMessages");
    }
}
