//! Factory for commands in the devtools `Timeline` domain.

use crate::devtools::command::Command;

const DOMAIN: &str = "Timeline";

fn command(method: &str) -> Command {
    Command::new(format!("{DOMAIN}.{method}"))
}

/// Starts timeline capture. Optional parameter: `maxCallStackDepth`.
pub fn start() -> Command {
    command("start")
}

pub fn stop() -> Command {
    command("stop")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(start().method(), "Timeline.start");
        assert_eq!(stop().method(), "Timeline.stop");
    }
}
