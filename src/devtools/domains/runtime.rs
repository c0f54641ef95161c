//! Factory for commands in the devtools `Runtime` domain.

use crate::devtools::command::{Command, DevtoolsObject};

const DOMAIN: &str = "Runtime";

fn command(method: &str) -> Command {
    Command::new(format!("{DOMAIN}.{method}"))
}

/// Evaluates an expression on the page. Optional parameters:
/// `objectGroup`, `returnByValue`, `includeCommandLineAPI`,
/// `doNotPauseOnExceptionsAndMuteConsole`, `contextId`, `generatePreview`.
pub fn evaluate(expression: &str) -> Command {
    command("evaluate").with_str("expression", expression)
}

/// Calls a function with the given object as receiver. Optional parameters:
/// `arguments`, `returnByValue`, `doNotPauseOnExceptionsAndMuteConsole`,
/// `generatePreview`.
pub fn call_function_on(object_id: &str, function_declaration: &str) -> Command {
    command("callFunctionOn")
        .with_str("objectId", object_id)
        .with_str("functionDeclaration", function_declaration)
}

/// Lists properties of the given object. Optional parameters:
/// `ownProperties`, `accessorPropertiesOnly`, `generatePreview`.
pub fn get_properties(object_id: &str) -> Command {
    command("getProperties").with_str("objectId", object_id)
}

pub fn release_object(object_id: &str) -> Command {
    command("releaseObject").with_str("objectId", object_id)
}

pub fn release_object_group(object_group: &str) -> Command {
    command("releaseObjectGroup").with_str("objectGroup", object_group)
}

pub fn run() -> Command {
    command("run")
}

pub fn compile_script(expression: &str, source_url: &str, persist_script: bool) -> Command {
    command("compileScript")
        .with_str("expression", expression)
        .with_str("sourceURL", source_url)
        .with_bool("persistScript", persist_script)
}

/// Runs a compiled script. Optional parameters: `objectGroup`,
/// `doNotPauseOnExceptionsAndMuteConsole`.
pub fn run_script(script_id: &str, execution_context_id: i64) -> Command {
    command("runScript")
        .with_str("scriptId", script_id)
        .with_i64("executionContextId", execution_context_id)
}

pub fn enable() -> Command {
    command("enable")
}

pub fn disable() -> Command {
    command("disable")
}

/// A call argument for [`call_function_on`]. Optional fields: `value`,
/// `objectId`, `type`.
pub fn call_argument() -> DevtoolsObject {
    DevtoolsObject::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_evaluate() {
        let cmd = evaluate("document.hasFocus()");
        assert_eq!(cmd.method(), "Runtime.evaluate");
        assert_eq!(cmd.params()["expression"], json!("document.hasFocus()"));
    }

    #[test]
    fn test_call_function_on_with_arguments() {
        let arg = call_argument().with_str("objectId", "obj-7");
        let cmd = call_function_on("obj-1", "function() { return this; }")
            .with_object_array("arguments", [arg])
            .with_bool("returnByValue", true);
        assert_eq!(cmd.params()["arguments"][0]["objectId"], json!("obj-7"));
    }
}
