//! Factory for commands in the devtools `Page` domain.

use crate::devtools::command::Command;

const DOMAIN: &str = "Page";

fn command(method: &str) -> Command {
    Command::new(format!("{DOMAIN}.{method}"))
}

pub fn enable() -> Command {
    command("enable")
}

pub fn disable() -> Command {
    command("disable")
}

pub fn add_script_to_evaluate_on_load(script_source: &str) -> Command {
    command("addScriptToEvaluateOnLoad").with_str("scriptSource", script_source)
}

pub fn remove_script_to_evaluate_on_load(identifier: &str) -> Command {
    command("removeScriptToEvaluateOnLoad").with_str("identifier", identifier)
}

pub fn set_auto_attach_to_created_pages(auto_attach: bool) -> Command {
    command("setAutoAttachToCreatedPages").with_bool("autoAttach", auto_attach)
}

/// Reloads the page. Optional parameters: `ignoreCache`,
/// `scriptToEvaluateOnLoad`.
pub fn reload() -> Command {
    command("reload")
}

pub fn navigate(url: &str) -> Command {
    command("navigate").with_str("url", url)
}

pub fn get_navigation_history() -> Command {
    command("getNavigationHistory")
}

pub fn navigate_to_history_entry(entry_id: i64) -> Command {
    command("navigateToHistoryEntry").with_i64("entryId", entry_id)
}

pub fn get_cookies() -> Command {
    command("getCookies")
}

pub fn delete_cookie(cookie_name: &str, url: &str) -> Command {
    command("deleteCookie")
        .with_str("cookieName", cookie_name)
        .with_str("url", url)
}

pub fn get_resource_tree() -> Command {
    command("getResourceTree")
}

pub fn get_resource_content(frame_id: &str, url: &str) -> Command {
    command("getResourceContent")
        .with_str("frameId", frame_id)
        .with_str("url", url)
}

/// Searches a resource. Optional parameters: `caseSensitive`, `isRegex`.
pub fn search_in_resource(frame_id: &str, url: &str, query: &str) -> Command {
    command("searchInResource")
        .with_str("frameId", frame_id)
        .with_str("url", url)
        .with_str("query", query)
}

pub fn set_document_content(frame_id: &str, html: &str) -> Command {
    command("setDocumentContent")
        .with_str("frameId", frame_id)
        .with_str("html", html)
}

pub fn capture_screenshot() -> Command {
    command("captureScreenshot")
}

/// Answers an open JavaScript dialog. Optional parameter: `promptText`.
pub fn handle_javascript_dialog(accept: bool) -> Command {
    command("handleJavaScriptDialog").with_bool("accept", accept)
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_navigate() {
        let cmd = navigate("https://example.com");
        assert_eq!(cmd.method(), "Page.navigate");
        assert_eq!(cmd.params()["url"], json!("https://example.com"));
    }

    #[test]
    fn test_reload_with_optionals() {
        let cmd = reload()
            .with_bool("ignoreCache", true)
            .with_str("scriptToEvaluateOnLoad", "void 0");
        assert_eq!(cmd.method(), "Page.reload");
        assert_eq!(cmd.params().len(), 2);
    }

    #[test]
    fn test_enable_has_no_params() {
        assert_eq!(enable().to_message(1), json!({"method": "Page.enable", "id": 1}));
    }
}
