//! Factory for commands in the devtools `Network` domain.

use crate::devtools::command::Command;

const DOMAIN: &str = "Network";

fn command(method: &str) -> Command {
    Command::new(format!("{DOMAIN}.{method}"))
}

/// Enables network tracking. Buffer sizes are optional parameters:
/// `maxTotalBufferSize`, `maxResourceBufferSize`.
pub fn enable() -> Command {
    command("enable")
}

/// Disables network tracking.
pub fn disable() -> Command {
    command("disable")
}

pub fn set_user_agent_override(user_agent: &str) -> Command {
    command("setUserAgentOverride").with_str("userAgent", user_agent)
}

pub fn get_response_body(request_id: &str) -> Command {
    command("getResponseBody").with_str("requestId", request_id)
}

pub fn add_blocked_url(url: &str) -> Command {
    command("addBlockedUrl").with_str("url", url)
}

pub fn remove_blocked_url(url: &str) -> Command {
    command("removeBlockedUrl").with_str("url", url)
}

pub fn replay_xhr(request_id: &str) -> Command {
    command("replayXHR").with_str("requestId", request_id)
}

pub fn set_monitoring_xhr_enabled(enabled: bool) -> Command {
    command("setMonitoringXHREnabled").with_bool("enabled", enabled)
}

pub fn can_clear_browser_cache() -> Command {
    command("canClearBrowserCache")
}

pub fn clear_browser_cache() -> Command {
    command("clearBrowserCache")
}

pub fn can_clear_browser_cookies() -> Command {
    command("canClearBrowserCookies")
}

pub fn clear_browser_cookies() -> Command {
    command("clearBrowserCookies")
}

pub fn get_cookies() -> Command {
    command("getCookies")
}

pub fn delete_cookie(cookie_name: &str, url: &str) -> Command {
    command("deleteCookie")
        .with_str("cookieName", cookie_name)
        .with_str("url", url)
}

pub fn emulate_network_conditions(
    offline: bool,
    latency: i64,
    download_throughput: i64,
    upload_throughput: i64,
) -> Command {
    command("emulateNetworkConditions")
        .with_bool("offline", offline)
        .with_i64("latency", latency)
        .with_i64("downloadThroughput", download_throughput)
        .with_i64("uploadThroughput", upload_throughput)
}

pub fn set_cache_disabled(cache_disabled: bool) -> Command {
    command("setCacheDisabled").with_bool("cacheDisabled", cache_disabled)
}

pub fn set_bypass_service_worker(bypass: bool) -> Command {
    command("setBypassServiceWorker").with_bool("bypass", bypass)
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_set_cache_disabled() {
        let cmd = set_cache_disabled(false);
        assert_eq!(cmd.method(), "Network.setCacheDisabled");
        assert_eq!(
            cmd.to_message(77),
            json!({
                "method": "Network.setCacheDisabled",
                "params": {"cacheDisabled": false},
                "id": 77,
            })
        );
    }

    #[test]
    fn test_enable_with_optional_buffer_sizes() {
        let cmd = enable()
            .with_i64("maxTotalBufferSize", 1 << 20)
            .with_i64("maxResourceBufferSize", 1 << 16);
        assert_eq!(cmd.method(), "Network.enable");
        assert_eq!(cmd.params().len(), 2);
    }

    #[test]
    fn test_emulate_network_conditions() {
        let cmd = emulate_network_conditions(true, 50, 1000, 500);
        assert_eq!(cmd.params()["offline"], json!(true));
        assert_eq!(cmd.params()["latency"], json!(50));
    }
}
