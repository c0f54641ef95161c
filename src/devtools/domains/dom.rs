//! Factory for commands in the devtools `DOM` domain.

use crate::devtools::command::{Command, DevtoolsObject};

const DOMAIN: &str = "DOM";

fn command(method: &str) -> Command {
    Command::new(format!("{DOMAIN}.{method}"))
}

pub fn enable() -> Command {
    command("enable")
}

pub fn disable() -> Command {
    command("disable")
}

pub fn get_document() -> Command {
    command("getDocument")
}

/// Requests children of a node. Optional parameter: `depth`.
pub fn request_child_nodes(node_id: i64) -> Command {
    command("requestChildNodes").with_i64("nodeId", node_id)
}

pub fn query_selector(node_id: i64, selector: &str) -> Command {
    command("querySelector")
        .with_i64("nodeId", node_id)
        .with_str("selector", selector)
}

pub fn query_selector_all(node_id: i64, selector: &str) -> Command {
    command("querySelectorAll")
        .with_i64("nodeId", node_id)
        .with_str("selector", selector)
}

pub fn set_node_name(node_id: i64, name: &str) -> Command {
    command("setNodeName")
        .with_i64("nodeId", node_id)
        .with_str("name", name)
}

pub fn set_node_value(node_id: i64, value: &str) -> Command {
    command("setNodeValue")
        .with_i64("nodeId", node_id)
        .with_str("value", value)
}

pub fn remove_node(node_id: i64) -> Command {
    command("removeNode").with_i64("nodeId", node_id)
}

pub fn set_attribute_value(node_id: i64, name: &str, value: &str) -> Command {
    command("setAttributeValue")
        .with_i64("nodeId", node_id)
        .with_str("name", name)
        .with_str("value", value)
}

pub fn remove_attribute(node_id: i64, name: &str) -> Command {
    command("removeAttribute")
        .with_i64("nodeId", node_id)
        .with_str("name", name)
}

pub fn get_outer_html(node_id: i64) -> Command {
    command("getOuterHTML").with_i64("nodeId", node_id)
}

pub fn set_outer_html(node_id: i64, outer_html: &str) -> Command {
    command("setOuterHTML")
        .with_i64("nodeId", node_id)
        .with_str("outerHTML", outer_html)
}

pub fn request_node(object_id: &str) -> Command {
    command("requestNode").with_str("objectId", object_id)
}

/// Resolves a node to a remote object. Optional parameter: `objectGroup`.
pub fn resolve_node(node_id: i64) -> Command {
    command("resolveNode").with_i64("nodeId", node_id)
}

pub fn get_attributes(node_id: i64) -> Command {
    command("getAttributes").with_i64("nodeId", node_id)
}

/// Highlights a node. Optional parameters: `nodeId`, `backendNodeId`,
/// `objectId`.
pub fn highlight_node(highlight_config: DevtoolsObject) -> Command {
    command("highlightNode").with_object("highlightConfig", highlight_config)
}

pub fn hide_highlight() -> Command {
    command("hideHighlight")
}

pub fn push_nodes_by_backend_ids_to_frontend(backend_node_ids: impl IntoIterator<Item = i64>) -> Command {
    command("pushNodesByBackendIdsToFrontend").with_number_array("backendNodeIds", backend_node_ids)
}

/// An RGBA color object. Optional field: `a`.
pub fn rgba(r: i64, g: i64, b: i64) -> DevtoolsObject {
    DevtoolsObject::new()
        .with_i64("r", r)
        .with_i64("g", g)
        .with_i64("b", b)
}

/// A highlight configuration. Optional fields include `showInfo`,
/// `contentColor`, `paddingColor`, `borderColor`, `marginColor`.
pub fn highlight_config() -> DevtoolsObject {
    DevtoolsObject::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_query_selector() {
        let cmd = query_selector(4, "#submit");
        assert_eq!(cmd.method(), "DOM.querySelector");
        assert_eq!(cmd.params()["nodeId"], json!(4));
        assert_eq!(cmd.params()["selector"], json!("#submit"));
    }

    #[test]
    fn test_highlight_node_with_config() {
        let config = highlight_config()
            .with_bool("showInfo", true)
            .with_object("contentColor", rgba(255, 0, 0).with_f64("a", 0.5));
        let cmd = highlight_node(config);
        assert_eq!(
            cmd.params()["highlightConfig"]["contentColor"],
            json!({"r": 255, "g": 0, "b": 0, "a": 0.5})
        );
    }

    #[test]
    fn test_push_nodes_by_backend_ids() {
        let cmd = push_nodes_by_backend_ids_to_frontend([7, 8]);
        assert_eq!(cmd.params()["backendNodeIds"], json!([7, 8]));
    }
}
