//! iOS Web Inspector channel: wire model and session multiplexer.
//!
//! Mobile Safari does not expose a devtools socket per page. Instead the
//! device's Web Inspector service shares one channel across every debuggable
//! application, and devtools payloads ride inside inspector envelopes. The
//! [`InspectorMessenger`] owns that channel's client-side state.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`message`] | `_rpc_*` selector / `WIR*` key wire model |
//! | [`messenger`] | Application roster, page listings, active target |

// ============================================================================
// Submodules
// ============================================================================

/// Wire message model.
pub mod message;

/// Session multiplexer.
pub mod messenger;

// ============================================================================
// Re-exports
// ============================================================================

pub use message::{InspectorApplication, InspectorMessage, InspectorPage};
pub use messenger::{
    AppListing, DevtoolsListener, InspectorMessenger, InspectorSink, InspectorStream, PageTarget,
};
