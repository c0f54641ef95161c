//! Command builders organized by devtools domain.
//!
//! Each submodule is a factory of [`Command`](crate::Command) values for one
//! protocol domain. Required parameters are function arguments; optional
//! parameters are added by chaining `with_*` calls on the returned command:
//!
//! ```
//! use safari_webdriver::domains::{network, page, runtime};
//!
//! let _ = page::navigate("https://example.com");
//! let _ = network::set_cache_disabled(true);
//! let _ = runtime::evaluate("document.title").with_bool("returnByValue", true);
//! ```
//!
//! | Module | Domain |
//! |--------|--------|
//! | [`console`] | `Console` |
//! | [`dom`] | `DOM` |
//! | [`network`] | `Network` |
//! | [`page`] | `Page` |
//! | [`runtime`] | `Runtime` |
//! | [`timeline`] | `Timeline` |

// ============================================================================
// Submodules
// ============================================================================

/// `Console` domain commands.
pub mod console;

/// `DOM` domain commands and highlight objects.
pub mod dom;

/// `Network` domain commands.
pub mod network;

/// `Page` domain commands.
pub mod page;

/// `Runtime` domain commands and call arguments.
pub mod runtime;

/// `Timeline` domain commands.
pub mod timeline;
