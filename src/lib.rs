//! Per context filtering of extension events for the browser UI app.
//!
//! The UI app opens one script context per browser window, each of them
//! subscribes to the same `tabs.*` and `webViewInternal.*` events. An
//! [`EventFilter`] bound to a context tells the event dispatcher which of
//! those events actually concern that context.
//!
//! ```
//! use serde_json::{json, Value};
//! use vivaldi_event_filter::{ContextInfo, EventFilter, VIVALDI_APP_ID};
//!
//! let ctx = ContextInfo::new(
//!     VIVALDI_APP_ID,
//!     "chrome-extension://mpognobbkildjkofajifpdfhcoklimli/browser.html",
//! )?
//! .with_global("vivaldiWindowId", 3);
//!
//! let mut filter = EventFilter::new(&ctx);
//! filter.register_view(1, 10);
//!
//! assert!(filter.should_deliver("tabs.onUpdated", &[json!({"tabId": 10})], &Value::Null));
//! assert!(!filter.should_deliver("tabs.onUpdated", &[json!({"windowId": 4})], &Value::Null));
//! # Ok::<(), vivaldi_event_filter::error::FilterError>(())
//! ```

pub use vivaldi_event_filter_types as types;
pub use vivaldi_event_filter_types::{ExtensionEvent, GuestViewId, Method, TabId, WindowId};

pub use crate::config::{FilterConfig, FilterConfigBuilder, WindowIdPolicy, VIVALDI_APP_ID};
pub use crate::context::{ContextInfo, ScriptContext};
pub use crate::event::EventKind;
pub use crate::filter::EventFilter;
pub use crate::views::ViewRegistry;
pub use crate::window::WindowState;

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod filter;
pub mod views;
pub mod window;
