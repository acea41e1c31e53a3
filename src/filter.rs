use std::sync::Arc;

use serde_json::Value;
use vivaldi_event_filter_types::{ExtensionEvent, GuestViewId, TabId, ValueExt, WindowId};

use crate::config::FilterConfig;
use crate::context::ScriptContext;
use crate::event::EventKind;
use crate::views::ViewRegistry;
use crate::window::WindowState;

/// Decides which events reach the script contexts of the UI app.
///
/// Every window of the UI app runs in its own script context but listens to
/// the same extension events. Guest view events are only delivered to the
/// context embedding that guest view, tab events only to the window that
/// owns the tab. Contexts of any other extension are never filtered.
///
/// The filter borrows its context and must be dropped with it. Calls are
/// expected on the context's script thread, one at a time.
#[derive(Debug)]
pub struct EventFilter<'a, C: ScriptContext + ?Sized> {
    context: &'a C,
    config: Arc<FilterConfig>,
    /// Whether the context belongs to the UI app
    is_trusted: bool,
    window: WindowState,
    views: ViewRegistry,
}

impl<'a, C: ScriptContext + ?Sized> EventFilter<'a, C> {
    /// Create a filter for `context` with the default configuration.
    pub fn new(context: &'a C) -> Self {
        Self::with_config(context, Arc::new(FilterConfig::default()))
    }

    pub fn with_config(context: &'a C, config: Arc<FilterConfig>) -> Self {
        let is_trusted = config.is_trusted_app(context.extension_id());
        let window =
            WindowState::for_context(is_trusted, context.document_file_name(), &config);
        Self {
            context,
            config,
            is_trusted,
            window,
            views: ViewRegistry::new(),
        }
    }

    pub fn context(&self) -> &'a C {
        self.context
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn is_trusted(&self) -> bool {
        self.is_trusted
    }

    pub fn window_state(&self) -> WindowState {
        self.window
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// A guest view got attached to this context.
    pub fn register_view(&mut self, view: impl Into<GuestViewId>, tab: impl Into<TabId>) {
        let (view, tab) = (view.into(), tab.into());
        tracing::debug!("Register {} with {}", view, tab);
        self.views.register(view, tab);
    }

    /// A guest view got detached from this context.
    pub fn unregister_view(&mut self, view: impl Into<GuestViewId>, tab: impl Into<TabId>) {
        let (view, tab) = (view.into(), tab.into());
        tracing::debug!("Unregister {} with {}", view, tab);
        self.views.unregister(view, tab);
    }

    pub fn has_view(&self, view: impl Into<GuestViewId>) -> bool {
        self.views.has_view(view.into())
    }

    pub fn has_tab(&self, tab: impl Into<TabId>) -> bool {
        self.views.has_tab(tab.into())
    }

    /// The id of the browser window this context renders, resolved on first
    /// use. [`WindowId::NONE`] if the context is no browser window.
    pub fn window_id(&mut self) -> WindowId {
        self.window.resolve(self.context, &self.config)
    }

    /// Returns `true` if the event `name` with `args` should be dispatched to
    /// this context.
    ///
    /// Missing or mistyped ids never suppress an event.
    pub fn should_deliver(&mut self, name: &str, args: &[Value], filtering_info: &Value) -> bool {
        if !self.is_trusted {
            return true;
        }
        match EventKind::classify(name, &self.config) {
            EventKind::GuestView => {
                let view = GuestViewId::new(filtering_info.get_int("instanceId").unwrap_or(0));
                if self.views.has_view(view) {
                    true
                } else {
                    tracing::trace!("Suppress {}, {} not attached", name, view);
                    false
                }
            }
            EventKind::Tab => self.should_deliver_tab_event(name, args),
            EventKind::Other => true,
        }
    }

    /// Same as [`EventFilter::should_deliver`] for an already assembled event.
    pub fn filter_event(&mut self, event: &ExtensionEvent) -> bool {
        self.should_deliver(&event.name, &event.args, &event.filtering_info)
    }

    fn should_deliver_tab_event(&mut self, name: &str, args: &[Value]) -> bool {
        if !self.window.is_applicable() {
            tracing::trace!("Suppress {}, context is no window", name);
            return false;
        }
        let current = self.window_id();
        for arg in args {
            let Some(dict) = arg.as_dict() else {
                continue;
            };
            let int = |key: &str| dict.get(key).and_then(ValueExt::as_int);
            // only one of the ids is checked, `windowId` takes precedence
            if let Some(window) = int("windowId").map(WindowId::new) {
                if window.is_valid() && window != current {
                    tracing::trace!("Suppress {}, {} is not {}", name, window, current);
                    return false;
                }
            } else if let Some(tab) = int("tabId").map(TabId::new) {
                if tab.is_valid() && !self.views.has_tab(tab) {
                    tracing::trace!("Suppress {}, {} not in this window", name, tab);
                    return false;
                }
            }
        }
        true
    }
}
