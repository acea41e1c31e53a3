use vivaldi_event_filter_types::{ValueExt, WindowId};

use crate::config::{FilterConfig, WindowIdPolicy};
use crate::context::ScriptContext;

/// Tracks the browser window a script context belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowState {
    /// The context is not a browser window of the UI app.
    NotApplicable,
    /// The context is a browser window, its id has not been read yet.
    Unresolved,
    /// The window id read from the context, it never changes afterwards.
    Resolved(WindowId),
}

impl WindowState {
    /// Only the UI app's own window document has a window id.
    pub fn for_context(is_trusted: bool, file_name: &str, config: &FilterConfig) -> Self {
        if is_trusted && file_name == config.window_document() {
            WindowState::Unresolved
        } else {
            WindowState::NotApplicable
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, WindowState::NotApplicable)
    }

    /// The window id if it has been resolved already
    pub fn cached(&self) -> Option<WindowId> {
        match self {
            WindowState::Resolved(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the window id of the context, reading it from the context's
    /// globals on first use.
    ///
    /// Non window contexts yield [`WindowId::NONE`].
    pub fn resolve<C: ScriptContext + ?Sized>(
        &mut self,
        ctx: &C,
        config: &FilterConfig,
    ) -> WindowId {
        match *self {
            WindowState::NotApplicable => WindowId::NONE,
            WindowState::Resolved(id) => id,
            WindowState::Unresolved => {
                let global = config.window_id_global();
                let id = ctx
                    .global(global)
                    .map(|value| WindowId::new(value.to_int32()))
                    .unwrap_or(WindowId::UNSET);

                match config.window_id_policy() {
                    WindowIdPolicy::RetryWhileUnset if id == WindowId::UNSET => {
                        tracing::debug!("Window id global {} not set yet", global);
                    }
                    _ => {
                        tracing::debug!("Resolved {} from {}", id, global);
                        *self = WindowState::Resolved(id);
                    }
                }
                id
            }
        }
    }
}
