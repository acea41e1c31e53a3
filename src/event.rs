use crate::config::FilterConfig;

/// How an event is routed to the contexts of the UI app.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Belongs to a single guest view, identified by the `instanceId` of the
    /// filtering info.
    GuestView,
    /// Concerns tabs and windows, identified by the `windowId` and `tabId`
    /// fields of the event arguments.
    Tab,
    /// Delivered everywhere.
    Other,
}

impl EventKind {
    pub fn classify(name: &str, config: &FilterConfig) -> Self {
        if starts_with_any(name, config.guest_view_prefixes()) {
            EventKind::GuestView
        } else if starts_with_any(name, config.tab_prefixes())
            || config.tab_events().iter().any(|event| event == name)
        {
            EventKind::Tab
        } else {
            EventKind::Other
        }
    }
}

fn starts_with_any(name: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
}
