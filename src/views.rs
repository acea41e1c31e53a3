use vivaldi_event_filter_types::{GuestViewId, TabId};

/// The guest views attached to a script context and the tabs they display.
///
/// Both lists keep registration order and may hold duplicates, removal always
/// drops the first match only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRegistry {
    views: Vec<GuestViewId>,
    tabs: Vec<TabId>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that guest view `view` showing `tab` was attached.
    pub fn register(&mut self, view: GuestViewId, tab: TabId) {
        self.views.push(view);
        self.tabs.push(tab);
    }

    /// Forgets one occurrence of `view` and, if `tab` is a valid tab id, one
    /// occurrence of `tab`. The two removals are independent of each other.
    pub fn unregister(&mut self, view: GuestViewId, tab: TabId) {
        remove_first(&mut self.views, &view);
        if tab.is_valid() {
            remove_first(&mut self.tabs, &tab);
        }
    }

    pub fn has_view(&self, view: GuestViewId) -> bool {
        self.views.contains(&view)
    }

    pub fn has_tab(&self, tab: TabId) -> bool {
        self.tabs.contains(&tab)
    }

    pub fn views(&self) -> &[GuestViewId] {
        &self.views
    }

    pub fn tabs(&self) -> &[TabId] {
        &self.tabs
    }

    /// Number of registered views. Tabs are not counted, they can outlive
    /// their view when it was unregistered without a valid tab id.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// `true` if no view is registered, regardless of remaining tabs.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn clear(&mut self) {
        self.views.clear();
        self.tabs.clear();
    }
}

fn remove_first<T: PartialEq>(items: &mut Vec<T>, item: &T) {
    if let Some(idx) = items.iter().position(|i| i == item) {
        items.remove(idx);
    }
}
