use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Extension id of the browser UI app.
pub const VIVALDI_APP_ID: &str = "mpognobbkildjkofajifpdfhcoklimli";

/// File name of the document that hosts a browser window of the UI app.
pub const WINDOW_DOCUMENT: &str = "browser.html";

/// Global the UI app stores the id of its window in.
pub const WINDOW_ID_GLOBAL: &str = "vivaldiWindowId";

pub const GUEST_VIEW_PREFIXES: [&str; 2] = ["webViewInternal.", "webViewPrivate."];

pub const TAB_PREFIXES: [&str; 1] = ["tabs."];

pub const TAB_EVENTS: [&str; 1] = ["tabsPrivate.onFaviconUpdated"];

/// What happens when the window id global is missing or still `0` the first
/// time it is needed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowIdPolicy {
    /// Whatever the first read yields is cached, a failed read caches `0`.
    #[default]
    CacheFirstRead,
    /// Keep reading the global on every query until it holds a non-zero id.
    RetryWhileUnset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    /// Extension ids whose contexts get their events filtered. Every other
    /// context receives everything. Ordered so serialized configs are stable.
    trusted_app_ids: BTreeSet<String>,
    /// The document file name that marks a context as a browser window.
    window_document: String,
    /// Name of the global integer holding the window id of a window context.
    window_id_global: String,
    /// Events routed by the `instanceId` of their guest view.
    guest_view_prefixes: Vec<String>,
    /// Events routed by the window and tab ids found in their arguments.
    tab_prefixes: Vec<String>,
    /// Exact event names routed like `tab_prefixes`.
    tab_events: Vec<String>,
    window_id_policy: WindowIdPolicy,
}

impl FilterConfig {
    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder::default()
    }

    /// Parses a configuration from json, fields that are missing keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FilterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn is_trusted_app(&self, extension_id: &str) -> bool {
        self.trusted_app_ids.contains(extension_id)
    }

    pub fn trusted_app_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.trusted_app_ids.iter().map(String::as_str)
    }

    pub fn window_document(&self) -> &str {
        &self.window_document
    }

    pub fn window_id_global(&self) -> &str {
        &self.window_id_global
    }

    pub fn guest_view_prefixes(&self) -> &[String] {
        &self.guest_view_prefixes
    }

    pub fn tab_prefixes(&self) -> &[String] {
        &self.tab_prefixes
    }

    pub fn tab_events(&self) -> &[String] {
        &self.tab_events
    }

    pub fn window_id_policy(&self) -> WindowIdPolicy {
        self.window_id_policy
    }

    fn validate(&self) -> Result<()> {
        if self.window_document.is_empty() {
            return Err(FilterError::InvalidConfig(
                "window document must not be empty".to_string(),
            ));
        }
        if self.window_id_global.is_empty() {
            return Err(FilterError::InvalidConfig(
                "window id global must not be empty".to_string(),
            ));
        }
        let lists = [
            ("trusted app id", self.trusted_app_ids.iter().collect::<Vec<_>>()),
            ("guest view prefix", self.guest_view_prefixes.iter().collect()),
            ("tab prefix", self.tab_prefixes.iter().collect()),
            ("tab event", self.tab_events.iter().collect()),
        ];
        for (what, entries) in lists {
            if entries.iter().any(|s| s.is_empty()) {
                return Err(FilterError::InvalidConfig(format!(
                    "{} must not be empty",
                    what
                )));
            }
        }
        Ok(())
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            trusted_app_ids: std::iter::once(VIVALDI_APP_ID.to_string()).collect(),
            window_document: WINDOW_DOCUMENT.to_string(),
            window_id_global: WINDOW_ID_GLOBAL.to_string(),
            guest_view_prefixes: GUEST_VIEW_PREFIXES.iter().map(|s| s.to_string()).collect(),
            tab_prefixes: TAB_PREFIXES.iter().map(|s| s.to_string()).collect(),
            tab_events: TAB_EVENTS.iter().map(|s| s.to_string()).collect(),
            window_id_policy: WindowIdPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterConfigBuilder {
    config: FilterConfig,
}

impl FilterConfigBuilder {
    /// Treat contexts of this extension as part of the UI app as well.
    pub fn trusted_app(mut self, extension_id: impl Into<String>) -> Self {
        self.config.trusted_app_ids.insert(extension_id.into());
        self
    }

    /// Replaces the set of trusted extension ids.
    pub fn trusted_apps<I, S>(mut self, extension_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.trusted_app_ids = extension_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn window_document(mut self, file_name: impl Into<String>) -> Self {
        self.config.window_document = file_name.into();
        self
    }

    pub fn window_id_global(mut self, name: impl Into<String>) -> Self {
        self.config.window_id_global = name.into();
        self
    }

    pub fn guest_view_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.guest_view_prefixes.push(prefix.into());
        self
    }

    pub fn tab_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.tab_prefixes.push(prefix.into());
        self
    }

    pub fn tab_event(mut self, name: impl Into<String>) -> Self {
        self.config.tab_events.push(name.into());
        self
    }

    pub fn window_id_policy(mut self, policy: WindowIdPolicy) -> Self {
        self.config.window_id_policy = policy;
        self
    }

    pub fn build(self) -> Result<FilterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FilterConfig::default();
        assert!(config.is_trusted_app(VIVALDI_APP_ID));
        assert!(!config.is_trusted_app("abcdefghijklmnopabcdefghijklmnop"));
        assert_eq!(config.window_document(), "browser.html");
        assert_eq!(config.window_id_global(), "vivaldiWindowId");
        assert_eq!(
            config.guest_view_prefixes(),
            ["webViewInternal.", "webViewPrivate."]
        );
        assert_eq!(config.tab_prefixes(), ["tabs."]);
        assert_eq!(config.tab_events(), ["tabsPrivate.onFaviconUpdated"]);
        assert_eq!(config.window_id_policy(), WindowIdPolicy::CacheFirstRead);
    }

    #[test]
    fn builder() {
        let config = FilterConfig::builder()
            .trusted_app("other")
            .tab_event("windows.onFocusChanged")
            .window_id_policy(WindowIdPolicy::RetryWhileUnset)
            .build()
            .unwrap();
        assert!(config.is_trusted_app("other"));
        assert!(config.is_trusted_app(VIVALDI_APP_ID));
        assert_eq!(config.tab_events().len(), 2);
        assert_eq!(config.window_id_policy(), WindowIdPolicy::RetryWhileUnset);

        let config = FilterConfig::builder().trusted_apps(["a", "b"]).build().unwrap();
        assert!(!config.is_trusted_app(VIVALDI_APP_ID));
        assert_eq!(config.trusted_app_ids().count(), 2);
    }

    #[test]
    fn rejects_empty_entries() {
        let err = FilterConfig::builder().window_document("").build();
        assert!(matches!(err, Err(FilterError::InvalidConfig(_))));

        let err = FilterConfig::builder().tab_prefix("").build();
        assert!(matches!(err, Err(FilterError::InvalidConfig(_))));

        let err = FilterConfig::builder().trusted_app("").build();
        assert!(matches!(err, Err(FilterError::InvalidConfig(_))));
    }

    #[test]
    fn from_json() {
        let config = FilterConfig::from_json(
            r#"{"windowDocument": "window.html", "windowIdPolicy": "retryWhileUnset"}"#,
        )
        .unwrap();
        assert_eq!(config.window_document(), "window.html");
        assert_eq!(config.window_id_global(), "vivaldiWindowId");
        assert_eq!(config.window_id_policy(), WindowIdPolicy::RetryWhileUnset);
        assert!(config.is_trusted_app(VIVALDI_APP_ID));

        assert!(matches!(
            FilterConfig::from_json(r#"{"windowIdGlobal": ""}"#),
            Err(FilterError::InvalidConfig(_))
        ));
        assert!(matches!(
            FilterConfig::from_json("not json"),
            Err(FilterError::Json(_))
        ));
    }

    #[test]
    fn serializes_trusted_apps_in_order() {
        let config = FilterConfig::builder()
            .trusted_apps(["zzz", "aaa", "mmm"])
            .build()
            .unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["trustedAppIds"], serde_json::json!(["aaa", "mmm", "zzz"]));
        assert_eq!(
            config.trusted_app_ids().collect::<Vec<_>>(),
            ["aaa", "mmm", "zzz"]
        );

        let parsed = FilterConfig::from_json(&json.to_string()).unwrap();
        assert_eq!(parsed, config);
    }
}
