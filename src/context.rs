use fnv::FnvHashMap;
use serde_json::Value;
use url::Url;

use crate::error::Result;

/// The script context an event would be delivered to.
///
/// Every frame of an extension page gets its own script context, the UI app
/// has one per browser window plus one for each of its auxiliary pages
/// (settings, popups, background page). The host owns the context, filters
/// only ever borrow it for as long as the context is alive.
pub trait ScriptContext {
    /// Id of the extension this context runs code for.
    fn extension_id(&self) -> &str;

    /// Url of the document loaded in the context.
    fn url(&self) -> &Url;

    /// Reads the global variable `name` from the context's javascript
    /// environment, `None` if the read did not produce a value.
    fn global(&self, name: &str) -> Option<Value>;

    /// The last path segment of [`ScriptContext::url`], empty if the url has
    /// no path or ends with a `/`.
    fn document_file_name(&self) -> &str {
        self.url()
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("")
    }
}

/// A script context described by plain values.
///
/// Useful for hosts that capture the state of their contexts up front.
#[derive(Debug, Clone)]
pub struct ContextInfo {
    extension_id: String,
    url: Url,
    globals: FnvHashMap<String, Value>,
}

impl ContextInfo {
    pub fn new(extension_id: impl Into<String>, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            extension_id: extension_id.into(),
            url: Url::parse(url.as_ref())?,
            globals: Default::default(),
        })
    }

    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_global(name, value);
        self
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.globals.insert(name.into(), value.into());
    }

    pub fn remove_global(&mut self, name: &str) -> Option<Value> {
        self.globals.remove(name)
    }
}

impl ScriptContext for ContextInfo {
    fn extension_id(&self) -> &str {
        &self.extension_id
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(name).cloned()
    }
}
