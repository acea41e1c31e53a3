use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of an embedded guest view (`<webview>`) instance
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestViewId(i32);

impl GuestViewId {
    pub fn new(id: i32) -> Self {
        GuestViewId(id)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl From<i32> for GuestViewId {
    fn from(id: i32) -> Self {
        GuestViewId(id)
    }
}

impl fmt::Display for GuestViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestViewId({})", self.0)
    }
}

/// Identifier of a browser tab
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(i32);

impl TabId {
    pub fn new(id: i32) -> Self {
        TabId(id)
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    /// Tab ids issued by the browser are always positive.
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl From<i32> for TabId {
    fn from(id: i32) -> Self {
        TabId(id)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TabId({})", self.0)
    }
}

/// Identifier of a browser window
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(i32);

impl WindowId {
    /// The context is not a browser window at all.
    pub const NONE: WindowId = WindowId(-1);

    /// The context is a browser window whose id has not been assigned yet.
    pub const UNSET: WindowId = WindowId(0);

    pub fn new(id: i32) -> Self {
        WindowId(id)
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl From<i32> for WindowId {
    fn from(id: i32) -> Self {
        WindowId(id)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowId({})", self.0)
    }
}

pub trait Method {
    /// The whole string identifier for this method like: `tabs.onUpdated`
    fn identifier(&self) -> Cow<'static, str>;

    /// The name of the namespace this method belongs to: `tabs`
    fn domain_name(&self) -> Cow<'static, str> {
        self.split().0
    }

    /// The standalone identifier of the method inside the namespace:
    /// `onUpdated`
    fn method_name(&self) -> Cow<'static, str> {
        self.split().1
    }

    /// Tuple of (`domain_name`, `method_name`) : (`tabs`, `onUpdated`)
    ///
    /// An identifier without a `.` is all domain and an empty method name.
    fn split(&self) -> (Cow<'static, str>, Cow<'static, str>) {
        match self.identifier() {
            Cow::Borrowed(id) => match id.split_once('.') {
                Some((domain, method)) => (domain.into(), method.into()),
                None => (id.into(), Cow::Borrowed("")),
            },
            Cow::Owned(id) => match id.split_once('.') {
                Some((domain, method)) => (
                    Cow::Owned(domain.to_string()),
                    Cow::Owned(method.to_string()),
                ),
                None => (Cow::Owned(id), Cow::Borrowed("")),
            },
        }
    }
}

/// An event an extension API is about to dispatch to its listeners
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ExtensionEvent {
    /// Name of the event, like `tabs.onUpdated`
    pub name: Cow<'static, str>,
    /// Positional listener arguments
    #[serde(default)]
    pub args: Vec<Value>,
    /// Metadata the dispatcher matches listener filters against
    #[serde(rename = "filteringInfo", default)]
    pub filtering_info: Value,
}

impl ExtensionEvent {
    pub fn new(name: impl Into<Cow<'static, str>>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
            filtering_info: Value::Null,
        }
    }

    pub fn with_filtering_info(mut self, info: Value) -> Self {
        self.filtering_info = info;
        self
    }
}

impl Method for ExtensionEvent {
    fn identifier(&self) -> Cow<'static, str> {
        self.name.clone()
    }
}

/// Accessors over loosely typed event values that report a mismatch as
/// absence instead of failing.
pub trait ValueExt {
    /// The value as a 32 bit integer, if it is an integral number in range.
    fn as_int(&self) -> Option<i32>;

    /// The integer stored under `key`, if this is an object.
    fn get_int(&self, key: &str) -> Option<i32>;

    fn as_dict(&self) -> Option<&Map<String, Value>>;

    /// Coerces the value the way the script engine's `ToInt32` does.
    fn to_int32(&self) -> i32;
}

impl ValueExt for Value {
    fn as_int(&self) -> Option<i32> {
        self.as_i64().and_then(|n| i32::try_from(n).ok())
    }

    fn get_int(&self, key: &str) -> Option<i32> {
        self.as_object()
            .and_then(|obj| obj.get(key))
            .and_then(ValueExt::as_int)
    }

    fn as_dict(&self) -> Option<&Map<String, Value>> {
        self.as_object()
    }

    fn to_int32(&self) -> i32 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => *b as i32,
            Value::Number(n) => {
                if let Some(n) = n.as_i64() {
                    n as i32
                } else if let Some(n) = n.as_u64() {
                    n as i32
                } else {
                    n.as_f64().map(f64_to_int32).unwrap_or_default()
                }
            }
            Value::String(s) => f64_to_int32(string_to_number(s)),
            Value::Array(_) | Value::Object(_) => 0,
        }
    }
}

/// `ToInt32`: truncate, then wrap modulo 2^32 into the signed range.
fn f64_to_int32(n: f64) -> i32 {
    const TWO_32: f64 = 4_294_967_296.0;
    const TWO_31: f64 = 2_147_483_648.0;
    if !n.is_finite() {
        return 0;
    }
    let n = n.trunc().rem_euclid(TWO_32);
    if n >= TWO_31 {
        (n - TWO_32) as i32
    } else {
        n as i32
    }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex.is_empty() {
            return f64::NAN;
        }
        // accumulate in f64, hex literals may exceed any integer type
        return hex
            .chars()
            .try_fold(0f64, |acc, c| c.to_digit(16).map(|d| acc * 16.0 + f64::from(d)))
            .unwrap_or(f64::NAN);
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn split_identifier() {
        let event = ExtensionEvent::new("tabs.onUpdated", vec![]);
        assert_eq!(event.domain_name(), "tabs");
        assert_eq!(event.method_name(), "onUpdated");

        let event = ExtensionEvent::new(String::from("webViewInternal.onLoadCommit"), vec![]);
        assert_eq!(
            event.split(),
            (
                Cow::Borrowed("webViewInternal"),
                Cow::Borrowed("onLoadCommit")
            )
        );

        let event = ExtensionEvent::new("nodot", vec![]);
        assert_eq!(event.domain_name(), "nodot");
        assert_eq!(event.method_name(), "");
    }

    #[test]
    fn int_accessors() {
        assert_eq!(json!(5).as_int(), Some(5));
        assert_eq!(json!(-3).as_int(), Some(-3));
        assert_eq!(json!(5.5).as_int(), None);
        assert_eq!(json!("5").as_int(), None);
        assert_eq!(json!(i64::from(i32::MAX) + 1).as_int(), None);

        let info = json!({"instanceId": 7, "windowId": "3"});
        assert_eq!(info.get_int("instanceId"), Some(7));
        assert_eq!(info.get_int("windowId"), None);
        assert_eq!(info.get_int("missing"), None);
        assert_eq!(json!([1, 2]).get_int("instanceId"), None);
        assert_eq!(Value::Null.get_int("instanceId"), None);

        assert_eq!(info.as_dict().map(|d| d.len()), Some(2));
        assert!(json!([{"tabId": 1}]).as_dict().is_none());
        assert!(json!(1).as_dict().is_none());
    }

    #[test]
    fn int32_coercion() {
        assert_eq!(json!(3).to_int32(), 3);
        assert_eq!(json!(3.9).to_int32(), 3);
        assert_eq!(json!(-3.9).to_int32(), -3);
        assert_eq!(json!(4_294_967_297_u64).to_int32(), 1);
        assert_eq!(json!(2_147_483_648.0).to_int32(), i32::MIN);
        assert_eq!(json!(true).to_int32(), 1);
        assert_eq!(json!(false).to_int32(), 0);
        assert_eq!(Value::Null.to_int32(), 0);
        assert_eq!(json!(" 12 ").to_int32(), 12);
        assert_eq!(json!("0x10").to_int32(), 16);
        // 2^64 + 2^12 wraps to 2^12
        assert_eq!(json!("0x10000000000001000").to_int32(), 4096);
        assert_eq!(json!("0X1_0").to_int32(), 0);
        assert_eq!(json!("0x").to_int32(), 0);
        assert_eq!(json!("").to_int32(), 0);
        assert_eq!(json!("window").to_int32(), 0);
        assert_eq!(json!({"id": 1}).to_int32(), 0);
    }

    #[test]
    fn deserialize_event() {
        let event: ExtensionEvent = serde_json::from_value(json!({
            "name": "webViewPrivate.onFoo",
            "filteringInfo": {"instanceId": 2}
        }))
        .unwrap();
        assert_eq!(event.identifier(), "webViewPrivate.onFoo");
        assert!(event.args.is_empty());
        assert_eq!(event.filtering_info.get_int("instanceId"), Some(2));

        let event: ExtensionEvent =
            serde_json::from_value(json!({"name": "tabs.onCreated", "args": [{"tabId": 1}]}))
                .unwrap();
        assert_eq!(event.filtering_info, Value::Null);
        assert_eq!(event.args.len(), 1);
    }

    #[test]
    fn ids() {
        assert_eq!(WindowId::NONE.get(), -1);
        assert!(!WindowId::UNSET.is_valid());
        assert!(TabId::from(4).is_valid());
        assert!(!TabId::new(0).is_valid());
        assert_eq!(GuestViewId::new(9).to_string(), "GuestViewId(9)");
        assert_eq!(serde_json::to_value(TabId::new(3)).unwrap(), json!(3));
    }
}
