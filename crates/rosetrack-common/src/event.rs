use serde::Serialize;

/// Well-known event categories used across the page.
pub mod category {
    pub const ATTRIBUTION: &str = "Attribution";
    pub const CONVERSION: &str = "Conversion";
    pub const ENGAGEMENT: &str = "Engagement";
    pub const ERROR: &str = "Error";
    pub const NAVIGATION: &str = "Navigation";
}

/// One user action or milestone. Built, dispatched, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub action: String,
    pub category: String,
    pub label: Option<String>,
    pub value: Option<i64>,
}

impl Event {
    pub fn new(action: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            category: category.into(),
            label: None,
            value: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub const fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    /// Parameters in the shape tag-manager backends expect.
    pub fn params(&self) -> EventParams {
        EventParams {
            event_category: self.category.clone(),
            event_label: self.label.clone(),
            value: self.value,
        }
    }
}

/// Event payload as sent to a backend alongside the event name.
///
/// Unset fields are omitted from the serialized form rather than sent as
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventParams {
    pub event_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_fields() {
        let event = Event::new("scroll_depth", category::ENGAGEMENT)
            .with_label("Scrolled 50%")
            .with_value(50);
        assert_eq!(event.action, "scroll_depth");
        assert_eq!(event.label.as_deref(), Some("Scrolled 50%"));
        assert_eq!(event.value, Some(50));
    }

    #[test]
    fn params_omit_unset_fields() {
        let event = Event::new("order_button_hero", category::CONVERSION);
        let json = serde_json::to_string(&event.params()).unwrap();
        assert_eq!(json, r#"{"event_category":"Conversion"}"#);
    }

    #[test]
    fn params_include_label_and_value() {
        let event = Event::new("scroll_depth", category::ENGAGEMENT)
            .with_label("Scrolled 25%")
            .with_value(25);
        let json: serde_json::Value = serde_json::to_value(event.params()).unwrap();
        assert_eq!(json["event_category"], "Engagement");
        assert_eq!(json["event_label"], "Scrolled 25%");
        assert_eq!(json["value"], 25);
    }
}
