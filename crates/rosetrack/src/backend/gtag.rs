use rosetrack_common::EventParams;
use rosetrack_common::event::category;
use serde_json::json;

use super::{Backend, CommandQueue, ConversionChannel};

/// Google tag adapter: writes `gtag(...)` argument lists into the page's
/// `dataLayer`.
///
/// Acts as a [`ConversionChannel`] too; conversions carry `send_to` when an
/// ads conversion id is configured.
pub struct GtagBackend {
    data_layer: CommandQueue,
    conversion_id: Option<String>,
}

impl GtagBackend {
    pub const fn new(data_layer: CommandQueue, conversion_id: Option<String>) -> Self {
        Self {
            data_layer,
            conversion_id,
        }
    }

    pub const fn data_layer(&self) -> &CommandQueue {
        &self.data_layer
    }
}

impl Backend for GtagBackend {
    fn name(&self) -> &'static str {
        "gtag"
    }

    fn configure(&self, id: &str, page_path: &str) -> anyhow::Result<()> {
        self.data_layer
            .push(json!(["config", id, { "page_path": page_path }]))
    }

    fn event(&self, name: &str, params: &EventParams) -> anyhow::Result<()> {
        let params = serde_json::to_value(params)?;
        self.data_layer.push(json!(["event", name, params]))
    }
}

impl ConversionChannel for GtagBackend {
    fn name(&self) -> &'static str {
        "gtag-conversion"
    }

    fn conversion(&self, name: &str) -> anyhow::Result<()> {
        let mut params = serde_json::Map::new();
        if let Some(ref send_to) = self.conversion_id {
            params.insert("send_to".to_string(), json!(send_to));
        }
        params.insert("event_category".to_string(), json!(category::CONVERSION));
        params.insert("event_label".to_string(), json!(name));
        self.data_layer.push(json!(["event", "conversion", params]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rosetrack_common::Event;

    use super::*;

    #[test]
    fn configure_pushes_page_path() {
        let queue = CommandQueue::new();
        let gtag = GtagBackend::new(queue.clone(), None);
        gtag.configure("G-TEST", "/?utm_source=x").unwrap();
        assert_eq!(
            queue.snapshot()[0],
            json!(["config", "G-TEST", { "page_path": "/?utm_source=x" }])
        );
    }

    #[test]
    fn event_pushes_name_and_params() {
        let queue = CommandQueue::new();
        let gtag = GtagBackend::new(queue.clone(), None);
        let event = Event::new("page_view", category::NAVIGATION).with_label("/");
        gtag.event(&event.action, &event.params()).unwrap();
        assert_eq!(
            queue.snapshot()[0],
            json!(["event", "page_view", { "event_category": "Navigation", "event_label": "/" }])
        );
    }

    #[test]
    fn conversion_includes_send_to_when_configured() {
        let queue = CommandQueue::new();
        let gtag = GtagBackend::new(queue.clone(), Some("AW-1/abc".to_string()));
        gtag.conversion("order_button_hero").unwrap();
        let commands = queue.snapshot();
        let cmd = &commands[0];
        assert_eq!(cmd[1], "conversion");
        assert_eq!(cmd[2]["send_to"], "AW-1/abc");
        assert_eq!(cmd[2]["event_category"], "Conversion");
        assert_eq!(cmd[2]["event_label"], "order_button_hero");
    }

    #[test]
    fn conversion_omits_send_to_without_id() {
        let queue = CommandQueue::new();
        let gtag = GtagBackend::new(queue.clone(), None);
        gtag.conversion("order_button_hero").unwrap();
        assert!(queue.snapshot()[0][2].get("send_to").is_none());
    }
}
