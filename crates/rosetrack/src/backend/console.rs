use rosetrack_common::EventParams;

use super::{Backend, ConversionChannel};

/// Development adapter that writes every call to the log instead of a
/// network backend. Registered only outside production.
pub struct ConsoleBackend;

impl Backend for ConsoleBackend {
    fn name(&self) -> &'static str {
        "console"
    }

    fn configure(&self, id: &str, page_path: &str) -> anyhow::Result<()> {
        tracing::info!(target: "rosetrack::console", id, page_path, "page view tracked");
        Ok(())
    }

    fn event(&self, name: &str, params: &EventParams) -> anyhow::Result<()> {
        tracing::info!(
            target: "rosetrack::console",
            action = name,
            category = %params.event_category,
            label = params.event_label.as_deref(),
            value = params.value,
            "event tracked"
        );
        Ok(())
    }
}

impl ConversionChannel for ConsoleBackend {
    fn name(&self) -> &'static str {
        "console"
    }

    fn conversion(&self, name: &str) -> anyhow::Result<()> {
        tracing::info!(target: "rosetrack::console", name, "conversion tracked");
        Ok(())
    }
}
