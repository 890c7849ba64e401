//! One page lifecycle: backends chosen from config, attribution captured on
//! load, page views on navigation, scroll milestones per logical page.

use std::sync::Arc;

use rosetrack_common::AttributionParams;

use crate::attribution::{self, AttributionCapture};
use crate::backend::{
    Backend, CommandQueue, ConsoleBackend, ConversionChannel, FacebookPixel, GtagBackend,
};
use crate::beacon::PixelBeacon;
use crate::click::{ClickOutcome, ClickTracker, TrackedLink};
use crate::config::AnalyticsConfig;
use crate::conversion::ConversionReporter;
use crate::emitter::EventEmitter;
use crate::newsletter::{NewsletterTracker, SignupError};
use crate::page_view::{PageViewReporter, RouteEvent, page_url};
use crate::scroll::{Clock, ScrollDepthMonitor, ScrollSample};
use crate::storage::SessionStore;

/// Path plus query of `location`, the form page views are reported in.
fn page_path(location: &str) -> String {
    attribution::parse_location(location).map_or_else(
        || location.to_string(),
        |url| page_url(url.path(), url.query().unwrap_or("")),
    )
}

pub struct Analytics {
    data_layer: CommandQueue,
    pixel_queue: Option<CommandQueue>,
    store: Arc<dyn SessionStore>,
    attribution: AttributionParams,
    page_views: PageViewReporter,
    conversions: Arc<ConversionReporter>,
    clicks: ClickTracker,
    newsletter: NewsletterTracker,
    scroll: ScrollDepthMonitor,
    beacon: PixelBeacon,
    current_page: String,
}

impl Analytics {
    /// Set up analytics for a full page load at `location`.
    ///
    /// Captures attribution and reports the initial page view before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable or the pixel base url
    /// is not absolute.
    pub fn init(
        config: &AnalyticsConfig,
        location: &str,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let beacon = match config.pixel_base_url.as_deref() {
            Some(base) => PixelBeacon::with_base(base)?,
            None => PixelBeacon::relative(),
        };

        let data_layer = CommandQueue::new();
        let mut emitter = EventEmitter::default();
        let mut channels: Vec<Arc<dyn ConversionChannel>> = Vec::new();

        if config.measurement_id.is_some() {
            let gtag = Arc::new(GtagBackend::new(
                data_layer.clone(),
                config.conversion_id.clone(),
            ));
            emitter.register(gtag.clone());
            if config.conversion_id.is_some() {
                channels.push(gtag);
            }
        }

        let pixel_queue = match config.facebook_pixel.as_deref() {
            Some(id) => {
                let queue = CommandQueue::new();
                let pixel = FacebookPixel::new(id, queue.clone());
                match pixel.init() {
                    Ok(()) => channels.push(Arc::new(pixel)),
                    Err(e) => tracing::warn!("facebook pixel not registered: {e:#}"),
                }
                Some(queue)
            }
            None => None,
        };

        if !config.environment.is_production() {
            let console = Arc::new(ConsoleBackend);
            emitter.register(console.clone() as Arc<dyn Backend>);
            channels.push(console);
        }

        let emitter = Arc::new(emitter);
        tracing::info!(
            backends = emitter.backend_count(),
            conversion_channels = channels.len(),
            environment = ?config.environment,
            "analytics initialized"
        );

        let attribution =
            AttributionCapture::new(emitter.clone(), store.clone()).capture(location);

        let page_views = PageViewReporter::new(
            emitter.clone(),
            config.measurement_id.clone().unwrap_or_default(),
        );
        let current_page = page_path(location);
        page_views.report_page_view(&current_page);

        let conversions = Arc::new(ConversionReporter::new(emitter.clone(), channels));
        let scroll = ScrollDepthMonitor::new(
            emitter.clone(),
            clock,
            &config.scroll_thresholds,
            config.scroll_throttle(),
        );

        Ok(Self {
            data_layer,
            pixel_queue,
            store,
            attribution,
            page_views,
            clicks: ClickTracker::new(emitter.clone(), conversions.clone()),
            conversions,
            newsletter: NewsletterTracker::new(emitter),
            scroll,
            beacon,
            current_page,
        })
    }

    /// Forward a navigation signal. A completed route reports a page view
    /// and re-arms every scroll threshold. Returns whether it did.
    pub fn on_route_event(&mut self, event: &RouteEvent) -> bool {
        let Some(url) = self.page_views.on_route_event(event) else {
            return false;
        };
        self.current_page = url.to_string();
        self.scroll.reset();
        true
    }

    pub fn on_scroll(&mut self, sample: ScrollSample) -> Vec<u8> {
        self.scroll.on_scroll(sample)
    }

    /// Attribution is read from the page currently shown, not the landing url.
    pub fn click(&self, link: &TrackedLink) -> ClickOutcome {
        let attribution = attribution::extract(&self.current_page);
        self.clicks.click(link, &attribution)
    }

    pub fn report_conversion(&self, name: &str) {
        self.conversions.report_conversion(name);
    }

    /// # Errors
    ///
    /// See [`NewsletterTracker::submitted`].
    pub fn newsletter_submitted<F>(&self, email: &str, submit: F) -> Result<(), SignupError>
    where
        F: FnOnce(&str) -> anyhow::Result<()>,
    {
        self.newsletter.submitted(email, submit)
    }

    /// Pixel fallback url for the current page.
    pub fn pixel_url(&self, timestamp_ms: i64) -> String {
        self.beacon.url(&self.current_page, timestamp_ms)
    }

    /// Attribution captured when the page loaded.
    pub const fn attribution(&self) -> &AttributionParams {
        &self.attribution
    }

    /// Attribution kept in session storage, possibly from an earlier page.
    pub fn stored_attribution(&self) -> Option<AttributionParams> {
        attribution::stored(self.store.as_ref())
    }

    pub fn current_page(&self) -> &str {
        &self.current_page
    }

    pub fn pending_scroll_thresholds(&self) -> Vec<u8> {
        self.scroll.pending()
    }

    /// Commands queued for the Google tag, oldest first.
    pub const fn data_layer(&self) -> &CommandQueue {
        &self.data_layer
    }

    /// Commands queued for the Facebook pixel, when one is configured.
    pub const fn facebook_queue(&self) -> Option<&CommandQueue> {
        self.pixel_queue.as_ref()
    }
}
