use tokio::sync::watch;

pub const VIEWPORT_MARGIN: u32 = 120;
pub const MIN_CHART_WIDTH: u32 = 600;
pub const MAX_CHART_WIDTH: u32 = 1400;
/// Width used before any viewport size is known.
pub const INITIAL_CHART_WIDTH: u32 = 900;

/// Chart width for a viewport: margin removed, clamped to [600, 1400].
pub fn responsive_width(viewport_width: u32) -> u32 {
    viewport_width
        .saturating_sub(VIEWPORT_MARGIN)
        .clamp(MIN_CHART_WIDTH, MAX_CHART_WIDTH)
}

/// Publishes viewport width changes to mounted charts.
#[derive(Debug)]
pub struct Viewport {
    tx: watch::Sender<u32>,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        let (tx, _rx) = watch::channel(width);
        Self { tx }
    }

    pub fn width(&self) -> u32 {
        *self.tx.borrow()
    }

    /// Record a resize. Every attached subscription sees it on its next poll.
    pub fn resize(&self, width: u32) {
        let previous = self.tx.send_replace(width);
        if previous != width {
            tracing::debug!(previous, width, listeners = self.listener_count(), "Viewport resized");
        }
    }

    pub fn subscribe(&self) -> ResizeSubscription {
        let mut rx = self.tx.subscribe();
        let viewport_width = *rx.borrow_and_update();
        ResizeSubscription { rx, viewport_width }
    }

    /// Attached subscriptions; drops to zero once every chart is torn down.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(INITIAL_CHART_WIDTH + VIEWPORT_MARGIN)
    }
}

/// One chart's attachment to the viewport. Dropping it detaches the
/// listener, on every exit path.
#[derive(Debug)]
pub struct ResizeSubscription {
    rx: watch::Receiver<u32>,
    viewport_width: u32,
}

impl ResizeSubscription {
    /// Apply a pending resize, if any. Returns the new chart width.
    pub fn poll(&mut self) -> Option<u32> {
        if !self.rx.has_changed().unwrap_or(false) {
            return None;
        }
        self.viewport_width = *self.rx.borrow_and_update();
        Some(self.chart_width())
    }

    /// Wait for the next resize. `None` once the viewport is gone.
    pub async fn changed(&mut self) -> Option<u32> {
        self.rx.changed().await.ok()?;
        self.viewport_width = *self.rx.borrow_and_update();
        Some(self.chart_width())
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn chart_width(&self) -> u32 {
        responsive_width(self.viewport_width)
    }
}
