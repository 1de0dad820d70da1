//! Core Tab struct, accessors and tab-wide settings.

use std::fmt;

use serde_json::Value;
use tracing::trace;

use crate::browser::options::{Headers, TabOptions, VIEWPORT_FALLBACK, Viewport};
use crate::engine::{Engine, EngineSettings, JsConsole, PageRequest, Size};
use crate::error::{Error, Result};
use crate::har::HarRecorder;
use crate::identifiers::TabUid;
use crate::logging::TabLogger;
use crate::protocol::{SignalSender, WeakSignalSender};
use crate::result::{Delivery, RenderOutput, ResultChannel, ResultReceiver};
use crate::timers::TimerRegistry;

use super::navigation::NavigationState;

// ============================================================================
// Types
// ============================================================================

/// Callback run by the tab with exclusive access to it.
pub type TabCallback = Box<dyn FnOnce(&mut Tab) + Send + 'static>;

/// Callback run when a navigation fails.
pub type ErrorCallback = Box<dyn FnOnce(&mut Tab, Error) + Send + 'static>;

// ============================================================================
// Tab
// ============================================================================

/// Controller for a single engine-hosted page.
///
/// A tab is driven by one event loop: every signal and every callback gets
/// `&mut Tab`, so state is never touched by two flows at once. It delivers
/// exactly one outcome through the [`ResultReceiver`] returned by
/// [`Tab::new`].
pub struct Tab {
    pub(super) engine: Box<dyn Engine>,
    pub(super) har: HarRecorder,
    pub(super) signals: WeakSignalSender,
    pub(super) logger: TabLogger,
    pub(super) default_headers: Headers,
    pub(super) settings: EngineSettings,
    pub(super) closing: bool,
    pub(super) navigation: NavigationState,
    pub(super) timers: TimerRegistry<TabCallback>,
    pub(super) console: Option<JsConsole>,
    pub(super) history: Vec<Option<Value>>,
    pub(super) result: ResultChannel,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("uid", &self.logger.uid())
            .field("closing", &self.closing)
            .field("navigation", &self.navigation)
            .field("timers", &self.timers)
            .field("history", &self.history.len())
            .field("result", &self.result.state())
            .finish_non_exhaustive()
    }
}

impl Tab {
    /// Creates a tab around an engine page.
    ///
    /// `signals` must be the sender whose receiver is later passed to
    /// [`Tab::run`]; timers queue their expiry on it. The tab only keeps a
    /// weak handle, so the channel ends once the owner and the engine drop
    /// their senders.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `options` fail validation.
    pub fn new(
        engine: impl Engine + 'static,
        har: HarRecorder,
        signals: &SignalSender,
        options: TabOptions,
    ) -> Result<(Self, ResultReceiver)> {
        options.validate()?;

        let mut engine: Box<dyn Engine> = Box::new(engine);
        engine.apply_settings(&options.settings);
        engine.set_viewport_size(options.viewport);

        let (result, receiver) = ResultChannel::new(options.uid);
        let logger = TabLogger::new(options.uid, options.verbosity);
        logger.log(2, "tab created");

        let tab = Self {
            engine,
            har,
            signals: signals.downgrade(),
            logger,
            default_headers: options.default_headers,
            settings: options.settings,
            closing: false,
            navigation: NavigationState::Idle,
            timers: TimerRegistry::new(),
            console: None,
            history: Vec::new(),
            result,
        };

        Ok((tab, receiver))
    }
}

// ============================================================================
// Tab - Accessors
// ============================================================================

impl Tab {
    /// Returns the tab identifier.
    #[inline]
    #[must_use]
    pub fn uid(&self) -> TabUid {
        self.logger.uid()
    }

    /// Returns `true` once [`Tab::close`] ran.
    #[inline]
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Returns the engine page.
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Returns the HAR recorder shared with the engine.
    #[inline]
    #[must_use]
    pub fn har_recorder(&self) -> &HarRecorder {
        &self.har
    }

    /// Returns a sender for this tab's signal channel.
    ///
    /// `None` once every other sender was dropped.
    #[inline]
    #[must_use]
    pub fn signal_sender(&self) -> Option<SignalSender> {
        self.signals.upgrade()
    }

    /// Returns the active timer registry.
    #[inline]
    #[must_use]
    pub fn timers(&self) -> &TimerRegistry<TabCallback> {
        &self.timers
    }

    /// Returns the headers attached to new requests.
    #[inline]
    #[must_use]
    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    /// Returns the current engine settings.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Logs through the tab's render log.
    pub fn log(&self, min_level: u8, message: &str) {
        self.logger.log(min_level, message);
    }
}

// ============================================================================
// Tab - Settings
// ============================================================================

impl Tab {
    /// Replaces the headers attached to later requests.
    pub fn set_default_headers(&mut self, headers: impl Into<Headers>) {
        self.default_headers = headers.into();
        self.logger.log(
            2,
            &format!("default headers set ({} entries)", self.default_headers.len()),
        );
    }

    /// Enables or disables image loading for later loads.
    pub fn set_images_enabled(&mut self, enabled: bool) {
        self.settings.auto_load_images = enabled;
        self.engine.apply_settings(&self.settings);
        self.logger.log(2, &format!("images enabled: {enabled}"));
    }

    /// Resizes the viewport and returns the size applied.
    ///
    /// [`Viewport::Full`] measures the current contents, falling back to
    /// 1024x768 when the engine reports an empty size.
    pub fn set_viewport(&mut self, viewport: impl Into<Viewport>) -> Size {
        let size = match viewport.into() {
            Viewport::Fixed(size) => size,
            Viewport::Full => {
                let contents = self.engine.contents_size();
                if contents.is_empty() {
                    self.logger
                        .log(1, "contentsSize method doesn't work; using fallback viewport");
                    VIEWPORT_FALLBACK
                } else {
                    contents
                }
            }
        };

        self.engine.set_viewport_size(size);
        self.logger.log(
            2,
            &format!("viewport size is set to {}x{}", size.width, size.height),
        );
        size
    }

    /// Builds a main-frame request carrying the default headers.
    ///
    /// A `User-Agent` among them also becomes the page's user agent.
    pub(super) fn create_request(&mut self, url: url::Url) -> PageRequest {
        let mut request = PageRequest::new(url);
        for (name, value) in self.default_headers.iter() {
            request.headers.push((name.to_string(), value.to_string()));
            if name.eq_ignore_ascii_case("user-agent") {
                self.engine.set_custom_user_agent(value);
            }
        }
        request
    }
}

// ============================================================================
// Tab - Result Delivery
// ============================================================================

impl Tab {
    /// Delivers the success outcome to the owner.
    ///
    /// A repeated delivery is logged and left to the channel to refuse.
    pub fn return_result(&mut self, output: RenderOutput) -> Delivery {
        self.result.return_result(output)
    }

    /// Delivers the error outcome to the owner.
    pub fn return_error(&mut self, error: Error) -> Delivery {
        self.result.return_error(error)
    }

    /// Returns `true` once an outcome was delivered.
    #[inline]
    #[must_use]
    pub fn result_already_returned(&self) -> bool {
        self.result.already_delivered()
    }
}

// ============================================================================
// Tab - Drop
// ============================================================================

impl Drop for Tab {
    fn drop(&mut self) {
        let aborted = self.timers.cancel_all();
        if aborted > 0 {
            trace!(uid = %self.uid(), timers = aborted, "Timers aborted on drop");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
