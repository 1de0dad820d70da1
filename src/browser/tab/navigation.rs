//! Tab navigation and load-finished classification.
//!
//! The engine reports the end of every navigation attempt with an `ok`
//! flag, and keeps a separate page-level error slot. Neither is reliable
//! alone, so each load-finished signal is classified from both:
//!
//! | ok | error slot | classification |
//! |----|------------|----------------|
//! | true | empty | [`LoadClassification::Success`] |
//! | false | empty | [`LoadClassification::PossibleRedirect`] |
//! | true | set | [`LoadClassification::Error`] |
//! | false | set | [`LoadClassification::Error`] |
//!
//! A possible redirect does nothing and waits for the next signal. If the
//! engine never sends one, the tab never delivers: owners must put their
//! own timeout around the result receiver.

use std::fmt;

use tracing::debug;
use url::Url;

use crate::engine::{ErrorInfo, FetchReply, HttpMethod};
use crate::error::{Error, Result};
use crate::har::ON_STARTED;

use super::{ErrorCallback, Tab, TabCallback};

// ============================================================================
// NavigationRequest
// ============================================================================

/// Where and how to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Target URL.
    pub url: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// When set, `url` is fetched manually and rendered as if served from here.
    pub base_url: Option<String>,
}

impl NavigationRequest {
    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            body: None,
            base_url: None,
        }
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

// ============================================================================
// LoadClassification
// ============================================================================

/// Interpretation of one load-finished signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadClassification {
    /// Page loaded.
    Success,
    /// Not ok, but no error either: assume a redirect and wait.
    PossibleRedirect,
    /// The engine recorded a page-level error.
    Error(ErrorInfo),
}

impl LoadClassification {
    /// Classifies an `ok` flag against the engine's error slot.
    #[must_use]
    pub fn classify(ok: bool, error: Option<ErrorInfo>) -> Self {
        match (ok, error) {
            (true, None) => Self::Success,
            (false, None) => Self::PossibleRedirect,
            (_, Some(info)) => Self::Error(info),
        }
    }

    /// Returns `true` for outcomes that end the navigation.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::PossibleRedirect)
    }
}

// ============================================================================
// NavigationState
// ============================================================================

pub(crate) struct NavigationCallbacks {
    on_success: TabCallback,
    on_failure: ErrorCallback,
}

/// Navigation progress of a tab.
pub(crate) enum NavigationState {
    /// No navigation issued yet.
    Idle,
    /// Base-URL fetch in flight; load-finished is not awaited yet.
    Fetching {
        url: Url,
        base_url: Url,
        callbacks: NavigationCallbacks,
    },
    /// Load issued; waiting for a terminal load-finished.
    Loading {
        url: Url,
        callbacks: NavigationCallbacks,
    },
    /// Callbacks already ran for this URL.
    Done { url: Url },
}

impl fmt::Debug for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Fetching { url, base_url, .. } => f
                .debug_struct("Fetching")
                .field("url", &url.as_str())
                .field("base_url", &base_url.as_str())
                .finish_non_exhaustive(),
            Self::Loading { url, .. } => f
                .debug_struct("Loading")
                .field("url", &url.as_str())
                .finish_non_exhaustive(),
            Self::Done { url } => f.debug_struct("Done").field("url", &url.as_str()).finish(),
        }
    }
}

impl NavigationState {
    fn is_pending(&self) -> bool {
        matches!(self, Self::Fetching { .. } | Self::Loading { .. })
    }
}

// ============================================================================
// Tab - Navigation
// ============================================================================

impl Tab {
    /// Navigates the main frame, like typing a URL and pressing Enter.
    ///
    /// `on_success` or `on_failure` runs at most once, when a load-finished
    /// signal is classified as terminal. They usually end by calling
    /// [`Tab::return_result`] or [`Tab::return_error`].
    ///
    /// With a base URL, `request.url` is fetched first and its body is set
    /// as the document, resolved against the base URL. A fetch error is only
    /// logged; the body is set regardless.
    ///
    /// Issuing a second navigation while one is pending drops the first
    /// navigation's callbacks.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSupported`] for a non-GET request with a base URL
    /// - [`Error::InvalidArgument`] if a URL does not parse
    ///
    /// Nothing is sent to the engine when an error is returned.
    pub fn go<S, F>(&mut self, request: NavigationRequest, on_success: S, on_failure: F) -> Result<()>
    where
        S: FnOnce(&mut Tab) + Send + 'static,
        F: FnOnce(&mut Tab, Error) + Send + 'static,
    {
        self.har.store_timing(ON_STARTED);

        if request.base_url.is_some() && request.method != HttpMethod::Get {
            return Err(Error::not_supported(format!(
                "{} navigation with a base URL",
                request.method
            )));
        }

        let url = parse_url(&request.url)?;
        let base_url = request.base_url.as_deref().map(parse_url).transpose()?;

        if self.navigation.is_pending() {
            self.logger.log(
                1,
                "navigation issued while another is pending; previous callbacks dropped",
            );
        }

        let callbacks = NavigationCallbacks {
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        };

        debug!(uid = %self.uid(), url = %url, method = %request.method, "Navigating");

        match base_url {
            Some(base_url) => {
                let mut page_request = self.create_request(url.clone());
                page_request.from_main_frame = true;
                self.navigation = NavigationState::Fetching {
                    url,
                    base_url,
                    callbacks,
                };
                self.engine.fetch(page_request);
            }
            None => {
                let page_request = self.create_request(url.clone());
                self.navigation = NavigationState::Loading { url, callbacks };
                self.engine
                    .load(page_request, request.method, request.body);
            }
        }

        Ok(())
    }

    /// Stops loading and cancels pending refreshes and scheduled redirects.
    pub fn stop_loading(&mut self) {
        self.logger.log(2, "stop loading");
        self.engine.stop_scheduled_refresh();
        self.engine.stop();
    }

    /// Closes the tab.
    ///
    /// Later load-finished signals are ignored, active timers are dropped
    /// and the engine page is released. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.closing {
            return;
        }
        self.closing = true;

        self.engine.stop_scheduled_refresh();
        self.engine.stop();
        let cancelled = self.timers.cancel_all();
        self.engine.close();

        debug!(uid = %self.uid(), cancelled_timers = cancelled, "Tab closed");
    }

    /// Handles completion of the base-URL fetch.
    pub(super) fn on_fetch_finished(&mut self, reply: FetchReply) {
        let state = std::mem::replace(&mut self.navigation, NavigationState::Idle);
        let NavigationState::Fetching {
            url,
            base_url,
            callbacks,
        } = state
        else {
            self.navigation = state;
            debug!(uid = %self.uid(), "Fetch finished without a pending base URL navigation");
            return;
        };

        self.logger.log(2, "baseurl_request_finished");
        self.navigation = NavigationState::Loading {
            url: url.clone(),
            callbacks,
        };

        let FetchReply {
            data,
            content_type,
            error,
        } = reply;
        self.engine
            .set_content(data, content_type.as_deref().unwrap_or_default(), base_url);

        if let Some(error) = error {
            self.logger
                .log(1, &format!("Error loading {url}: {error}"));
        }
    }

    /// Handles a load-finished signal.
    pub(super) fn on_load_finished(&mut self, ok: bool) {
        if self.closing {
            self.logger
                .log(2, "loadFinished is ignored because tab is closing");
            return;
        }

        if self.logger.enabled(4) {
            self.logger.log(4, &format!("mainFrame().loadFinished {ok}"));
        }

        let url = match &self.navigation {
            NavigationState::Loading { url, .. } | NavigationState::Done { url } => url.clone(),
            NavigationState::Idle | NavigationState::Fetching { .. } => {
                debug!(uid = %self.uid(), ok, "loadFinished without a pending load");
                return;
            }
        };

        match LoadClassification::classify(ok, self.engine.error_info()) {
            LoadClassification::PossibleRedirect => {
                // Assumes another loadFinished follows the redirect. When
                // it doesn't (e.g. a bad Content-Type), only the owner's
                // timeout ends the render.
                self.logger
                    .log(2, "Redirect or other non-fatal error detected");
            }
            LoadClassification::Success => {
                self.logger.log(2, "loadFinished: ok");
                if let Some(callbacks) = self.take_callbacks() {
                    (callbacks.on_success)(self);
                }
            }
            LoadClassification::Error(info) => {
                let message = if ok {
                    format!("loadFinished: {info}")
                } else {
                    format!("loadFinished: unknown error ({info})")
                };
                self.logger.log(1, &message);
                if let Some(callbacks) = self.take_callbacks() {
                    (callbacks.on_failure)(self, Error::load_failed(url, info.to_string()));
                }
            }
        }
    }

    fn take_callbacks(&mut self) -> Option<NavigationCallbacks> {
        let state = std::mem::replace(&mut self.navigation, NavigationState::Idle);
        match state {
            NavigationState::Loading { url, callbacks } => {
                self.navigation = NavigationState::Done { url };
                Some(callbacks)
            }
            other => {
                self.navigation = other;
                None
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::invalid_argument(format!("Invalid URL {raw:?}: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
