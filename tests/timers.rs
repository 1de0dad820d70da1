//! Timers, redirect sweeps and URL-change history.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::harness;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use render_tab::har::{HarRequest, HarResponse};
use render_tab::{HarEntry, HttpMethod, NavigationRequest, RedirectPolicy, RenderOutput, Signal};
use serde_json::json;
use url::Url;

fn text(tab: &mut render_tab::Tab, value: &str) {
    tab.return_result(RenderOutput::Text(value.to_string()));
}

// ============================================================================
// Expiry
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_after_load_delivers_through_run() {
    let mut h = harness();

    h.tab
        .go(
            NavigationRequest::get("http://example.com/"),
            |tab| {
                tab.wait(Duration::from_millis(500), |tab| text(tab, "waited"), None);
            },
            |tab, error| {
                tab.return_error(error);
            },
        )
        .unwrap();
    h.sender.load_finished(true);

    h.tab.run(&mut h.signals).await;

    match h.result.recv().await {
        Ok(RenderOutput::Text(value)) => assert_eq!(value, "waited"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(h.tab.timers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_expired_timer_is_removed_before_callback() {
    let mut h = harness();
    let seen = Arc::new(Mutex::new(None));
    let seen_in_callback = Arc::clone(&seen);

    let handle = h.tab.wait(
        Duration::from_millis(10),
        move |tab| {
            *seen_in_callback.lock() = Some(tab.timers().len());
        },
        Some(RedirectPolicy::Cancel),
    );

    let signal = h.signals.recv().await.unwrap();
    assert_eq!(signal, Signal::TimerExpired(handle.id));
    h.tab.dispatch(signal);

    assert_eq!(*seen.lock(), Some(0));
    assert!(!h.tab.timers().cancels_on_redirect(handle.id));
}

// ============================================================================
// Redirect Sweep
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_url_change_cancels_redirect_timer() {
    let mut h = harness();

    let handle = h.tab.wait(
        Duration::from_secs(1),
        |tab| text(tab, "should not fire"),
        Some(RedirectPolicy::Cancel),
    );
    h.tab.dispatch(Signal::UrlChanged {
        url: "http://example.com/next".into(),
    });

    assert!(!h.tab.timers().is_active(handle.id));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.signals.try_recv(), None);
    assert!(!h.tab.result_already_returned());
}

#[tokio::test(start_paused = true)]
async fn test_url_change_runs_redirect_callback() {
    let mut h = harness();

    h.tab.wait(
        Duration::from_secs(1),
        |tab| text(tab, "timer"),
        Some(RedirectPolicy::call(|tab| text(tab, "redirected"))),
    );
    h.tab.dispatch(Signal::UrlChanged {
        url: "http://example.com/next".into(),
    });

    match h.result.try_recv() {
        Some(Ok(RenderOutput::Text(value))) => assert_eq!(value, "redirected"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_plain_timer_survives_url_change() {
    let mut h = harness();

    let handle = h
        .tab
        .wait(Duration::from_millis(100), |tab| text(tab, "fired"), None);
    h.tab.dispatch(Signal::UrlChanged {
        url: "http://example.com/next".into(),
    });
    assert!(h.tab.timers().is_active(handle.id));

    let signal = h.signals.recv().await.unwrap();
    h.tab.dispatch(signal);
    assert!(matches!(h.result.try_recv(), Some(Ok(RenderOutput::Text(_)))));
}

#[tokio::test(start_paused = true)]
async fn test_sweep_runs_callbacks_in_schedule_order() {
    let mut h = harness();
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        h.tab.wait(
            Duration::from_secs(5),
            |_| {},
            Some(RedirectPolicy::call(move |_| order.lock().push(name))),
        );
    }
    h.tab
        .wait(Duration::from_secs(5), |_| {}, Some(RedirectPolicy::Cancel));

    h.tab.dispatch(Signal::UrlChanged {
        url: "http://example.com/next".into(),
    });

    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    assert!(h.tab.timers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_redirect_callback_can_schedule_new_timer() {
    let mut h = harness();

    let original = h.tab.wait(
        Duration::from_secs(5),
        |tab| text(tab, "original"),
        Some(RedirectPolicy::call(|tab| {
            tab.wait(
                Duration::from_millis(10),
                |tab| text(tab, "rescheduled"),
                Some(RedirectPolicy::Cancel),
            );
        })),
    );
    h.tab.dispatch(Signal::UrlChanged {
        url: "http://example.com/next".into(),
    });

    // The timer scheduled during the sweep is not swept with it.
    assert!(!h.tab.timers().is_active(original.id));
    assert_eq!(h.tab.timers().len(), 1);
    assert_eq!(h.tab.timers().redirect_snapshot().len(), 1);
    assert!(h.result.try_recv().is_none());

    let signal = h.signals.recv().await.unwrap();
    assert!(matches!(signal, Signal::TimerExpired(_)));
    h.tab.dispatch(signal);

    match h.result.try_recv() {
        Some(Ok(RenderOutput::Text(value))) => assert_eq!(value, "rescheduled"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(h.tab.timers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_drops_pending_timers() {
    let mut h = harness();
    h.tab
        .wait(Duration::from_millis(100), |tab| text(tab, "late"), None);

    h.tab.close();
    assert!(h.tab.timers().is_empty());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(h.signals.try_recv(), None);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_tab_aborts_pending_timers() {
    let mut h = harness();
    h.tab
        .wait(Duration::from_millis(100), |tab| text(tab, "late"), None);
    h.tab.wait(
        Duration::from_millis(200),
        |tab| text(tab, "later"),
        Some(RedirectPolicy::Cancel),
    );

    drop(h.tab);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(h.signals.try_recv(), None);
    assert!(!h.sender.is_closed());
}

// ============================================================================
// History
// ============================================================================

fn entry(url: &str) -> HarEntry {
    let url = Url::parse(url).unwrap();
    HarEntry::new(
        HarRequest::new(HttpMethod::Get, &url),
        HarResponse::new(302, "Found", "text/html"),
    )
    .with_private("cached", json!(false))
}

#[tokio::test]
async fn test_history_records_matching_entry() {
    let mut h = harness();
    h.har.record(entry("http://example.com/?page=2"));

    h.tab.dispatch(Signal::UrlChanged {
        url: "http://example.com/?page=2".into(),
    });
    h.tab.dispatch(Signal::UrlChanged {
        url: "http://other.com/".into(),
    });

    let history = h.tab.history();
    assert_eq!(history.len(), 2);

    let first = history[0].as_ref().unwrap();
    assert_eq!(first["request"]["url"], "http://example.com/?page=2");
    assert!(first["request"].get("queryString").is_none());
    assert!(first.get("_cached").is_none());
    assert_eq!(first["response"]["status"], 302);

    assert_eq!(history[1], None);
}

#[tokio::test]
async fn test_history_snapshot_is_a_copy() {
    let mut h = harness();
    h.har.record(entry("http://example.com/?q=1"));
    h.tab.dispatch(Signal::UrlChanged {
        url: "http://example.com/?q=1".into(),
    });

    let mut snapshot = h.tab.history();
    snapshot.clear();
    assert_eq!(h.tab.history().len(), 1);
}

#[tokio::test]
async fn test_closing_drops_url_changes() {
    let mut h = harness();
    h.tab.close();
    h.tab.dispatch(Signal::UrlChanged {
        url: "http://example.com/".into(),
    });
    assert!(h.tab.history().is_empty());
}
