//! Screenshots, frame trees and document snapshots.

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use common::{FakeFrame, PAGE_BODY, TOP_BAND, harness, harness_with};
use pretty_assertions::assert_eq;
use render_tab::har::{ON_HTML_RENDERED, ON_IFRAMES_RENDERED, ON_PNG_RENDERED, ON_SCREENSHOT_PREPARED};
use render_tab::{FrameDescription, Size, TabOptions, Viewport};

fn png_size(png: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory(png).unwrap();
    (image.width(), image.height())
}

// ============================================================================
// Screenshot
// ============================================================================

#[tokio::test]
async fn test_screenshot_uses_viewport_size() {
    let mut h = harness_with(FakeFrame::new("about:blank"), TabOptions::new().with_viewport(400, 300));

    let png = h.tab.screenshot().capture().unwrap();

    assert_eq!(png_size(&png), (400, 300));
    assert!(h.har.timing(ON_SCREENSHOT_PREPARED).is_some());
    assert!(h.har.timing(ON_PNG_RENDERED).is_some());
}

#[tokio::test]
async fn test_screenshot_width_preserves_aspect() {
    let mut h = harness();

    let png = h.tab.screenshot().width(200).capture().unwrap();

    // 1024x768 scaled to 200 wide.
    assert_eq!(png_size(&png), (200, 150));
}

#[tokio::test]
async fn test_screenshot_width_and_height_crop() {
    let mut h = harness();

    let png = h.tab.screenshot().width(200).height(100).capture().unwrap();

    assert_eq!(png_size(&png), (200, 100));

    // The top band covers rows 0..15 of the 200x150 scaled image, so only a
    // crop anchored at the top keeps it.
    let image = image::load_from_memory(&png).unwrap().to_rgba8();
    for x in [0, 100, 199] {
        assert_eq!(*image.get_pixel(x, 0), TOP_BAND);
        assert_eq!(*image.get_pixel(x, 99), PAGE_BODY);
    }
}

#[tokio::test]
async fn test_screenshot_height_without_width_is_ignored() {
    let mut h = harness_with(FakeFrame::new("about:blank"), TabOptions::new().with_viewport(64, 48));

    let png = h.tab.screenshot().height(10).capture().unwrap();

    assert_eq!(png_size(&png), (64, 48));
}

#[tokio::test]
async fn test_screenshot_base64() {
    let mut h = harness_with(FakeFrame::new("about:blank"), TabOptions::new().with_viewport(32, 32));

    let encoded = h.tab.screenshot().width(16).base64().capture().unwrap();
    let png = Base64Standard.decode(&encoded).unwrap();

    assert_eq!(png_size(&png), (16, 16));
}

// ============================================================================
// Viewport
// ============================================================================

#[tokio::test]
async fn test_set_viewport_full_uses_contents_size() {
    let mut h = harness();
    h.engine.lock().contents_size = Size::new(1024, 4000);

    let applied = h.tab.set_viewport(Viewport::Full);

    assert_eq!(applied, Size::new(1024, 4000));
    assert_eq!(h.engine.lock().viewports.last(), Some(&Size::new(1024, 4000)));
}

#[tokio::test]
async fn test_set_viewport_full_falls_back_when_unmeasured() {
    let mut h = harness();

    let applied = h.tab.set_viewport("full".parse::<Viewport>().unwrap());

    assert_eq!(applied, render_tab::browser::VIEWPORT_FALLBACK);
}

#[tokio::test]
async fn test_set_viewport_fixed_changes_screenshot() {
    let mut h = harness();

    h.tab.set_viewport(Size::new(320, 240));
    let png = h.tab.screenshot().capture().unwrap();

    assert_eq!(png_size(&png), (320, 240));
}

// ============================================================================
// Frame Tree
// ============================================================================

fn page_with_frames() -> FakeFrame {
    FakeFrame::new("http://example.com/")
        .with_html("<iframe></iframe><iframe></iframe>")
        .with_child(FakeFrame::new("http://ads.com/").named("ads"))
        .with_child(
            FakeFrame::new("http://widget.com/")
                .named("widget")
                .with_child(FakeFrame::new("http://widget.com/inner").named("inner")),
        )
}

#[tokio::test]
async fn test_frame_tree_with_children() {
    let h = harness_with(page_with_frames(), TabOptions::new());

    let tree = h.tab.frame_tree(true, true);

    let children = tree.child_frames.as_ref().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].frame_name.as_deref(), Some("ads"));
    assert_eq!(children[1].child_frames.as_ref().unwrap().len(), 1);
    assert_eq!(tree.frame_count(), 4);
    assert_eq!(tree.html.as_deref(), Some("<iframe></iframe><iframe></iframe>"));
    assert!(h.har.timing(ON_IFRAMES_RENDERED).is_some());
}

#[tokio::test]
async fn test_frame_tree_without_children_has_no_child_fields() {
    let h = harness_with(page_with_frames(), TabOptions::new());

    let tree = h.tab.frame_tree(false, false);
    let value = serde_json::to_value(&tree).unwrap();

    assert!(value.get("childFrames").is_none());
    assert!(value.get("frameName").is_none());
    assert!(value.get("html").is_none());
    assert_eq!(value["url"], "http://example.com/");
    assert_eq!(value["requestedUrl"], "http://example.com/");
    assert_eq!(value["geometry"], serde_json::json!([0, 0, 1024, 768]));
}

#[tokio::test]
async fn test_frame_tree_leaf_has_empty_child_list() {
    let h = harness();

    let value = serde_json::to_value(h.tab.frame_tree(true, false)).unwrap();

    assert_eq!(value["childFrames"], serde_json::json!([]));
    assert_eq!(value["frameName"], "");
}

#[tokio::test]
async fn test_frame_tree_roundtrips_through_json() {
    let h = harness_with(page_with_frames(), TabOptions::new());

    let tree = h.tab.frame_tree(true, false);
    let parsed: FrameDescription = serde_json::from_value(serde_json::to_value(&tree).unwrap()).unwrap();

    assert_eq!(parsed, tree);
}

// ============================================================================
// Snapshots
// ============================================================================

#[tokio::test]
async fn test_html_stamps_marker() {
    let h = harness_with(FakeFrame::new("http://example.com/").with_html("<p/>"), TabOptions::new());

    assert_eq!(h.tab.html(), "<p/>");
    assert!(h.har.timing(ON_HTML_RENDERED).is_some());
}

#[tokio::test]
async fn test_har_snapshot_has_markers() {
    let h = harness();
    h.tab.html();

    let har = h.tab.har();

    assert_eq!(har["log"]["version"], "1.2");
    assert!(har["log"]["pages"][0]["pageTimings"].get(ON_HTML_RENDERED).is_some());
    assert_eq!(har["log"]["entries"], serde_json::json!([]));
}
