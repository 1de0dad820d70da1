//! Frame tree description.

use serde::{Deserialize, Serialize};

use crate::engine::{Frame, Geometry};
use crate::har::ON_IFRAMES_RENDERED;

use super::Tab;

// ============================================================================
// FrameDescription
// ============================================================================

/// Snapshot of a frame and, optionally, its descendants.
///
/// `frame_name` and `child_frames` are both present when children were
/// requested (an empty list for leaf frames) and both absent otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDescription {
    /// Current URL.
    pub url: String,

    /// URL originally requested for the frame.
    pub requested_url: String,

    /// Position and size, serialized as `[x, y, width, height]`.
    pub geometry: Geometry,

    /// Document title.
    pub title: String,

    /// Serialized document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Frame name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_name: Option<String>,

    /// Child frames in document order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_frames: Option<Vec<FrameDescription>>,
}

impl FrameDescription {
    /// Describes `frame`, recursing into children if asked.
    #[must_use]
    pub fn describe(frame: &dyn Frame, include_children: bool, include_html: bool) -> Self {
        let (frame_name, child_frames) = if include_children {
            let children = frame
                .child_frames()
                .into_iter()
                .map(|child| Self::describe(child, true, include_html))
                .collect();
            (Some(frame.name()), Some(children))
        } else {
            (None, None)
        };

        Self {
            url: frame.url(),
            requested_url: frame.requested_url(),
            geometry: frame.geometry(),
            title: frame.title(),
            html: include_html.then(|| frame.to_html()),
            frame_name,
            child_frames,
        }
    }

    /// Number of frames in this subtree, including this one.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        1 + self
            .child_frames
            .iter()
            .flatten()
            .map(Self::frame_count)
            .sum::<usize>()
    }
}

// ============================================================================
// Tab - Frames
// ============================================================================

impl Tab {
    /// Describes the main frame, and every descendant if `include_children`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let tree = tab.frame_tree(true, false);
    /// for child in tree.child_frames.iter().flatten() {
    ///     println!("{} -> {}", child.frame_name.as_deref().unwrap_or(""), child.url);
    /// }
    /// ```
    pub fn frame_tree(&self, include_children: bool, include_html: bool) -> FrameDescription {
        self.logger.log(3, "getting iframes");
        let description =
            FrameDescription::describe(self.engine.main_frame(), include_children, include_html);
        self.har.store_timing(ON_IFRAMES_RENDERED);
        description
    }
}
