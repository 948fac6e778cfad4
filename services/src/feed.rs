//! Live attendance events, one topic per session.
//!
//! Publishing happens after the record is durable, so a subscriber that
//! misses events can always rebuild its view from the ledger.

use db::models::attendance_record::Model as AttendanceRecord;
use serde::Serialize;
use util::feed::FeedManager;

pub type AttendanceFeed = FeedManager<i64, AttendanceMarked>;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceMarked {
    pub session_id: i64,
    pub record: AttendanceRecord,
    /// Records in the session after this one was committed.
    pub count: u64,
}

impl AttendanceMarked {
    pub const NAME: &'static str = "attendance.marked";
}

/// Publishes `event` on its session's topic.
pub async fn publish_marked(feed: &AttendanceFeed, event: AttendanceMarked) {
    let session_id = event.session_id;
    let delivered = feed.publish(&session_id, event).await;
    tracing::debug!(session_id, delivered, "published attendance event");
}
