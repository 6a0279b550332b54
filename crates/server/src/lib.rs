//! Server crate for the ReelFeed home screen.
//!
//! This crate contains the orchestrator that fetches candidates and the
//! user's profile, then assembles every ranked view of the home feed.

pub mod clock;
pub mod orchestrator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use orchestrator::{FeedOrchestrator, HomeFeed};
