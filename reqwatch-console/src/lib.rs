//! reqwatch-console library - polling admin monitor
//!
//! Watches the meeting-request store through the admin read API and surfaces
//! rows that arrived while the console is open: each poll tick fetches the
//! full record set, diffs it against every id seen so far this session,
//! highlights the newcomers, and plays a short chime.
//!
//! The view owns all of its state. Nothing is persisted across runs; closing
//! the console and reopening it starts a fresh session with an empty
//! observed set.

pub mod detector;
pub mod fetch;
pub mod highlight;
pub mod notify;
pub mod poll;
pub mod render;
pub mod session;
