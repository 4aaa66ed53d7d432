//! The job and bid state machines, hoisted out of any transport or storage
//! concern so they can be checked in isolation.

pub mod bids;
pub mod jobs;

/// Outcome of a legal transition request. Asking for the current status is
/// always allowed and changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    NoOp,
    Move,
}
