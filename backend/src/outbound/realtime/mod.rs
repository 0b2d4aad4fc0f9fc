//! In-process realtime fan-out.

mod hub;

pub use hub::RealtimeHub;
