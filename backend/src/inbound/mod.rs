//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! REST handlers live under [`http`]; the realtime channel under [`ws`].

pub mod http;
pub mod ws;
