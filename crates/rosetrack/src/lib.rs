//! Client-side analytics core for the storefront page.
//!
//! Everything the page reports flows through one [`emitter::EventEmitter`],
//! which fans events out to the backends chosen at startup. The
//! [`session::Analytics`] facade wires the reporters together for a single
//! page lifecycle; the individual reporters stay usable on their own.

pub mod attribution;
pub mod backend;
pub mod beacon;
pub mod click;
pub mod config;
pub mod conversion;
pub mod emitter;
pub mod newsletter;
pub mod page_view;
pub mod scroll;
pub mod session;
pub mod storage;

pub use rosetrack_common::{AttributionParams, Event, EventParams};
