pub mod attribution;
pub mod event;
pub mod pixel;

pub use attribution::AttributionParams;
pub use event::{Event, EventParams};
pub use pixel::PixelRequestRecord;
