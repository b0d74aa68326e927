mod engine;
mod input;

pub use engine::{TimeTracker, TrackerMode};
pub(crate) use engine::timestamp;
pub use input::CountdownInput;
pub(crate) use input::parse_leading_uint;
