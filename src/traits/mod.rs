pub mod engine;
pub mod entity;

pub use engine::{RtlEngine, SpiceEngine};
pub use entity::{Entity, IoConditionHook};
