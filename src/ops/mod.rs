pub mod clip_ops;
pub mod gaps;
pub mod overlap;
pub mod snap;
