// Fixed-point complex x real dot product for polyphase IQ channelizers
pub mod kernel;
pub mod window;
pub mod samples;

pub use kernel::{dotprod_8, dotprod_8_float, dotprod_8_horiz, Backend, Lanes, LANES, SCALE};
pub use window::{FilterBank, FilterBankError, SlidingWindow};
