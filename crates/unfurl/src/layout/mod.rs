//! Track allocation and frame layout.
//!
//! [`ChannelAllocator`] picks the base of the three-track block that receives
//! new output, clearing it first when the base is pinned. [`LayoutEngine`]
//! then sweeps the scenes once and turns clip durations into frame-bounded
//! [`PlacedSegment`](unfurl_core::segment::PlacedSegment)s on that block.

mod channel;
mod engine;

pub use channel::{Allocation, ChannelAllocator};
pub use engine::LayoutEngine;
