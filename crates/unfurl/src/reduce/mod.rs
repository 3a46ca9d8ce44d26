//! Folds of the element stream into scene models.
//!
//! Both reducers share one segmentation rule: every scene heading opens a new
//! scene, and anything before the first heading is discarded. They are
//! otherwise independent.

mod outline;
mod timeline;

pub use outline::OutlineReducer;
pub use timeline::TimelineReducer;
