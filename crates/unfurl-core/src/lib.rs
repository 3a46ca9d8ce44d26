//! Unfurl Core Types and Definitions
//!
//! This crate provides the foundational types shared by the unfurl parser,
//! compiler, and command-line front end. It includes:
//!
//! - **Elements**: The typed screenplay element stream ([`element`] module)
//! - **Scripts**: Linear and outline scene models ([`script`] module)
//! - **Timing**: The duration estimator and its tunables ([`timing`] module)
//! - **Frames**: Frame-rate handling and seconds-to-frame conversion ([`frame`] module)
//! - **Segments**: Track-placed, frame-bounded output units ([`segment`] module)

pub mod element;
pub mod frame;
pub mod script;
pub mod segment;
pub mod timing;
