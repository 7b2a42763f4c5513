//! Session state and the sampling loop around the model.

pub mod auto;
pub mod histograms;
pub mod session;
