//! Numeric primitives without domain meaning: variates, curves, bins.

pub mod bins;
pub mod curves;
pub mod random;
