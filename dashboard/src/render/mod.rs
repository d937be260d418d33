//! Turns parsed rows into scene elements, one module per chart.

pub mod bar;
pub mod donut;
pub mod map;
