#![forbid(unsafe_code)]

//! Migration, housing and industry dashboard of Australian states.
//!
//! A year slider drives a choropleth map with migration markers and a bar
//! chart of housing prices; clicking a state breaks its employment down by
//! industry in a donut chart.

pub mod color;
pub mod config;
pub mod controller;
pub mod encoding;
pub mod geography;
pub mod load;
pub mod plot;
pub mod render;
pub mod scale;
pub mod scene;
pub mod schema;
pub mod shape;

pub use config::Config;
pub use controller::{Dashboard, DonutState, Outcome, Request};
pub use scene::{ChartKind, Scene};
