//! Data layer: passenger types, loading, filtering, aggregation and chart data.
//! Nothing below this module depends on the UI toolkit.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  cache    │  path + SHA-256 → Arc<Dataset>, parse via loader on miss
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  Vec<PassengerRecord>, distinct values per column
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  render   │  filter → visible indices
//!   └──────────┘        → metrics (KPIs)
//!                       → charts (count plots + annotate, fare, family)
//! ```

pub mod annotate;
pub mod cache;
pub mod charts;
pub mod error;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod render;
pub mod stats;
