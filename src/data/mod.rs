/// Data layer: table model, CSV loading, profiling, chart aggregates, export.
///
/// Architecture:
/// ```text
///      .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + infer column types → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐        ┌───────────┐
///   │  Dataset  │──────▶│  profile   │  counts, dtypes, missing, describe
///   └──────────┘        └───────────┘
///        │
///        ├──────────────▶ chart      selected column(s) → chart description
///        │                  (aggregate: value counts, group sums, corr, quartiles)
///        ▼
///   ┌──────────┐
///   │  export   │  Dataset → CSV bytes
///   └──────────┘
/// ```

pub mod aggregate;
pub mod chart;
pub mod export;
pub mod loader;
pub mod model;
pub mod profile;
