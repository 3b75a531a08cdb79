/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TipsDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ TipsDataset │  Vec<Record>, immutable after load
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │ ───▶ │ aggregate  │  criteria → DerivedView
///   └──────────┘      └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
