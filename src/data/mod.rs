/// Data layer: core types, loading, filtering, and slider-bound derivation.
///
/// Architecture:
/// ```text
///  dados_carnaval_2025.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, unique-value index
///   └──────────┘
///        │              ┌──────────┐
///        ├─────────────▶│  range    │  numeric column → SliderBounds
///        ▼              └──────────┘
///   ┌──────────┐
///   │  filter   │  FilterSpec conjunction → filtered view
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod range;
