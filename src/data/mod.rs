/// Data layer: row parsing, canonical keys, indexing and set algebra.
///
/// Architecture:
/// ```text
///  date,north,northeast  (.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  split lines → RowOutcome (Accepted | Rejected)
///   └──────────┘        │
///        │         ┌───────────┐
///        │◀────────│ normalize │  raw field → TemperatureKey ("31.50")
///        ▼         └───────────┘
///   ┌─────────────┐
///   │ SeriesIndex  │  value sets, date indexes, coincidences, tally
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   sets    │  union / intersection / difference / universe / complement
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ powerset  │  P(A ∩ B), truncated at the configured ceiling
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod normalize;
pub mod powerset;
pub mod sets;
