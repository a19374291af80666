//! Human-readable rendering of the run report.
//!
//! Every stage summary implements [`std::fmt::Display`]. Once the run has
//! finished, the CLI prints the whole [`crate::types::RunReport`], one
//! section per stage in pipeline order. The JSON form of the same data comes
//! from `serde`:
//!
//! ```rust,ignore
//! println!("{}", report.catalog);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

mod display;

pub use display::thousands;
