//! Embedded default tables.
//!
//! The defaults are compiled in with `include_str!()` so preparation never
//! touches the filesystem.

/// Default physiological parameters (`parameter,description,unit,default`).
pub const PARAMETERS_CSV: &str = include_str!("../data/parameters.csv");

/// Default size-distribution parameters (`parameter,description,unit,default`).
pub const SIZE_DIST_CSV: &str = include_str!("../data/size_dist.csv");
