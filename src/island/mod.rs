//! Island model.
//!
//! Several independent populations ("islands") evolve in isolation and
//! periodically exchange individuals ("migration"). Optionally, on a fixed
//! cadence, every island is pooled into one large population ("continent")
//! that is bred for a few generations and then dealt back to the islands.
//!
//! # Key Types
//!
//! - [`IslandConfig`]: island count, island rates, migration and continent
//!   cadence
//! - [`IslandModel`]: the coordinator, with the same `seed` / `estimate` /
//!   `breed` / `best` / `stats` surface as [`Genetic`](crate::genetic::Genetic)
//!
//! # References
//!
//! - Whitley, Rana & Heckendorn (1999), "The Island Model Genetic Algorithm:
//!   On Separability, Population Size and Convergence"

mod config;
mod runner;

pub use config::IslandConfig;
pub use runner::IslandModel;
