pub mod directory;
pub mod etl;
pub mod geo;
pub mod query;
pub mod ranker;
pub mod reducer;

pub use crate::domain::model::{Record, TransformResult};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
