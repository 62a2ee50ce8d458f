pub mod aggregate;
pub mod analysis;
pub mod etl;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod range;
pub mod sex_split;
pub mod traits;

pub use crate::domain::model::{BreedRecord, BreedTables, NormalizedBreed};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
