pub mod etl;
pub mod indexer;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod render;

pub use crate::domain::model::{Model, ParsedCoefficients, RawRow, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
