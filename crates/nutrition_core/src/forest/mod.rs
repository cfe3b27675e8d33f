//! Random-forest regression model and tree structures

pub mod model;
pub mod tree;

pub use model::{ModelMetadata, RandomForestModel, MODEL_FORMAT_VERSION};
pub use tree::{Node, RegressionTree};
