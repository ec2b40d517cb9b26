use crate::point::PointField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to lock store file: {0}")]
    Lock(std::io::Error),

    #[error("world name {world:?} cannot be stored")]
    InvalidWorld { world: String },

    #[error("world '{world}' has a non-numeric {field} value: '{value}'")]
    InvalidField {
        world: String,
        field: PointField,
        value: String,
    },
}
