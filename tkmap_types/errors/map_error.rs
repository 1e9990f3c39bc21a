use thiserror::Error;

/// Errors raised by the map domain (coordinates, ids, record shapes).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("Coordinate ({x}|{y}) is outside the representable range")]
    CoordinateOutOfRange { x: i64, y: i64 },

    #[error("Invalid cell id {0}")]
    InvalidCellId(i64),

    #[error("Cell id {0:?} is not a decimal number")]
    MalformedCellId(String),

    #[error("{entity} has no field named {key:?}")]
    FieldNotFound { entity: &'static str, key: String },
}
