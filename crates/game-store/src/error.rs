//! Errors surfaced by the dynamic, name-addressed store API.
//!
//! The typed accessors on [`GameStore`](crate::GameStore) never fail; only
//! callers that address fields by name or pass untyped values can get these.

use thiserror::Error;

use crate::session::{Field, FieldKind};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown store field `{0}`")]
    UnknownField(String),

    #[error("field {field} holds {expected} values, got {found}")]
    KindMismatch {
        field: Field,
        expected: FieldKind,
        found: FieldKind,
    },
}
