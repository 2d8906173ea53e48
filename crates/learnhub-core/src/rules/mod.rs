//! Field validation rules applied before rows are written

pub mod validation;
