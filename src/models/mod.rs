//! Domain model module declarations.

pub mod answer;
pub mod capture;
pub mod protocol;
pub mod role;
