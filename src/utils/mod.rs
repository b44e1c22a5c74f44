pub mod formatting;
pub mod ids;
