pub mod date;
pub mod sql;
