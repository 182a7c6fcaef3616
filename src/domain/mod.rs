pub mod error;
pub mod evaluation;
pub mod prediction;
pub mod profile;
pub mod salary;
pub mod table;
pub mod warning;
