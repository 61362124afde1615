//! Record sources backed by CSV files

pub mod csv_reader;
pub mod filter;
pub mod statements;
pub mod transactions;

pub use csv_reader::*;
pub use filter::*;
pub use statements::*;
pub use transactions::*;
