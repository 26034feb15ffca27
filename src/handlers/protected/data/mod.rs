pub mod fetch_table;

pub use fetch_table::get as fetch_table;
