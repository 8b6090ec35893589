pub mod column_type;
pub mod config;
pub mod name_table;
