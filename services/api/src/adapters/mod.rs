pub mod json_db;

pub use json_db::JsonDb;
