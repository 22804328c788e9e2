pub mod db;
pub mod reference_store;
