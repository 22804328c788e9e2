pub mod breeding_status;
