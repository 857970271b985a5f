pub mod db;
pub mod fees;
pub mod models;
pub mod pagination;
pub mod repos;
pub mod slots;
