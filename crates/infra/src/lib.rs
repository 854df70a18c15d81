pub mod db;
pub mod models;
pub mod repos;
pub mod rules;
pub mod store;
