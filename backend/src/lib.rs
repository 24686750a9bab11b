pub mod api;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;
