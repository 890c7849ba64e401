pub mod config;
pub mod routes;
pub mod sink;
pub mod state;
