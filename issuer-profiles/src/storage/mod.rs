pub mod adapters;
pub mod factory;
pub mod profile_store;
pub mod repository;
