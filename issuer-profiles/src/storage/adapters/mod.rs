pub mod ddb_storage;
pub mod local_storage;
pub mod redis_storage;
