use std::{fmt, sync::Arc};

pub mod audit;
pub mod configs;
pub mod domain;
pub mod http;
pub mod server;
pub mod service;
pub mod storage;

use http::Controller;

#[derive(Clone)]
pub struct SharedData {
    pub config: configs::ServerConfig,
    pub controller: Arc<Controller>,
}

impl SharedData {
    pub fn new(config: configs::ServerConfig, controller: Arc<Controller>) -> Self {
        Self { config, controller }
    }
}

impl fmt::Debug for SharedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedData")
            .field("config", &self.config)
            .finish()
    }
}
