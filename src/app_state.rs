use std::sync::Arc;

use crate::config::Config;
use crate::packaging::Packager;
use crate::sink::{MemorySink, PageSink};

#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn PageSink>,
    pub packager: Option<Arc<dyn Packager>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// In-memory storage and no packager.
    pub fn new(config: Config) -> Self {
        Self {
            sink: Arc::new(MemorySink::new()),
            packager: None,
            config: Arc::new(config),
        }
    }

    pub fn with_packager(mut self, packager: Arc<dyn Packager>) -> Self {
        self.packager = Some(packager);
        self
    }
}
