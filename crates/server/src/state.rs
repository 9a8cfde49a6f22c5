use std::time::Instant;
use netflox_core::{Config, SanitizedConfig, VideoLibrary};

/// Shared application state
pub struct AppState {
    config: Config,
    library: VideoLibrary,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let library = VideoLibrary::from_config(&config.library);
        Self {
            config,
            library,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn library(&self) -> &VideoLibrary {
        &self.library
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
