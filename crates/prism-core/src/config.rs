/// Configuration for the Prism renderer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filter directives for the logging subscriber. `None` uses `RUST_LOG`
    /// or [`crate::logging::DEFAULT_FILTER`].
    pub log_filter: Option<String>,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: None,
            profiling: ProfilingMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling is disabled
    Off,
    /// Scopes are recorded in-process
    On,
    /// Scopes are recorded and served to 'puffin_viewer'
    #[cfg(feature = "profiling")]
    WithWebServer,
}

impl Config {
    /// Install logging and profiling as configured.
    pub fn init(&self) {
        match &self.log_filter {
            Some(filter) => crate::logging::init_with_filter(filter),
            None => crate::logging::init(),
        }

        match self.profiling {
            ProfilingMode::Off => {}
            ProfilingMode::On => {
                crate::profiling::init_profiling(crate::profiling::ProfilingBackend::InProcess)
            }
            #[cfg(feature = "profiling")]
            ProfilingMode::WithWebServer => {
                crate::profiling::init_profiling(crate::profiling::ProfilingBackend::PuffinHttp)
            }
        }
    }
}
