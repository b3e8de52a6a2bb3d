mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, DispatchSettings, ProcessorSettings, ServerSettings, Settings,
    SettingsError,
};
