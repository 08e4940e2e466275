use clap::ValueEnum;

/// Build mode accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Mode {
    /// Readable bundle, `over` copied verbatim
    #[value(name = "dev")]
    Dev,

    /// Minified bundle, `over` re-serialized compactly
    #[value(name = "production")]
    Production,
}

/// Log verbosity accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum LogLevel {
    #[value(name = "info")]
    Info,
    #[value(name = "success")]
    Success,
    #[value(name = "warn")]
    Warn,
    #[value(name = "error")]
    Error,
    /// Print nothing
    #[value(name = "silent")]
    Silent,
}

// Conversion implementations: CLI enums -> config enums

impl From<Mode> for sammi_config::BuildMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Dev => sammi_config::BuildMode::Dev,
            Mode::Production => sammi_config::BuildMode::Production,
        }
    }
}

impl From<LogLevel> for sammi_config::LogLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => sammi_config::LogLevel::Info,
            LogLevel::Success => sammi_config::LogLevel::Success,
            LogLevel::Warn => sammi_config::LogLevel::Warn,
            LogLevel::Error => sammi_config::LogLevel::Error,
            LogLevel::Silent => sammi_config::LogLevel::Silent,
        }
    }
}
