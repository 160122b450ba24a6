/// Log tags identifying the subsystem a message originates from
///
/// Each tag maps to a --debug-<key> command-line flag so diagnostics can be
/// enabled per module without flooding the console.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Api,
    Tokens,
    Scoring,
    Aggregator,
    Dashboard,
}

impl LogTag {
    /// Display label used in console output
    pub fn label(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Api => "API",
            LogTag::Tokens => "TOKENS",
            LogTag::Scoring => "SCORING",
            LogTag::Aggregator => "AGGREGATOR",
            LogTag::Dashboard => "DASHBOARD",
        }
    }

    /// Key used for --debug-<key> / --verbose-<key> argument matching
    pub fn to_debug_key(&self) -> String {
        self.label().to_lowercase()
    }

    /// All known tags (used when --debug-all is passed)
    pub fn all() -> &'static [LogTag] {
        &[
            LogTag::System,
            LogTag::Config,
            LogTag::Api,
            LogTag::Tokens,
            LogTag::Scoring,
            LogTag::Aggregator,
            LogTag::Dashboard,
        ]
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
