/// Centralized command-line argument handling
///
/// Consolidates argv access so flags can be checked from anywhere without
/// re-parsing. Binaries and tests can override the argument set.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Override the argument set (used by tests)
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value following a flag, None when the flag is absent or bare
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

/// Run a single aggregation pass and exit instead of starting the
/// periodic service
pub fn is_once_enabled() -> bool {
    has_arg("--once")
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Custom config file path (--config <path>)
pub fn get_config_path() -> Option<String> {
    get_arg_value("--config")
}

pub fn print_help() {
    println!("deadrank - dead token aggregation and ranking service");
    println!();
    println!("USAGE:");
    println!("    deadrank [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --once               Run a single aggregation pass and exit");
    println!("    --config <path>      Config file path (default: data/config.toml)");
    println!("    --quiet              Only errors and warnings");
    println!("    --verbose            Verbose logging for all modules");
    println!("    --debug-all          Debug logging for all modules");
    println!("    --debug-<module>     Debug logging for one module");
    println!("                         (system, config, api, tokens, scoring,");
    println!("                          aggregator, dashboard)");
    println!("    --help, -h           Show this help");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_value_lookup() {
        set_cmd_args(vec![
            "deadrank".to_string(),
            "--config".to_string(),
            "custom.toml".to_string(),
            "--once".to_string(),
        ]);

        assert!(is_once_enabled());
        assert_eq!(get_config_path().as_deref(), Some("custom.toml"));
        assert!(!is_help_requested());
    }
}
