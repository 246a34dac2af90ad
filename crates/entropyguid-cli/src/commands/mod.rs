pub mod algorithms;
pub mod config;
pub mod generate;
pub mod scan;

use std::path::Path;
use entropyguid_core::{GeneratorConfig, GuidError};

/// Exit status for misconfiguration (unsupported algorithm, bad config, ...).
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Exit status when every registered source failed.
pub const EXIT_ALL_SOURCES_FAILED: u8 = 3;

/// Load the configuration file if one was given, else the defaults.
pub fn load_config(path: Option<&str>) -> Result<GeneratorConfig, GuidError> {
    match path {
        Some(p) => GeneratorConfig::load(Path::new(p)),
        None => Ok(GeneratorConfig::default()),
    }
}

/// Exit status for an output failure (closed pipe, ...).
pub const EXIT_FAILURE: u8 = 1;

/// Report a configuration error and map it to its exit status.
pub fn config_error(err: &GuidError) -> u8 {
    eprintln!("error: {err}");
    EXIT_CONFIG_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(load_config(None).unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_config(Some("/definitely/not/here/entropyguid.json")).unwrap_err();
        assert!(matches!(err, GuidError::Io(_)));
    }

    #[test]
    fn config_error_maps_to_its_status() {
        let err = GuidError::Config("bad".into());
        assert_eq!(config_error(&err), EXIT_CONFIG_ERROR);
    }

    #[test]
    fn exit_codes_are_distinct_and_nonzero() {
        assert_ne!(EXIT_CONFIG_ERROR, 0);
        assert_ne!(EXIT_ALL_SOURCES_FAILED, 0);
        assert_ne!(EXIT_CONFIG_ERROR, EXIT_ALL_SOURCES_FAILED);
        assert_ne!(EXIT_FAILURE, EXIT_CONFIG_ERROR);
    }
}
