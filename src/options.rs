//! Functional options
//!
//! A tool's configuration is built by folding an ordered list of options over
//! a default value. Options are shared closures, so one list can be applied
//! any number of times and always yields the same configuration.

use crate::error::DaggersResult;
use std::sync::Arc;

/// A reusable transformation of a configuration value
pub type ConfigOption<C> = Arc<dyn Fn(C) -> DaggersResult<C> + Send + Sync>;

/// Wrap a closure as a [`ConfigOption`]
pub fn option<C, F>(f: F) -> ConfigOption<C>
where
    F: Fn(C) -> DaggersResult<C> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Apply `options` in order to the type's default configuration
pub fn init_config<C: Default>(options: &[ConfigOption<C>]) -> DaggersResult<C> {
    init_config_with(C::default(), options)
}

/// Apply `options` in order to `defaults`
///
/// Later options override earlier ones on the same field. The first option
/// that fails validation aborts the fold and its error is returned as-is.
pub fn init_config_with<C>(defaults: C, options: &[ConfigOption<C>]) -> DaggersResult<C> {
    options.iter().try_fold(defaults, |cfg, apply| apply(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DaggersError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Settings {
        name: String,
        level: u32,
    }

    fn name(value: &str) -> ConfigOption<Settings> {
        let value = value.to_string();
        option(move |mut s: Settings| {
            s.name = value.clone();
            Ok(s)
        })
    }

    fn level(value: u32) -> ConfigOption<Settings> {
        option(move |mut s: Settings| {
            if value > 10 {
                return Err(DaggersError::invalid_option("level", "must be at most 10"));
            }
            s.level = value;
            Ok(s)
        })
    }

    #[test]
    fn empty_options_yield_defaults() {
        let cfg: Settings = init_config(&[]).unwrap();
        assert_eq!(cfg, Settings::default());
    }

    #[test]
    fn later_options_override_earlier() {
        let cfg = init_config(&[name("first"), level(3), name("second")]).unwrap();
        assert_eq!(cfg.name, "second");
        assert_eq!(cfg.level, 3);
    }

    #[test]
    fn starts_from_given_defaults() {
        let defaults = Settings {
            name: "base".to_string(),
            level: 7,
        };
        let cfg = init_config_with(defaults, &[level(1)]).unwrap();
        assert_eq!(cfg.name, "base");
        assert_eq!(cfg.level, 1);
    }

    #[test]
    fn applying_twice_gives_equal_configs() {
        let opts = vec![name("svc"), level(4), name("svc-2")];
        let a: Settings = init_config(&opts).unwrap();
        let b: Settings = init_config(&opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn first_failure_stops_the_fold() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let counting = option(move |s: Settings| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(s)
        });

        let err = init_config(&[level(11), counting]).unwrap_err();
        assert!(matches!(err, DaggersError::InvalidOption { ref option, .. } if option == "level"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
