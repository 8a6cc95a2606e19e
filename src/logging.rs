//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing`, so stdout stays clean for
//! listings and JSON. `USERSYNC_LOG` takes an `EnvFilter` directive and wins
//! over `-v` flags.

use tracing_subscriber::EnvFilter;

use crate::constants::ENV_LOG;
use crate::env::Env;

/// Filter directive for the given number of `-v` flags.
pub fn filter_directive(verbosity: u8, env: &Env) -> String {
    if let Some(directive) = env.var(ENV_LOG) {
        return directive;
    }
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Dependencies stay at warn unless asked for via USERSYNC_LOG.
    format!("warn,usersync={level}")
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8, env: &Env) {
    let directive = filter_directive(verbosity, env);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        assert_eq!(filter_directive(0, &env), "warn,usersync=warn");
        assert_eq!(filter_directive(1, &env), "warn,usersync=info");
        assert_eq!(filter_directive(2, &env), "warn,usersync=debug");
        assert_eq!(filter_directive(7, &env), "warn,usersync=trace");
    }

    #[test]
    fn env_directive_wins() {
        let env = Env::mock([("USERSYNC_LOG", "reqwest=debug")]);
        assert_eq!(filter_directive(2, &env), "reqwest=debug");
    }

    #[test]
    fn init_twice_does_not_panic() {
        let env = Env::mock([("USERSYNC_LOG", "not a [valid directive")]);
        init(0, &env);
        init(3, &env);
    }
}
