use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CRATES: [&str; 4] = ["quotemerge_core", "quotemerge_recon", "quotemerge_io", "qmerge"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Self::Verbose,
            (false, true) => Self::Quiet,
            _ => Self::Normal,
        }
    }

    fn level(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn default_directives(self) -> String {
        CRATES
            .iter()
            .map(|krate| format!("{krate}={}", self.level()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over the flags.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directives()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_quiet() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn directives_cover_every_crate() {
        let directives = Verbosity::Quiet.default_directives();
        assert!(directives.contains("quotemerge_recon=warn"));
        assert!(directives.contains("qmerge=warn"));
    }
}
