use clap::{Parser, ValueEnum};
use primesweep::{ConfigError, DeliveryKind, PartitionKind, SearchConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Key holding the worker count in the config file.
pub const THREADS_KEY: &str = "threads";
/// Key holding the inclusive upper bound in the config file.
pub const MAX_NUMBER_KEY: &str = "max_number";

/// Command-line arguments for the `primesweep` binary.
///
/// The search shape (`threads`, `max_number`) always comes from the key-value
/// config file. The strategy flags pick one of the four partition/delivery
/// pairings. Every flag can also be set through its environment variable,
/// including from a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "primesweep",
    version,
    about = "Searches 1..=max_number for primes across concurrent workers"
)]
pub struct CliArgs {
    /// Path to the key-value config file.
    ///
    /// The file must define `threads` and `max_number`, both positive
    /// integers. Lines starting with `#` and unknown keys are ignored.
    ///
    /// Environment variable: `PRIMESWEEP_CONFIG`
    #[arg(long, env = "PRIMESWEEP_CONFIG", default_value = "config.txt")]
    pub config: PathBuf,

    /// How the range is divided among workers.
    ///
    /// Environment variable: `PRIMESWEEP_PARTITION`
    #[arg(long, env = "PRIMESWEEP_PARTITION", value_enum, default_value_t = CliPartition::Contiguous)]
    pub partition: CliPartition,

    /// How matches are delivered.
    ///
    /// Environment variable: `PRIMESWEEP_DELIVERY`
    #[arg(long, env = "PRIMESWEEP_DELIVERY", value_enum, default_value_t = CliDelivery::Immediate)]
    pub delivery: CliDelivery,

    /// Exit without waiting for a keypress.
    ///
    /// The pause is skipped anyway when stdin is not a terminal.
    ///
    /// Environment variable: `PRIMESWEEP_NO_PAUSE`
    #[arg(long, env = "PRIMESWEEP_NO_PAUSE", default_value_t = false)]
    pub no_pause: bool,
}

/// CLI partition strategy selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliPartition {
    /// Consecutive blocks of ceil(max_number / threads) values
    Contiguous,
    /// Round-robin: worker i takes i+1, i+1+threads, ...
    Interleaved,
}

impl From<CliPartition> for PartitionKind {
    fn from(cli: CliPartition) -> Self {
        match cli {
            CliPartition::Contiguous => Self::Contiguous,
            CliPartition::Interleaved => Self::Interleaved,
        }
    }
}

/// CLI delivery strategy selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliDelivery {
    /// Print each prime with a timestamp as soon as it is found
    Immediate,
    /// Collect per-worker lists and print them once all workers finish
    Batch,
}

impl From<CliDelivery> for DeliveryKind {
    fn from(cli: CliDelivery) -> Self {
        match cli {
            CliDelivery::Immediate => Self::Immediate,
            CliDelivery::Batch => Self::Batch,
        }
    }
}

/// Validated settings for one run of the binary.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub search: SearchConfig,
    pub partition: PartitionKind,
    pub delivery: DeliveryKind,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            search: load_config_file(&args.config)?,
            partition: args.partition.into(),
            delivery: args.delivery.into(),
        })
    }
}

/// Reads and validates the key-value config file at `path`.
///
/// # Errors
///
/// [`ConfigError::Unreadable`] if the file cannot be read, otherwise as
/// [`parse_config`].
pub fn load_config_file(path: &Path) -> Result<SearchConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Parses `key = value` lines into a [`SearchConfig`].
///
/// Empty lines, lines starting with `#` and lines without `=` are skipped.
/// Keys and values are trimmed of spaces and tabs. A repeated key overrides
/// the earlier value; positivity is checked once the whole text is read.
///
/// # Errors
///
/// - [`ConfigError::InvalidInteger`] for a known key whose value does not
///   parse.
/// - [`ConfigError::MissingKey`] if `threads` or `max_number` never appears.
/// - [`ConfigError::NotPositive`] if either final value is `<= 0`.
pub fn parse_config(text: &str) -> Result<SearchConfig, ConfigError> {
    let mut threads = None;
    let mut max_number = None;

    for line in text.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim_matches([' ', '\t']);
        let value = value.trim_matches([' ', '\t']);

        match key {
            THREADS_KEY => threads = Some(parse_integer(THREADS_KEY, value)?),
            MAX_NUMBER_KEY => max_number = Some(parse_integer(MAX_NUMBER_KEY, value)?),
            _ => {}
        }
    }

    let threads = positive(THREADS_KEY, threads)?;
    let max_number = positive(MAX_NUMBER_KEY, max_number)?;
    let worker_count = usize::try_from(threads).unwrap_or(usize::MAX);

    SearchConfig::new(worker_count, max_number)
}

fn parse_integer(key: &'static str, value: &str) -> Result<i64, ConfigError> {
    value
        .parse()
        .map_err(|source| ConfigError::InvalidInteger {
            key,
            value: value.to_owned(),
            source,
        })
}

fn positive(key: &'static str, value: Option<i64>) -> Result<u64, ConfigError> {
    match value {
        None => Err(ConfigError::MissingKey { key }),
        Some(v) if v <= 0 => Err(ConfigError::NotPositive { key, value: v }),
        Some(v) => Ok(v.unsigned_abs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_file() {
        let config = parse_config("threads=4\nmax_number=100\n").unwrap();
        assert_eq!(config.worker_count(), 4);
        assert_eq!(config.upper_bound(), 100);
    }

    #[test]
    fn skips_comments_blank_and_unknown_lines() {
        let text = "# search settings\n\
                    \n\
                    mode = fast\n\
                    not a setting\n\
                    \tthreads \t=  8 \n\
                    max_number\t=\t1000\r\n";
        let config = parse_config(text).unwrap();
        assert_eq!(config.worker_count(), 8);
        assert_eq!(config.upper_bound(), 1000);
    }

    #[test]
    fn later_keys_override_earlier_ones() {
        let config = parse_config("threads=-1\nmax_number=10\nthreads=2\n").unwrap();
        assert_eq!(config.worker_count(), 2);
    }

    #[test]
    fn commented_keys_are_ignored() {
        let err = parse_config("#threads=4\nmax_number=10\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { key: "threads" }));
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = parse_config("threads=4\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { key: "max_number" }));
    }

    #[test]
    fn non_positive_values_are_errors() {
        let err = parse_config("threads=0\nmax_number=10\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                key: "threads",
                value: 0
            }
        ));

        let err = parse_config("threads=2\nmax_number=-5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                key: "max_number",
                value: -5
            }
        ));
    }

    #[test]
    fn malformed_numbers_are_errors_not_panics() {
        let err = parse_config("threads=four\nmax_number=10\n").unwrap_err();
        match err {
            ConfigError::InvalidInteger { key, value, .. } => {
                assert_eq!(key, "threads");
                assert_eq!(value, "four");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_config("threads=2\nmax_number=99999999999999999999\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidInteger {
                key: "max_number",
                ..
            }
        ));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let path = Path::new("does/not/exist/config.txt");
        let err = load_config_file(path).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
        assert_eq!(
            err.to_string(),
            "could not open config file 'does/not/exist/config.txt'"
        );
    }

    #[test]
    fn cli_flags_map_to_strategies() {
        let args = CliArgs::try_parse_from([
            "primesweep",
            "--config",
            "settings.txt",
            "--partition",
            "interleaved",
            "--delivery",
            "batch",
            "--no-pause",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("settings.txt"));
        assert_eq!(PartitionKind::from(args.partition), PartitionKind::Interleaved);
        assert_eq!(DeliveryKind::from(args.delivery), DeliveryKind::Batch);
        assert!(args.no_pause);
    }
}
