use std::path::PathBuf;

use clap::Parser;

/// Processed dataset shipped alongside the dashboard.
pub const DEFAULT_DATA_PATH: &str = "data/processed/titanic_processed.csv";

/// Command line options of the dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "titanic-analytics")]
#[command(about = "Interactive Titanic survival analytics dashboard", long_about = None)]
pub struct Config {
    /// Passenger file to open on startup (.csv, .json or .parquet)
    #[arg(env = "TITANIC_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Initial window width in points
    #[arg(long, default_value_t = 1400.0)]
    pub width: f32,

    /// Initial window height in points
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["titanic-analytics"]).expect("parse");
        // TITANIC_DATA may be set in the environment running the tests.
        if std::env::var_os("TITANIC_DATA").is_none() {
            assert_eq!(config.data, PathBuf::from(DEFAULT_DATA_PATH));
        }
        assert_eq!(config.width, 1400.0);
    }

    #[test]
    fn explicit_path_and_size() {
        let config = Config::try_parse_from([
            "titanic-analytics",
            "other.parquet",
            "--width",
            "800",
            "--height",
            "600",
        ])
        .expect("parse");
        assert_eq!(config.data, PathBuf::from("other.parquet"));
        assert_eq!(config.height, 600.0);
    }
}
