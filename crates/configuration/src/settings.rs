use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the CLI front end.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataFiles,
}

/// Locations of the JSON fixtures standing in for the REST responses the
/// browser client would fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct DataFiles {
    /// The marketplace catalog (an array of ebooks).
    pub catalog_file: PathBuf,
    /// The trade history plus equity time series for one account.
    pub performance_file: PathBuf,
}
