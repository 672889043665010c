//! Default values for connection options and entries

use crate::model::HttpMethod;

pub const DEFAULT_METHOD: HttpMethod = HttpMethod::Get;

pub const DEFAULT_VERIFY_SSL: bool = true;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

/// Largest request timeout the connection form accepts, in seconds
pub const MAX_TIMEOUT_SECS: f64 = 3600.0;

/// Schema version of newly created entries
pub const ENTRY_VERSION: u32 = 1;

pub const DEFAULT_USER_AGENT: &str = "scrape-flow/0.3";

/// File name of the JSON entry store inside the data directory
pub const ENTRIES_FILE: &str = "entries.json";

/// Name of the data directory under the user's home
pub const DATA_DIR: &str = ".scrape";
