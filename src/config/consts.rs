// src/config/consts.rs

// Net config
pub const DEFAULT_BASE_URL: &str = "https://my.cdash.org";
pub const DEFAULT_PROJECT: &str = "HDF5";
pub const API_PATH: &str = "/api/v1/index.php";
pub const PAGE_PATH: &str = "/index.php";
pub const HPC_GROUP: &str = "HPC";
pub const TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("cdash_scrape/", env!("CARGO_PKG_VERSION"));
pub const ACCEPT: &str = "application/json, text/html, */*";

// Dates
pub const DATE_FMT: &str = "%Y-%m-%d";

// Output
pub const DEFAULT_CSV: &str = "hpc_test_results.csv";
pub const DEFAULT_MARKDOWN: &str = "hpc_test_report.md";

// Records
pub const UNKNOWN: &str = "unknown";

// Report table truncation (chars)
pub const TRUNC_SITE: usize = 15;
pub const TRUNC_ARCH: usize = 12;
pub const TRUNC_VERSION: usize = 15;
pub const TRUNC_OS: usize = 20;
pub const TRUNC_MPI: usize = 12;
pub const TRUNC_COMPILER: usize = 15;
pub const TOP_COMPILERS: usize = 5;
