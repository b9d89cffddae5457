//! Constants shared across the octocheck workspace.

/// Application name used for project directories
pub const APP_NAME: &str = "octocheck";

/// Qualifier/organization used for project directories
pub const APP_ORGANIZATION: &str = "eddieland";

/// Name of the API configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "OCTOCHECK_API_URL";

/// Environment variable overriding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "OCTOCHECK_TIMEOUT_SECS";

/// Environment variable holding a GitHub token
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Default base URL for the public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";
