/// Configuration constants for the ShapeBlock auth API
pub mod api {
    /// Edition probe: 404 means an open-source server
    pub const REGISTRATION: &str = "/api/auth/registration/";

    /// Login endpoint for open-source servers, returns `{key}`
    pub const OSS_LOGIN: &str = "/api/auth/login/";

    /// Login endpoint for SaaS servers, returns `{access, refresh}`
    pub const SAAS_TOKEN: &str = "/api/auth/token/";

    /// Access token refresh endpoint (SaaS only)
    pub const SAAS_TOKEN_REFRESH: &str = "/api/auth/token/refresh/";

    /// Account registration endpoint
    pub const REGISTER: &str = "/api/auth/register/";

    /// Connect timeout for auth requests, in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Overall request timeout for auth requests, in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Configuration constants for the context file
pub mod context {
    /// Directory under the home directory holding the config file
    pub const DIR_NAME: &str = ".config";

    /// Config file name
    pub const FILE_NAME: &str = "sb.json";

    /// Environment variable overriding the config file path
    pub const CONFIG_ENV_VAR: &str = "SB_CONFIG";

    /// Environment variable selecting a context for a single invocation
    pub const ENV_VAR: &str = "SB_CONTEXT";
}

/// Token lifetime policy
pub mod session {
    /// Lifetime of a SaaS access token, both at login and after refresh
    pub const SAAS_ACCESS_TOKEN_TTL_MINUTES: i64 = 60;

    /// OSS tokens do not expire server-side; this horizon keeps the model uniform
    pub const OSS_TOKEN_TTL_DAYS: i64 = 3650;
}

/// Default values for CLI
pub mod defaults {
    /// Server suggested by the login prompt
    pub const SERVER: &str = "dashboard.shapeblock.com";

    /// Default log level
    pub const LOG_LEVEL: &str = "warn";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_paths_format() {
        for path in [
            api::REGISTRATION,
            api::OSS_LOGIN,
            api::SAAS_TOKEN,
            api::SAAS_TOKEN_REFRESH,
            api::REGISTER,
        ] {
            assert!(path.starts_with('/'));
            assert!(path.ends_with('/'));
        }
    }

    #[test]
    fn test_default_server_has_no_scheme() {
        assert!(defaults::SERVER.contains('.'));
        assert!(!defaults::SERVER.starts_with("https://"));
    }

    #[test]
    fn test_saas_ttl_is_shorter_than_oss() {
        assert!(session::SAAS_ACCESS_TOKEN_TTL_MINUTES < session::OSS_TOKEN_TTL_DAYS * 24 * 60);
    }
}
