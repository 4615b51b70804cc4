pub mod env {
    pub const API_URL: &str = "API_URL";
    pub const AUTH_URL: &str = "AUTH_URL";
    pub const API_USERNAME: &str = "API_USERNAME";
    pub const API_PASSWORD: &str = "API_PASSWORD";
    pub const TENANT_ID: &str = "TENANT_ID";
    pub const WORKSPACE_ID: &str = "WORKSPACE_ID";
    pub const VERIFY_SSL: &str = "VERIFY_SSL";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";

    /// Order is the order missing names are reported in.
    pub const REQUIRED: &[&str] = &[
        API_URL,
        AUTH_URL,
        API_USERNAME,
        API_PASSWORD,
        TENANT_ID,
        WORKSPACE_ID,
    ];
}

pub mod auth {
    pub const DEFAULT_TENANT_ID: &str = "admin";
    pub const PASSWORD_GRANT: &str = "password";
    pub const DEFAULT_SCHEME: &str = "https://";
}

pub mod protocols {
    pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";
    pub const SERVER_NAME: &str = "OICM MCP";
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const USER_AGENT: &str = concat!("oicm-mcp/", env!("CARGO_PKG_VERSION"));
}

pub mod limits {
    pub const LOG_BODY_PREVIEW_BYTES: usize = 512;
    pub const LOG_META_STRING_BYTES: usize = 2048;
}
