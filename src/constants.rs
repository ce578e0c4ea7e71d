// ABOUTME: Application constants grouped by domain
// ABOUTME: COROS upstream contract values, chat provider defaults and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Values fixed by external contracts live here so that code never carries
//! magic strings inline.

/// COROS upstream API contract
pub mod coros {
    /// Service label used in errors and logs
    pub const SERVICE: &str = "COROS";

    /// Default upstream base URL
    pub const DEFAULT_API_BASE: &str = "https://teamapi.coros.com";

    /// Business "all-clear" value of the envelope `result` field.
    ///
    /// Opaque: supplied by the upstream contract, no meaning is inferred from it.
    pub const SUCCESS_RESULT: &str = "0000";

    /// `accountType` value sent on login
    pub const ACCOUNT_TYPE: u8 = 2;

    /// Discriminator of per-kilometre split entries in `lapList`
    pub const SPLIT_LAP_TYPE: i64 = 2;

    /// Credential lifetime assumed after a successful login
    pub const TOKEN_TTL_DAYS: i64 = 7;

    /// Header carrying the access token
    pub const ACCESS_TOKEN_HEADER: &str = "accesstoken";

    /// Device user agent required by the upstream
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15";

    /// Viewport width sent with detail queries
    pub const SCREEN_WIDTH: &str = "781";

    /// Viewport height sent with detail queries
    pub const SCREEN_HEIGHT: &str = "1440";

    /// Default upstream request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Upstream endpoint paths
    pub mod endpoints {
        /// Account login
        pub const LOGIN: &str = "account/login";
        /// Activity detail query
        pub const ACTIVITY_DETAIL: &str = "activity/detail/query";
        /// Activity listing
        pub const ACTIVITY_LIST: &str = "activity/query";
    }
}

/// Chat backend defaults
pub mod llm {
    /// Default Qwen (DashScope compatible-mode) base URL
    pub const QWEN_DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode";

    /// Default Qwen model
    pub const QWEN_DEFAULT_MODEL: &str = "qwen-plus";

    /// Default Gemini base URL
    pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default Gemini model
    pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

    /// Default chat request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Connection timeout for chat backends
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Service identification
pub mod service_names {
    /// Name reported in logs and the service index
    pub const FITGO_SERVER: &str = "fitgo-server";
}
