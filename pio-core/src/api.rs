//! Constants describing the put.io v2 REST API.

/// Default base URL of the put.io API
pub const DEFAULT_API_URL: &str = "https://api.put.io/v2";

/// Query parameter carrying the OAuth token on every request
pub const TOKEN_PARAM: &str = "oauth_token";

/// Value of the top-level `status` field when a call failed
pub const STATUS_ERROR: &str = "ERROR";

/// Content type the API uses for folders
pub const DIRECTORY_CONTENT_TYPE: &str = "application/x-directory";

/// Identifier of the root folder
pub const ROOT_FOLDER_ID: i64 = 0;

/// Endpoint paths, relative to the base URL
pub mod endpoints {
    pub const FILES_LIST: &str = "/files/list";
    pub const ACCOUNT_INFO: &str = "/account/info";
    pub const TRANSFERS_LIST: &str = "/transfers/list";
    pub const EVENTS_LIST: &str = "/events/list";

    /// Path of the download endpoint for a file
    pub fn file_download(file_id: i64) -> String {
        format!("/files/{}/download", file_id)
    }
}

/// Event type tags known to the CLI
pub mod event_types {
    pub const TRANSFER_COMPLETED: &str = "transfer_completed";
    pub const ZIP_CREATED: &str = "zip_created";
}
