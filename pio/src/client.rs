//! HTTP client for communicating with the put.io API.

use pio_core::api::{endpoints, TOKEN_PARAM};
use pio_core::{Document, FileEntry, PioError, Result, TreeLine};
use reqwest::header::LOCATION;
use reqwest::{redirect, Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

/// Normalize a base URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn transport_error(endpoint: &str, err: reqwest::Error) -> PioError {
    PioError::Transport {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    }
}

/// HTTP client for the put.io v2 REST API.
///
/// Every request carries the OAuth token as the `oauth_token` query
/// parameter. Calls are issued one at a time and never retried: a failed
/// request is reported to the caller as a [`PioError`].
///
/// # Examples
///
/// ```no_run
/// use pio::client::PutioClient;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = PutioClient::with_config("https://api.put.io/v2", "my-token", 30)?;
///
/// let info = client.account_info().await?;
/// println!("{:?}", info.get_str(&["info", "username"]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PutioClient {
    client: Client,
    /// Same settings as `client` but never follows redirects
    no_redirect: Client,
    base_url: String,
    token: String,
}

impl PutioClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root (e.g., "https://api.put.io/v2")
    /// * `token` - OAuth token sent with every request
    /// * `timeout_secs` - Request timeout in seconds
    pub fn with_config(base_url: &str, token: &str, timeout_secs: u64) -> Result<Self> {
        let build = |policy: redirect::Policy| {
            Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .user_agent(concat!("pio/", env!("CARGO_PKG_VERSION")))
                .redirect(policy)
                .build()
                .map_err(|e| PioError::Config(format!("Failed to create HTTP client: {}", e)))
        };

        Ok(Self {
            client: build(redirect::Policy::default())?,
            no_redirect: build(redirect::Policy::none())?,
            base_url: normalize_url(base_url),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[(TOKEN_PARAM, self.token.as_str())])
    }

    /// Issue a GET and decode the JSON envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be sent or the body cannot be read
    /// - The body is not JSON
    /// - The envelope's `status` is `ERROR`, or the HTTP status is not a success
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Document> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(endpoint, ?params, "GET");

        let response = self
            .authorized(self.client.get(&url))
            .query(params)
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        Self::handle_response(response, endpoint).await
    }

    async fn handle_response(response: Response, endpoint: &str) -> Result<Document> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(endpoint, e))?;
        debug!(endpoint, %status, bytes = body.len(), "response");

        let document = match Document::from_slice(&body) {
            Ok(document) => document,
            Err(_) if !status.is_success() => {
                return Err(PioError::Api {
                    endpoint: endpoint.to_string(),
                    message: format!("HTTP {}", status),
                });
            }
            Err(e) => {
                return Err(PioError::Decode {
                    endpoint: endpoint.to_string(),
                    message: e.to_string(),
                });
            }
        };

        if document.is_error() || !status.is_success() {
            let message = document
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(PioError::Api {
                endpoint: endpoint.to_string(),
                message,
            });
        }

        Ok(document)
    }

    /// List the children of a folder.
    pub async fn list_files(&self, parent_id: i64) -> Result<Document> {
        self.get(
            endpoints::FILES_LIST,
            &[("parent_id", parent_id.to_string())],
        )
        .await
    }

    /// Retrieve account information (user, plan, disk quota).
    pub async fn account_info(&self) -> Result<Document> {
        self.get(endpoints::ACCOUNT_INFO, &[]).await
    }

    /// Retrieve the transfer list.
    pub async fn transfers(&self) -> Result<Document> {
        self.get(endpoints::TRANSFERS_LIST, &[]).await
    }

    /// Retrieve the account event feed.
    pub async fn events(&self) -> Result<Document> {
        self.get(endpoints::EVENTS_LIST, &[]).await
    }

    /// Resolve the direct download link of a file.
    ///
    /// The download endpoint answers with a redirect to the actual file. The
    /// request is a HEAD that does not follow redirects, so only the
    /// `Location` header is read and the file itself is never fetched.
    ///
    /// # Errors
    ///
    /// Returns [`PioError::MissingRedirect`] when the answer is not a redirect
    /// carrying a `Location` header.
    pub async fn download_link(&self, file_id: i64) -> Result<String> {
        let endpoint = endpoints::file_download(file_id);
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(endpoint = %endpoint, "HEAD");

        let response = self
            .authorized(self.no_redirect.head(&url))
            .send()
            .await
            .map_err(|e| transport_error(&endpoint, e))?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        match location {
            Some(link) if status.is_redirection() => Ok(link),
            _ => Err(PioError::MissingRedirect {
                endpoint,
                status: status.as_u16(),
            }),
        }
    }
}

/// Recursively list a folder, depth first.
///
/// Each entry is emitted before the contents of the folder it represents,
/// with a depth counted from `root` (its direct children are at depth 0).
/// Folders are fetched one at a time; any failure aborts the whole walk.
pub async fn walk_files(client: &PutioClient, root: i64) -> Result<Vec<TreeLine>> {
    let mut lines = Vec::new();
    let mut pending: Vec<(FileEntry, usize)> = Vec::new();

    push_children(&mut pending, client, root, 0).await?;

    while let Some((entry, depth)) = pending.pop() {
        let descend = entry.is_directory().then_some(entry.id);
        lines.push(TreeLine::new(entry, depth));

        if let Some(folder_id) = descend {
            push_children(&mut pending, client, folder_id, depth + 1).await?;
        }
    }

    Ok(lines)
}

async fn push_children(
    pending: &mut Vec<(FileEntry, usize)>,
    client: &PutioClient,
    folder_id: i64,
    depth: usize,
) -> Result<()> {
    let document = client.list_files(folder_id).await?;
    let children = FileEntry::list_from(&document);
    debug!(folder_id, depth, count = children.len(), "listed folder");

    // Reversed so the first child is popped first
    pending.extend(children.into_iter().rev().map(|entry| (entry, depth)));
    Ok(())
}
