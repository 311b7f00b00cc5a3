use reqwest::StatusCode;

/// Failure of a single device list fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the response body could not be read.
    #[error("failed to request {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{url} responded with status {status}")]
    Status { url: String, status: StatusCode },

    /// The body is not a JSON device list.
    #[error("failed to decode device list from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
