/*!
 * Error types for the bookwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the translation provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when sending an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when decoding an API response body fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

/// Errors that can occur while parsing or querying an XHTML document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The markup could not be parsed
    #[error("Failed to parse markup: {0}")]
    Parse(String),

    /// The document has no root element
    #[error("Document has no root element")]
    MissingRoot,
}

impl From<quick_xml::Error> for DocumentError {
    fn from(error: quick_xml::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The caller passed empty markup or an empty language code
    #[error("Invalid translation input: {0}")]
    InvalidInput(String),

    /// The request never succeeded within the allowed number of attempts
    #[error("Translation failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Number of attempts that were made
        attempts: u32,
        /// The error from the final attempt
        source: ProviderError,
    },

    /// The service answered successfully but the payload is unusable
    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error in the application configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document parsing or serialization
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error reading or writing the book container
    #[error("Container error: {0}")]
    Container(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
