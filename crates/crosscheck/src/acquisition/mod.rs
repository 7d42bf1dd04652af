//! HTTP acquisition for the API side of the check.

pub mod http_client;

pub use http_client::{Fetcher, HttpClient, HttpResponse};
