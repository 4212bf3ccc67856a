/// Base URL of the parking backend.
///
/// Defaults to the local development server; override at build time with
/// the `SMARTPARK_API_URL` environment variable when the backend runs
/// elsewhere.
pub const API_BASE_URL: &str = match option_env!("SMARTPARK_API_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:8000",
};
