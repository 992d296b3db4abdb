use std::rc::Rc;
use std::time::Duration;
use serde_json::Value;
use crate::error::Error;
use super::reqwest::ReqwestClient;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Request client.
pub trait Client {
    /// Send a JSON POST request and receive the JSON response.
    fn make_json_request(&self, url: &str, payload: Value, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error>;

    /// Send a GET request and receive the JSON response.
    fn get_json(&self, url: &str, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error>;
}

/// Create reqwest client.
pub fn get_reqwest_client(timeout: Duration) -> Result<Rc<dyn Client>, Error> {
    Ok(Rc::new(ReqwestClient::new(timeout)?))
}
