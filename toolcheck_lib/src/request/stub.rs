//! Only for tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::collections::VecDeque;
use serde_json::Value;
use crate::error::Error;
use crate::request::client::Client;

/// Canned reply.
pub enum Reply {
    /// Successful JSON body.
    Json(Value),
    /// Non-success status with a body.
    Status(u16, String),
}

/// One expected request and its reply.
pub struct Exchange {
    method: &'static str,
    expected_url: Option<String>,
    expected_headers: Vec<(String, String)>,
    expected_params: Vec<(String, String)>,
    expected_payload: Option<Value>,
    reply: Reply,
}

impl Exchange {

    /// Expect a POST request.
    pub fn post(reply: Reply) -> Self {
        Exchange::new("POST", reply)
    }

    /// Expect a GET request.
    pub fn get(reply: Reply) -> Self {
        Exchange::new("GET", reply)
    }

    fn new(method: &'static str, reply: Reply) -> Self {
        Exchange {
            method,
            expected_url: None,
            expected_headers: vec![],
            expected_params: vec![],
            expected_payload: None,
            reply,
        }
    }

    /// Check the URL.
    pub fn url(mut self, url: &str) -> Self {
        self.expected_url = Some(url.to_owned());
        self
    }

    /// Check headers.
    pub fn headers(mut self, headers: &[(&str, &str)]) -> Self {
        self.expected_headers = headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self
    }

    /// Check query parameters.
    pub fn params(mut self, params: &[(&str, &str)]) -> Self {
        self.expected_params = params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self
    }

    /// Check the whole request body.
    pub fn payload(mut self, payload: Value) -> Self {
        self.expected_payload = Some(payload);
        self
    }
}

/// Client for tests, replays exchanges in order.
pub struct StubClient {
    exchanges: RefCell<VecDeque<Exchange>>,
}

impl StubClient {

    /// Create client.
    pub fn new(exchanges: Vec<Exchange>) -> Self {
        StubClient {
            exchanges: RefCell::new(exchanges.into()),
        }
    }

    /// Create shared client.
    pub fn shared(exchanges: Vec<Exchange>) -> Rc<dyn Client> {
        Rc::new(StubClient::new(exchanges))
    }

    fn exchange(&self, method: &str, url: &str, payload: Option<Value>, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error> {
        let exchange = self.exchanges.borrow_mut().pop_front()
            .unwrap_or_else(|| panic!("unexpected {method} request to {url}"));

        assert_eq!(exchange.method, method, "request method for {url}");

        if let Some(expected_url) = &exchange.expected_url {
            assert_eq!(expected_url, url, "request url");
        }

        for (expected, actual) in exchange.expected_headers.iter().zip(headers.iter()) {
            assert_eq!(expected.0, actual.0, "headers keys");
            assert_eq!(expected.1, actual.1, "headers values");
        }

        for (expected, actual) in exchange.expected_params.iter().zip(params.iter()) {
            assert_eq!(expected.0, actual.0, "params keys");
            assert_eq!(expected.1, actual.1, "params values");
        }

        if let (Some(expected), Some(actual)) = (&exchange.expected_payload, &payload) {
            assert_eq!(expected, actual, "request payload");
        }

        match exchange.reply {
            Reply::Json(body) => Ok(body),
            Reply::Status(status, body) => Err(Error::HttpStatus { status, body }),
        }
    }
}

impl Drop for StubClient {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(self.exchanges.borrow().is_empty(), "not all expected requests were made");
        }
    }
}

impl Client for StubClient {

    fn make_json_request(&self, url: &str, payload: Value, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error> {
        self.exchange("POST", url, Some(payload), headers, params)
    }

    fn get_json(&self, url: &str, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error> {
        self.exchange("GET", url, None, headers, params)
    }
}
