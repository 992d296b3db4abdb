use std::time::Duration;
use reqwest::blocking::{Client as BlockingClient, RequestBuilder};
use serde_json::Value;
use tracing::trace;
use crate::error::Error;
use crate::request::client::Client;

pub struct ReqwestClient {
    client: BlockingClient,
}

impl ReqwestClient {

    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = BlockingClient::builder()
            .timeout(timeout)
            .build()?;

        Ok(ReqwestClient {
            client,
        })
    }

    fn send(&self, mut request: RequestBuilder, headers: &[(&str, &str)]) -> Result<Value, Error> {
        for (k, v) in headers {
            request = request.header(*k, *v);
        }

        let response = request.send()?;
        let status = response.status();
        trace!(status = status.as_u16(), url = %response.url(), "response received");

        if !status.is_success() {
            let body = response.text().unwrap_or_else(|_| "<unreadable body>".to_owned());
            return Err(Error::HttpStatus { status: status.as_u16(), body });
        }

        let ret = response.json()?;
        Ok(ret)
    }
}

impl Client for ReqwestClient {

    fn make_json_request(&self, url: &str, payload: Value, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error> {
        let request = self.client
            .post(url)
            .query(params)
            .json(&payload);

        self.send(request, headers)
    }

    fn get_json(&self, url: &str, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error> {
        let request = self.client
            .get(url)
            .query(params);

        self.send(request, headers)
    }
}
