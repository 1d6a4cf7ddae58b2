//! HTTP client for the remote poll API.

use js_sys::Promise;
use poll_core::{
    ApiError, ClientConfig, OptionId, Poll, PollApi, PollId, PollSubmission, ProfileApi,
};
use poll_schema::{PollUpsertV1, PollV1, ProfileV1, VoteRequestV1};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

#[derive(Clone, Debug)]
pub struct HttpPollClient {
    api_base: String,
    profile_id: String,
}

impl HttpPollClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            profile_id: config.profile_id.clone(),
        }
    }

    fn profile_url(&self) -> String {
        format!("{}/profiles/{}", self.api_base, encode(&self.profile_id))
    }

    fn poll_url(&self) -> String {
        format!("{}/poll", self.profile_url())
    }
}

fn encode(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}

fn js_err(e: JsValue) -> ApiError {
    ApiError::new(format!("{e:?}"))
}

async fn resolve(promise: Promise) -> Result<JsValue, ApiError> {
    JsFuture::from(promise)
        .await
        .map_err(|e| ApiError::new(format!("request rejected: {e:?}")))
}

async fn send<B: Serialize>(
    method: &str,
    url: &str,
    body: Option<&B>,
) -> Result<Response, ApiError> {
    let window = web_sys::window().ok_or_else(|| ApiError::new("window not available"))?;

    let headers = Headers::new().map_err(js_err)?;
    headers.set("Accept", "application/json").map_err(js_err)?;

    let init = RequestInit::new();
    init.set_method(method);
    init.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        let json = serde_json::to_string(body).map_err(|e| ApiError::new(e.to_string()))?;
        headers.set("Content-Type", "application/json").map_err(js_err)?;
        init.set_body(&JsValue::from_str(&json));
    }
    init.set_headers(&headers);

    let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;
    let response: Response = resolve(window.fetch_with_request(&request))
        .await?
        .dyn_into()
        .map_err(|_| ApiError::new("fetch did not yield a Response"))?;

    if !response.ok() {
        return Err(ApiError::new(format!(
            "{method} {url} returned {}",
            response.status()
        )));
    }
    Ok(response)
}

async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let value = resolve(response.json().map_err(js_err)?).await?;
    serde_wasm_bindgen::from_value(value).map_err(|e| ApiError::new(e.to_string()))
}

impl PollApi for HttpPollClient {
    async fn create_or_update_poll(&self, submission: &PollSubmission) -> Result<Poll, ApiError> {
        let body = PollUpsertV1::from(submission);
        let response = send("PUT", &self.poll_url(), Some(&body)).await?;
        let wire: PollV1 = read_json(response).await?;
        Poll::try_from(wire)
    }

    async fn delete_poll(&self) -> Result<(), ApiError> {
        send::<()>("DELETE", &self.poll_url(), None).await?;
        Ok(())
    }

    async fn vote(&self, poll_id: &PollId, option_id: OptionId) -> Result<(), ApiError> {
        let url = format!("{}/polls/{}/votes", self.api_base, encode(&poll_id.0));
        let body = VoteRequestV1 {
            option_id: option_id.0,
        };
        send("POST", &url, Some(&body)).await?;
        Ok(())
    }
}

impl ProfileApi for HttpPollClient {
    async fn fetch_poll(&self) -> Result<Option<Poll>, ApiError> {
        let response = send::<()>("GET", &self.profile_url(), None).await?;
        let profile: ProfileV1 = read_json(response).await?;
        profile.poll.map(Poll::try_from).transpose()
    }
}
