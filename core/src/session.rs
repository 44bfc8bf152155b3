//! Session-aware executor for backend calls.
//!
//! # Design
//! `ApiSession` pairs the I/O-free `TodoClient` with a `Transport` and a
//! `Navigator`. Credentials travel in the transport's cookie store; nothing
//! here handles tokens. Every 401 is returned as `ApiError::Unauthorized`
//! *and* reported to the navigator as a redirect to the sign-in route, so
//! callers can still branch locally when no router is attached.
//!
//! There are no retries and no cancellation. A failed call is surfaced once.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::navigation::{Navigator, NoopNavigator, SIGNIN_ROUTE};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, Empty, Todo, TodoList, UpdateTodo};

pub struct ApiSession<T, N = NoopNavigator> {
    client: TodoClient,
    transport: T,
    navigator: N,
}

impl<N: Navigator> ApiSession<ReqwestTransport, N> {
    /// Session over HTTP with a fresh cookie store.
    pub fn from_config(config: &ClientConfig, navigator: N) -> Result<Self, ApiError> {
        Ok(Self::new(
            TodoClient::new(&config.api_url),
            ReqwestTransport::new()?,
            navigator,
        ))
    }
}

impl<T: Transport, N: Navigator> ApiSession<T, N> {
    pub fn new(client: TodoClient, transport: T, navigator: N) -> Self {
        Self {
            client,
            transport,
            navigator,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run the round trip without interpreting the status.
    pub async fn exchange(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    /// Execute and parse without the unauthorized redirect.
    pub async fn send_quiet<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let response = self.exchange(request).await?;
        self.client.parse(response)
    }

    /// Execute and parse. A 401 also triggers navigation to the sign-in route.
    pub async fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let result = self.send_quiet(request).await;
        if let Err(ApiError::Unauthorized { .. }) = &result {
            warn!("session rejected, redirecting to sign-in");
            self.navigator.navigate(SIGNIN_ROUTE);
        }
        result
    }

    /// Execute and check the status only; the response body is ignored.
    pub async fn send_discarding(&self, request: HttpRequest) -> Result<(), ApiError> {
        let response = self.exchange(request).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(ApiError::from_response(response.status, &response.body))
        }
    }

    async fn request<R, B>(&self, method: HttpMethod, endpoint: &str, body: Option<&B>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = match body {
            Some(body) => self.client.build_with_body(method, endpoint, body)?,
            None => self.client.build(method, endpoint),
        };
        self.send(request).await
    }

    // --- verb wrappers ---

    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.request::<R, ()>(HttpMethod::Get, endpoint, None).await
    }

    pub async fn post<R, B>(&self, endpoint: &str, body: &B) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, endpoint, Some(body)).await
    }

    pub async fn post_empty<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.request::<R, ()>(HttpMethod::Post, endpoint, None).await
    }

    pub async fn put<R, B>(&self, endpoint: &str, body: &B) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, endpoint, Some(body)).await
    }

    pub async fn patch<R, B>(&self, endpoint: &str, body: &B) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Patch, endpoint, Some(body)).await
    }

    pub async fn patch_empty<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.request::<R, ()>(HttpMethod::Patch, endpoint, None).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.request::<R, ()>(HttpMethod::Delete, endpoint, None).await
    }

    // --- tasks ---

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let list: TodoList = self.send(self.client.build_list_todos()).await?;
        Ok(list.todos)
    }

    pub async fn get_todo(&self, id: &str) -> Result<Todo, ApiError> {
        self.send(self.client.build_get_todo(id)).await
    }

    /// Validate and create. Invalid input fails before any request is made.
    pub async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let input = input.validate()?;
        self.send(self.client.build_create_todo(&input)?).await
    }

    /// Validate and update. Invalid input fails before any request is made.
    pub async fn update_todo(&self, id: &str, input: &UpdateTodo) -> Result<Todo, ApiError> {
        let input = input.validate()?;
        self.send(self.client.build_update_todo(id, &input)?).await
    }

    pub async fn toggle_complete(&self, id: &str) -> Result<Todo, ApiError> {
        self.send(self.client.build_toggle_complete(id)).await
    }

    pub async fn delete_todo(&self, id: &str) -> Result<(), ApiError> {
        self.send::<Empty>(self.client.build_delete_todo(id))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
impl<N> ApiSession<crate::testing::StubTransport, N> {
    pub(crate) fn transport_requests(&self) -> Vec<HttpRequest> {
        self.transport.requests()
    }
}
