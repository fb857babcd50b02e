//! REST transport over the hosted API, bearer-token authenticated.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::settings::Settings;

use crate::error::TransportError;
use crate::migrate::MigrationBundle;

use super::api::{
    ApplicationRecord, ContactRecord, EventRecord, ReminderRecord, RemoteApplication,
    RemoteContact, RemoteEvent, RemoteTransport,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Deserialize)]
struct BulkResponse {
    created: u32,
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, TransportError> {
        let response = builder
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        trace!(status = %response.status(), url = %response.url(), "remote response");
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        response
            .json()
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, TransportError> {
        let response = self.send(self.authed(self.client.get(self.url(path))))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).map(Some)
    }

    /// POST/PUT against a specific id; 404 means the id is gone.
    fn write_targeted(&self, builder: RequestBuilder) -> Result<bool, TransportError> {
        let response = self.send(self.authed(builder))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(true)
    }

    fn write_unit(&self, builder: RequestBuilder) -> Result<(), TransportError> {
        let response = self.send(self.authed(builder))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl RemoteTransport for HttpTransport {
    fn list_applications(&mut self) -> Result<Vec<RemoteApplication>, TransportError> {
        let response = self.send(self.authed(self.client.get(self.url("/applications"))))?;
        Self::decode(response)
    }

    fn get_application(&mut self, id: &str) -> Result<Option<ApplicationRecord>, TransportError> {
        self.get_json(&format!("/applications/{id}"))
    }

    fn create_application(&mut self, record: &ApplicationRecord) -> Result<String, TransportError> {
        let response = self.send(
            self.authed(self.client.post(self.url("/applications")).json(record)),
        )?;
        let created: CreatedResponse = Self::decode(response)?;
        Ok(created.id)
    }

    fn put_application(
        &mut self,
        id: &str,
        record: &ApplicationRecord,
    ) -> Result<bool, TransportError> {
        self.write_targeted(self.client.put(self.url(&format!("/applications/{id}"))).json(record))
    }

    fn delete_application(&mut self, id: &str) -> Result<bool, TransportError> {
        self.write_targeted(self.client.delete(self.url(&format!("/applications/{id}"))))
    }

    fn create_event(&mut self, id: &str, record: &EventRecord) -> Result<bool, TransportError> {
        self.write_targeted(
            self.client
                .post(self.url(&format!("/applications/{id}/events")))
                .json(record),
        )
    }

    fn list_events(&mut self, id: &str) -> Result<Vec<RemoteEvent>, TransportError> {
        Ok(self
            .get_json(&format!("/applications/{id}/events"))?
            .unwrap_or_default())
    }

    fn create_contact(&mut self, id: &str, record: &ContactRecord) -> Result<bool, TransportError> {
        self.write_targeted(
            self.client
                .post(self.url(&format!("/applications/{id}/contacts")))
                .json(record),
        )
    }

    fn list_contacts(&mut self, id: &str) -> Result<Vec<RemoteContact>, TransportError> {
        Ok(self
            .get_json(&format!("/applications/{id}/contacts"))?
            .unwrap_or_default())
    }

    fn create_reminder(
        &mut self,
        id: &str,
        record: &ReminderRecord,
    ) -> Result<bool, TransportError> {
        self.write_targeted(
            self.client
                .post(self.url(&format!("/applications/{id}/reminders")))
                .json(record),
        )
    }

    fn get_settings(&mut self) -> Result<Option<Settings>, TransportError> {
        self.get_json("/settings")
    }

    fn put_settings(&mut self, settings: &Settings) -> Result<(), TransportError> {
        self.write_unit(self.client.put(self.url("/settings")).json(settings))
    }

    fn get_progress(&mut self) -> Result<Option<UserProgress>, TransportError> {
        self.get_json("/progress")
    }

    fn put_progress(&mut self, progress: &UserProgress) -> Result<(), TransportError> {
        self.write_unit(self.client.put(self.url("/progress")).json(progress))
    }

    fn bulk_create(&mut self, bundles: &[MigrationBundle]) -> Result<u32, TransportError> {
        let response = self.send(
            self.authed(self.client.post(self.url("/applications/bulk")).json(&bundles)),
        )?;
        let bulk: BulkResponse = Self::decode(response)?;
        Ok(bulk.created)
    }
}

#[cfg(test)]
mod tests {
    use super::HttpTransport;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("https://api.example.com/", "tok").expect("client");
        assert_eq!(transport.url("/applications"), "https://api.example.com/applications");
    }
}
