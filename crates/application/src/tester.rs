//! Case factories for one RESTful entry point.

use std::fmt::Display;
use std::sync::Arc;

use restit_domain::{DomainResult, HttpMethod, RequestSpec};
use serde::Serialize;

use crate::case::Case;
use crate::ports::Session;

/// A named RESTful entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Human-readable name of the entry point.
    pub name: String,
    /// Base URL of the collection, e.g. `https://api.example.com/users`.
    pub url: String,
}

/// Builds [`Case`]s for the create, retrieve, update and delete
/// operations of an [`Endpoint`].
///
/// Every case gets its own clone of the session.
#[derive(Debug, Clone)]
pub struct Tester<S> {
    endpoint: Arc<Endpoint>,
    session: S,
}

impl<S: Session + Clone> Tester<S> {
    /// Creates a tester for the entry point `name` at `url`.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>, session: S) -> Self {
        Self {
            endpoint: Arc::new(Endpoint {
                name: name.into(),
                url: url.into(),
            }),
            session,
        }
    }

    /// Returns the entry point this tester builds cases for.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// `POST <url>` with `payload` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` cannot be serialized to JSON.
    pub fn create<P: Serialize + ?Sized>(&self, payload: &P) -> DomainResult<Case<S>> {
        let request = RequestSpec::with_payload(HttpMethod::Post, &self.endpoint.url, payload)?;
        Ok(self.case(request))
    }

    /// `GET <url>/<id>`.
    #[must_use]
    pub fn retrieve(&self, id: impl Display) -> Case<S> {
        self.case(RequestSpec::new(HttpMethod::Get, self.item_url(id)))
    }

    /// `PUT <url>/<id>` with `payload` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` cannot be serialized to JSON.
    pub fn update<P: Serialize + ?Sized>(
        &self,
        id: impl Display,
        payload: &P,
    ) -> DomainResult<Case<S>> {
        let request = RequestSpec::with_payload(HttpMethod::Put, self.item_url(id), payload)?;
        Ok(self.case(request))
    }

    /// `DELETE <url>/<id>`.
    #[must_use]
    pub fn delete(&self, id: impl Display) -> Case<S> {
        self.case(RequestSpec::new(HttpMethod::Delete, self.item_url(id)))
    }

    fn item_url(&self, id: impl Display) -> String {
        format!("{}/{id}", self.endpoint.url)
    }

    fn case(&self, request: RequestSpec) -> Case<S> {
        Case::new(request, self.session.clone()).with_endpoint(Arc::clone(&self.endpoint))
    }
}
