//! Authenticated access to the REST collections.
//!
//! The management views are thin CRUD screens over these collections; the
//! client hands bodies through as JSON and leaves their shape to the caller.

pub mod images;
pub mod profile;

use std::{fmt::Display, str::FromStr};

use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    ApiClient, cross_log,
    errors::{RequestError, Result},
    util::{check_http_status, decode_json},
};

/// A REST collection of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiResource {
    /// `usuarios`
    Usuarios,
    /// `permisos`
    Permisos,
    /// `equipos`
    Equipos,
    /// `unidades`
    Unidades,
    /// `solicitudes`
    Solicitudes,
    /// `mantenimientos`, shown under `/historiales`.
    Mantenimientos,
}

impl ApiResource {
    /// Every collection, in menu order.
    pub const ALL: [ApiResource; 6] = [
        ApiResource::Usuarios,
        ApiResource::Permisos,
        ApiResource::Equipos,
        ApiResource::Unidades,
        ApiResource::Solicitudes,
        ApiResource::Mantenimientos,
    ];

    /// Collection path relative to the API base URL.
    pub fn collection(&self) -> &'static str {
        match self {
            ApiResource::Usuarios => "usuarios",
            ApiResource::Permisos => "permisos",
            ApiResource::Equipos => "equipos",
            ApiResource::Unidades => "unidades",
            ApiResource::Solicitudes => "solicitudes",
            ApiResource::Mantenimientos => "mantenimientos",
        }
    }

    /// Path of one item of the collection.
    pub fn item(&self, id: i64) -> String {
        format!("{}/{id}", self.collection())
    }
}

impl Display for ApiResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for ApiResource {
    type Err = RequestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().trim_matches('/').to_ascii_lowercase();

        Ok(match name.as_str() {
            "usuarios" => ApiResource::Usuarios,
            "permisos" => ApiResource::Permisos,
            "equipos" => ApiResource::Equipos,
            "unidades" => ApiResource::Unidades,
            "solicitudes" => ApiResource::Solicitudes,
            "mantenimientos" | "historiales" => ApiResource::Mantenimientos,
            _ => {
                return Err(RequestError::Validation {
                    message: format!("unknown resource `{s}`"),
                });
            }
        })
    }
}

/// CRUD handle for one [`ApiResource`].
///
/// Every call goes through the authenticated pipeline; non-2xx responses
/// surface as [`RequestError::Server`].
#[derive(Clone, Debug)]
pub struct ResourceClient {
    api: ApiClient,
    kind: ApiResource,
}

impl ResourceClient {
    pub(crate) fn new(api: ApiClient, kind: ApiResource) -> Self {
        Self { api, kind }
    }

    /// The collection this handle targets.
    pub fn kind(&self) -> ApiResource {
        self.kind
    }

    /// `GET <collection>`
    pub async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        cross_log!(debug, "Listing {}", self.kind);
        self.send(Method::GET, self.kind.collection(), None::<&()>)
            .await
    }

    /// `GET <collection>/<id>`
    pub async fn get<T: DeserializeOwned>(&self, id: i64) -> Result<T> {
        self.send(Method::GET, &self.kind.item(id), None::<&()>)
            .await
    }

    /// `POST <collection>`
    pub async fn create<B, T>(&self, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        cross_log!(info, "Creating an entry in {}", self.kind);
        self.send(Method::POST, self.kind.collection(), Some(body))
            .await
    }

    /// `PUT <collection>/<id>`
    pub async fn update<B, T>(&self, id: i64, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        cross_log!(info, "Updating {}/{id}", self.kind);
        self.send(Method::PUT, &self.kind.item(id), Some(body))
            .await
    }

    /// `DELETE <collection>/<id>`
    pub async fn delete(&self, id: i64) -> Result<()> {
        cross_log!(info, "Deleting {}/{id}", self.kind);
        let response = self
            .api
            .request(Method::DELETE, &self.kind.item(id))?
            .send()
            .await?;
        check_http_status(response).await?;

        Ok(())
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .api
            .request(method, path)?
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = check_http_status(request.send().await?).await?;

        decode_json(response).await
    }
}
