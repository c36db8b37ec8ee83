//! Image attachments of equipment and maintenance requests.

use std::fmt::Display;

use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;

use crate::{
    ApiClient, cross_log,
    errors::{RequestError, Result},
    util::{check_http_status, decode_json},
};

/// The entity an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageOwner {
    /// An entry of `equipos`.
    Equipo(i64),
    /// An entry of `solicitudes`.
    Solicitud(i64),
}

impl ImageOwner {
    /// Path of the owner's image collection, e.g. `equipos/3/imagenes`.
    pub fn images_path(&self) -> String {
        match self {
            ImageOwner::Equipo(id) => format!("equipos/{id}/imagenes"),
            ImageOwner::Solicitud(id) => format!("solicitudes/{id}/imagenes"),
        }
    }

    /// Form field naming the owner in an upload.
    pub fn id_field(&self) -> &'static str {
        match self {
            ImageOwner::Equipo(_) => "IdEquipo",
            ImageOwner::Solicitud(_) => "IdSolicitud",
        }
    }

    /// The owner's id.
    pub fn id(&self) -> i64 {
        match self {
            ImageOwner::Equipo(id) | ImageOwner::Solicitud(id) => *id,
        }
    }
}

impl Display for ImageOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageOwner::Equipo(id) => write!(f, "equipo {id}"),
            ImageOwner::Solicitud(id) => write!(f, "solicitud {id}"),
        }
    }
}

/// One file to upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// In-memory image. The content type is guessed from `file_name`.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();

        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read an image from disk.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());

        Ok(Self::new(file_name, bytes))
    }

    /// Override the guessed content type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    /// File name sent with the part.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Content type sent with the part.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for an empty file.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn into_part(self) -> Result<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)?)
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Authenticated access to image attachments.
#[derive(Clone, Debug)]
pub struct ImageClient {
    api: ApiClient,
}

impl ImageClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET <owner>/imagenes`
    pub async fn list_images<T: DeserializeOwned>(&self, owner: ImageOwner) -> Result<Vec<T>> {
        let response = self
            .api
            .request(Method::GET, &owner.images_path())?
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_http_status(response).await?;

        decode_json(response).await
    }

    /// `POST <owner>/imagenes` as `multipart/form-data`.
    ///
    /// The form carries the owner id field followed by one `Ruta[i]` file
    /// part per upload, in order. Returns the server's body.
    pub async fn upload_images<T: DeserializeOwned>(
        &self,
        owner: ImageOwner,
        uploads: Vec<ImageUpload>,
    ) -> Result<T> {
        if uploads.is_empty() {
            return Err(RequestError::Validation {
                message: "at least one image is required".into(),
            }
            .into());
        }

        cross_log!(info, "Uploading {} image(s) for {owner}", uploads.len());
        let mut form = Form::new().text(owner.id_field(), owner.id().to_string());
        for (index, upload) in uploads.into_iter().enumerate() {
            form = form.part(format!("Ruta[{index}]"), upload.into_part()?);
        }

        let response = self
            .api
            .request(Method::POST, &owner.images_path())?
            .multipart(form)
            .send()
            .await?;
        let response = check_http_status(response).await?;

        decode_json(response).await
    }

    /// `DELETE <owner>/imagenes/<image_id>`
    pub async fn delete_image(&self, owner: ImageOwner, image_id: i64) -> Result<()> {
        cross_log!(info, "Deleting image {image_id} of {owner}");
        let path = format!("{}/{image_id}", owner.images_path());
        let response = self.api.request(Method::DELETE, &path)?.send().await?;
        check_http_status(response).await?;

        Ok(())
    }
}
