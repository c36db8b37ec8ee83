//! The signed-in user's own profile.

use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    ApiResource, Ceia, cross_log,
    errors::{AuthError, Result},
    util::check_http_status,
};

impl Ceia {
    /// `GET usuarios/<IdUsuario>` for the signed-in user.
    pub async fn profile<T: DeserializeOwned>(&self) -> Result<T> {
        let id = self.signed_in_user()?;

        self.resource(ApiResource::Usuarios).get(id).await
    }

    /// `PUT usuarios/<IdUsuario>/perfil` for the signed-in user.
    ///
    /// When `body` carries a `Nombre`, the persisted session's display name
    /// follows it.
    pub async fn update_profile<B: Serialize + ?Sized>(&self, body: &B) -> Result<()> {
        let id = self.signed_in_user()?;
        let body = serde_json::to_value(body)?;

        self.put_profile(id, &body).await?;

        if let Some(nombre) = body.get("Nombre").and_then(serde_json::Value::as_str) {
            self.sessions().update(|session| {
                session.set_display_name(nombre);
            })?;
        }

        Ok(())
    }

    /// Change the signed-in user's password.
    pub async fn change_password(&self, clave: &str) -> Result<()> {
        if clave.is_empty() {
            return Err(AuthError::Validation("password must not be empty".into()).into());
        }
        let id = self.signed_in_user()?;

        cross_log!(info, "Changing the password of user {id}");
        self.put_profile(id, &json!({ "Clave": clave })).await
    }

    async fn put_profile(&self, id: i64, body: &serde_json::Value) -> Result<()> {
        let path = format!("{}/perfil", ApiResource::Usuarios.item(id));
        let response = self
            .api()
            .request(Method::PUT, &path)?
            .json(body)
            .send()
            .await?;
        check_http_status(response).await?;

        Ok(())
    }

    fn signed_in_user(&self) -> Result<i64> {
        Ok(self
            .session()
            .ok_or(AuthError::NotSignedIn)?
            .user_id())
    }
}
