// RouterOS session authentication
//
// Two-step cookie login: a GET on `/login` bootstraps the session, a
// form-encoded POST with the credentials authenticates it. The cookie
// jar carries the session into every later request.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;
use crate::routeros::client::RouterOsClient;

impl RouterOsClient {
    /// Authenticate with the router using username/password.
    ///
    /// - `GET /login` must answer 2xx, otherwise [`Error::Unreachable`].
    /// - `POST /login` with `username` / `password` form fields must answer
    ///   2xx, otherwise [`Error::Authentication`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.login_url()?;

        debug!("bootstrapping session at {}", url);

        let resp = self
            .http()
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_err(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Unreachable {
                url: url.to_string(),
                reason: format!("login endpoint answered HTTP {status}"),
            });
        }

        debug!(username, "submitting credentials");

        let resp = self
            .http()
            .post(url)
            .form(&[
                ("username", username),
                ("password", password.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_err(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("invalid credentials (HTTP {status})"),
            });
        }

        debug!("login successful");
        Ok(())
    }
}
