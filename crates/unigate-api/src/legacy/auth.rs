// Legacy API authentication
//
// Cookie-based session login/logout and controller platform detection.
// The login endpoint sets a session cookie in the client's jar;
// subsequent requests use that cookie automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::client::{LegacyClient, preview};
use crate::legacy::models::LegacyResponse;
use crate::transport::TransportConfig;

impl LegacyClient {
    /// Authenticate with the controller using username/password.
    ///
    /// On success the session cookie is stored in the client's cookie jar
    /// and used for all subsequent requests. The login endpoint differs
    /// by platform:
    /// - UniFi OS: `POST /api/auth/login`
    /// - Standalone: `POST /api/login`
    ///
    /// On rejection the error carries the controller's own diagnostic
    /// (`meta.msg` when present, otherwise the start of the body).
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.base_url().join(self.platform().login_path())?;

        debug!(username, "logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: login_diagnostic(status, &body),
            });
        }

        // UniFi OS requires the CSRF token on every mutating request.
        if let Some(token) = resp
            .headers()
            .get("X-CSRF-Token")
            .and_then(|v| v.to_str().ok())
        {
            self.set_csrf_token(token.to_owned());
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// Platform-specific logout endpoint:
    /// - UniFi OS: `POST /api/auth/logout`
    /// - Standalone: `POST /api/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.base_url().join(self.platform().logout_path())?;

        debug!("logging out at {}", url);

        let resp = self
            .apply_csrf(self.http().post(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        if !resp.status().is_success() {
            return Err(Error::LegacyApi {
                message: format!("logout failed (HTTP {})", resp.status()),
            });
        }

        debug!("logout complete");
        Ok(())
    }

    /// Auto-detect the controller platform by probing login endpoints.
    ///
    /// Tries the UniFi OS endpoint first (`/api/auth/login`). If it
    /// responds with anything but 404, we're on UniFi OS. Otherwise the
    /// standalone endpoint must at least answer for the controller to be
    /// considered reachable.
    pub async fn detect_platform(
        base_url: &Url,
        transport: &TransportConfig,
    ) -> Result<ControllerPlatform, Error> {
        let http = transport.build_client()?;

        let unifi_os_url = base_url.join(ControllerPlatform::UnifiOs.login_path())?;

        debug!("probing UniFi OS at {}", unifi_os_url);

        if let Ok(resp) = http.get(unifi_os_url).send().await {
            if resp.status() != reqwest::StatusCode::NOT_FOUND {
                debug!("detected UniFi OS platform");
                return Ok(ControllerPlatform::UnifiOs);
            }
        }

        let standalone_url = base_url.join(ControllerPlatform::ClassicController.login_path())?;

        debug!("probing standalone at {}", standalone_url);

        match http.get(standalone_url).send().await {
            Ok(_) => {
                debug!("detected standalone (classic) controller");
                Ok(ControllerPlatform::ClassicController)
            }
            Err(e) => Err(Error::Transport(e)),
        }
    }
}

fn login_diagnostic(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<LegacyResponse<serde_json::Value>>(body) {
        if let Some(msg) = envelope.meta.msg {
            return msg;
        }
    }
    if body.trim().is_empty() {
        format!("login failed (HTTP {status})")
    } else {
        format!("login failed (HTTP {status}): {}", preview(body))
    }
}
