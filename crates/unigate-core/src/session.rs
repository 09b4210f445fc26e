// ── Controller session lifecycle ──
//
// A session goes through two mandatory steps, initialize then login, and
// only the value produced by a successful login can issue control
// commands. Each control request opens its own session and drops it when
// done; nothing here is pooled or shared.

use std::future::Future;

use secrecy::SecretString;
use tracing::{debug, error};
use url::Url;

use unigate_api::{ControllerPlatform, LegacyClient, TransportConfig};

use crate::error::CoreError;
use crate::model::{MacAddress, NameIndex};

/// Connection parameters for one controller session.
///
/// `Debug` is safe to log: the password is a [`SecretString`].
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub endpoint: Url,
    pub username: String,
    pub password: SecretString,
}

/// Login rejection, with the controller's own diagnostic.
#[derive(Debug)]
pub struct LoginFailure {
    pub message: String,
    pub source: unigate_api::Error,
}

impl From<unigate_api::Error> for LoginFailure {
    fn from(source: unigate_api::Error) -> Self {
        let message = source
            .controller_message()
            .map_or_else(|| source.to_string(), str::to_owned);
        Self { message, source }
    }
}

// ── Typestate traits ────────────────────────────────────────────────

/// Entry point of the lifecycle: prepares a session against an endpoint.
pub trait Connector: Send + Sync {
    type Pending: PendingSession;

    fn initialize(
        &self,
        endpoint: &Url,
    ) -> impl Future<Output = Result<Self::Pending, unigate_api::Error>> + Send;
}

/// An initialized but not yet authenticated session.
pub trait PendingSession: Send {
    type Session: ControllerSession;

    fn login(
        self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<Self::Session, LoginFailure>> + Send;
}

/// An authenticated session. Only obtainable through [`PendingSession::login`].
pub trait ControllerSession: Sized + Send + Sync {
    /// Current name → address mapping, fetched in one call.
    fn list_names(&self) -> impl Future<Output = Result<NameIndex, unigate_api::Error>> + Send;

    fn block(&self, mac: &MacAddress)
    -> impl Future<Output = Result<(), unigate_api::Error>> + Send;

    fn unblock(
        &self,
        mac: &MacAddress,
    ) -> impl Future<Output = Result<(), unigate_api::Error>> + Send;

    /// Release controller-side state. Best effort; never fails the request.
    fn close(self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// The authenticated session type a connector ultimately yields.
pub type SessionOf<C> = <<C as Connector>::Pending as PendingSession>::Session;

// ── Lifecycle ───────────────────────────────────────────────────────

/// Initialize and log in, in that order.
///
/// Either failure is terminal: it is logged here, once, with the endpoint
/// and username (never the password), and no partial session escapes.
pub async fn open<C: Connector>(
    connector: &C,
    params: &SessionParams,
) -> Result<SessionOf<C>, CoreError> {
    let pending = match connector.initialize(&params.endpoint).await {
        Ok(pending) => pending,
        Err(source) => {
            error!(
                endpoint = %params.endpoint,
                username = %params.username,
                error = %source,
                transient = source.is_transient(),
                "unable to initialize controller session"
            );
            return Err(CoreError::SessionInit {
                endpoint: params.endpoint.to_string(),
                source,
            });
        }
    };

    match pending.login(&params.username, &params.password).await {
        Ok(session) => {
            debug!(endpoint = %params.endpoint, username = %params.username, "controller session established");
            Ok(session)
        }
        Err(LoginFailure { message, source }) => {
            error!(
                endpoint = %params.endpoint,
                username = %params.username,
                controller_message = %message,
                error = %source,
                "unable to log in to controller"
            );
            Err(CoreError::Login {
                endpoint: params.endpoint.to_string(),
                username: params.username.clone(),
                message,
                source,
            })
        }
    }
}

// ── Legacy API implementation ───────────────────────────────────────

/// Production connector: a fresh [`LegacyClient`] (own cookie jar, own
/// CSRF token) per session.
#[derive(Debug, Clone)]
pub struct LegacyConnector {
    site: String,
    platform: Option<ControllerPlatform>,
    transport: TransportConfig,
}

impl LegacyConnector {
    /// `platform: None` probes the controller on every initialize.
    pub fn new(
        site: impl Into<String>,
        platform: Option<ControllerPlatform>,
        mut transport: TransportConfig,
    ) -> Self {
        // A shared jar would leak one request's session into the next.
        transport.cookie_jar = None;
        Self {
            site: site.into(),
            platform,
            transport,
        }
    }
}

impl Connector for LegacyConnector {
    type Pending = PendingLegacySession;

    async fn initialize(&self, endpoint: &Url) -> Result<PendingLegacySession, unigate_api::Error> {
        let platform = match self.platform {
            Some(platform) => platform,
            None => LegacyClient::detect_platform(endpoint, &self.transport).await?,
        };
        debug!(endpoint = %endpoint, ?platform, site = %self.site, "initializing controller session");
        let client = LegacyClient::new(endpoint.clone(), self.site.clone(), platform, &self.transport)?;
        Ok(PendingLegacySession { client })
    }
}

/// Initialized legacy client awaiting login.
pub struct PendingLegacySession {
    client: LegacyClient,
}

impl PendingSession for PendingLegacySession {
    type Session = LegacySession;

    async fn login(
        self,
        username: &str,
        password: &SecretString,
    ) -> Result<LegacySession, LoginFailure> {
        self.client.login(username, password).await?;
        Ok(LegacySession {
            client: self.client,
        })
    }
}

/// Authenticated legacy session.
pub struct LegacySession {
    client: LegacyClient,
}

impl ControllerSession for LegacySession {
    async fn list_names(&self) -> Result<NameIndex, unigate_api::Error> {
        let users = self.client.list_known_clients().await?;
        let index: NameIndex = users
            .iter()
            .filter_map(|u| {
                u.display_name()
                    .map(|name| (name.to_owned(), MacAddress::normalized(&u.mac)))
            })
            .collect();
        debug!(records = users.len(), names = index.len(), "built name index");
        Ok(index)
    }

    async fn block(&self, mac: &MacAddress) -> Result<(), unigate_api::Error> {
        self.client.block_client(mac.as_str()).await
    }

    async fn unblock(&self, mac: &MacAddress) -> Result<(), unigate_api::Error> {
        self.client.unblock_client(mac.as_str()).await
    }

    async fn close(self) {
        if let Err(e) = self.client.logout().await {
            debug!(error = %e, "controller logout failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Connector whose steps fail on demand and count how far they got.
    #[derive(Default)]
    struct Scripted {
        fail_init: bool,
        fail_login: Option<&'static str>,
        logins: Arc<AtomicUsize>,
    }

    struct Pending {
        fail_login: Option<&'static str>,
        logins: Arc<AtomicUsize>,
    }

    struct Authed;

    impl Connector for Scripted {
        type Pending = Pending;

        async fn initialize(&self, _endpoint: &Url) -> Result<Pending, unigate_api::Error> {
            if self.fail_init {
                return Err(unigate_api::Error::Tls("no route".into()));
            }
            Ok(Pending {
                fail_login: self.fail_login,
                logins: Arc::clone(&self.logins),
            })
        }
    }

    impl PendingSession for Pending {
        type Session = Authed;

        async fn login(self, _u: &str, _p: &SecretString) -> Result<Authed, LoginFailure> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            match self.fail_login {
                Some(msg) => Err(unigate_api::Error::Authentication {
                    message: msg.into(),
                }
                .into()),
                None => Ok(Authed),
            }
        }
    }

    impl ControllerSession for Authed {
        async fn list_names(&self) -> Result<NameIndex, unigate_api::Error> {
            Ok(NameIndex::new())
        }
        async fn block(&self, _mac: &MacAddress) -> Result<(), unigate_api::Error> {
            Ok(())
        }
        async fn unblock(&self, _mac: &MacAddress) -> Result<(), unigate_api::Error> {
            Ok(())
        }
    }

    fn params() -> SessionParams {
        SessionParams {
            endpoint: Url::parse("https://192.168.1.1/").unwrap(),
            username: "admin".into(),
            password: SecretString::from("hunter2".to_string()),
        }
    }

    #[tokio::test]
    async fn open_runs_both_steps() {
        let connector = Scripted::default();
        assert!(open(&connector, &params()).await.is_ok());
        assert_eq!(connector.logins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn init_failure_skips_login() {
        let connector = Scripted {
            fail_init: true,
            ..Scripted::default()
        };
        let err = open(&connector, &params()).await.err().unwrap();
        assert!(matches!(err, CoreError::SessionInit { ref endpoint, .. } if endpoint == "https://192.168.1.1/"));
        assert_eq!(connector.logins.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn login_failure_carries_message() {
        let connector = Scripted {
            fail_login: Some("invalid credentials"),
            ..Scripted::default()
        };
        let err = open(&connector, &params()).await.err().unwrap();
        match err {
            CoreError::Login {
                message, username, ..
            } => {
                assert_eq!(message, "invalid credentials");
                assert_eq!(username, "admin");
            }
            other => panic!("expected Login error, got {other:?}"),
        }
    }

    #[test]
    fn params_debug_redacts_password() {
        let rendered = format!("{:?}", params());
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn connector_drops_shared_cookie_jar() {
        let connector = LegacyConnector::new(
            "default",
            None,
            TransportConfig::default().with_cookie_jar(),
        );
        assert!(connector.transport.cookie_jar.is_none());
    }
}
