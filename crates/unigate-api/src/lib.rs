// unigate-api: session client for the UniFi controller legacy API
//
// Only the slice of the legacy surface the gate needs: platform detection,
// cookie/CSRF session login, the known-client listing used to map device
// names to MAC addresses, and the `cmd/stamgr` block/unblock commands.

pub mod auth;
pub mod error;
pub mod legacy;
pub mod transport;

pub use auth::ControllerPlatform;
pub use error::Error;
pub use legacy::LegacyClient;
pub use legacy::models::LegacyUserEntry;
pub use transport::{TlsMode, TransportConfig};
