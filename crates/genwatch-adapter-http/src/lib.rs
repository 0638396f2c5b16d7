//! # Genwatch HTTP Adapter
//!
//! Authenticated HTTP access to the generator controller's embedded web server.
//!
//! ## Wire Rules
//!
//! - Plain HTTP GET against `http://<host><path>`
//! - `Authorization: Basic base64(admin:<password>)` on every request,
//!   computed once from the configured password
//! - Writes are `GET /wr_logical.cgi?@<register>=<value>`
//!
//! Non-200 responses are returned as ordinary [`EndpointResponse`] values;
//! only network-level failures become [`TransportError`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod sender;
pub mod transport;

pub use auth::{authorization_header, decode_credentials, encode_credentials};
pub use sender::CommandSender;
pub use transport::{EndpointResponse, HttpTransport, Transport, TransportConfig, TransportError};
