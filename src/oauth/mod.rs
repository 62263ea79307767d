//! OAuth 1.0a for the Yahoo Fantasy Sports APIs
//!
//! - `encoding`: parameter percent-encoding
//! - `token`: credential record and validity windows
//! - `request`: HMAC-SHA1 signing of the `Authorization` header
//! - `token_request` / `client`: request token, verifier exchange, refresh
//! - `api_request`: signed data requests with token invalidation
//! - `authenticator`: token lifecycle per account

pub mod api_request;
pub mod authenticator;
pub mod client;
pub mod encoding;
pub mod request;
pub mod token;
pub mod token_request;

pub use api_request::{ApiAuth, OAuthApiRequest, TokenInvalidator};
pub use authenticator::{
    AccountAuthenticator, AccountStore, AddAccountResponse, AuthNotifier, AuthTokenResponse,
    AuthTokenSource, CallerIdentity, LogNotifier, TokenRefresher, ACCOUNT_TYPE_YAHOO,
    ERROR_CODE_BAD_AUTHENTICATION, ERROR_CODE_CANCELED, TOKEN_TYPE_OAUTH,
};
pub use client::{OAuthClient, OAuthConfig};
pub use request::{Consumer, HttpMethod, OAuthRequest};
pub use token::{Token, TokenState};
