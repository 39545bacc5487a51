//! Authorization header schemes

use crate::identity::Identity;
use crate::io::Headers;

pub const AUTHORIZATION: &str = "Authorization";

/// Turns the logged-in identity into request headers.
///
/// Request signing (an HMAC over the request and an `x-date` header) would be
/// another implementation of this trait; none exists yet.
pub trait AuthScheme: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn headers(&self, identity: &Identity) -> Headers;
}

/// `Authorization: username=<u>;api-key=<k>`
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiKeyScheme;

impl AuthScheme for ApiKeyScheme {
    fn name(&self) -> &str {
        "api-key"
    }

    fn headers(&self, identity: &Identity) -> Headers {
        vec![(
            AUTHORIZATION.to_string(),
            format!(
                "username={};api-key={}",
                identity.username, identity.api_key
            ),
        )]
    }
}
