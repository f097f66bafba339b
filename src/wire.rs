//! Wire-level names used on authorization redirects and token requests.
//!
//! The ACDC draft (`draft-acdc-01`) never names the response parameter carrying the
//! cross-domain code and ships no non-normative examples. `code` follows the OAuth 2.0
//! authorization code convention, and `assertion` follows the JWT authorization grant
//! profile (RFC 7523). Treat both as provisional until the draft settles.

/// Response parameter carrying the cross-domain code.
pub const CODE: &str = "code";
/// Response parameter echoing the client's `state`.
pub const STATE: &str = "state";
/// Response parameter carrying the OAuth 2.0 error code.
pub const ERROR: &str = "error";
/// Response parameter carrying the human-readable error description.
pub const ERROR_DESCRIPTION: &str = "error_description";
/// Response parameter carrying the error page URI.
pub const ERROR_URI: &str = "error_uri";

/// Token request parameter carrying the cross-domain code.
pub const ASSERTION: &str = "assertion";
/// Token request parameter carrying the PKCE verifier.
pub const CODE_VERIFIER: &str = "code_verifier";
/// Misspelled verifier parameter found in earlier drafts; accepted as an alias.
pub const CODE_VERIFYER: &str = "code_verifyer";

/// Token envelope field carrying the access token.
pub const ACCESS_TOKEN: &str = "access_token";
/// Token envelope field carrying the refresh token.
pub const REFRESH_TOKEN: &str = "refresh_token";
/// Token envelope field carrying the token type.
pub const TOKEN_TYPE: &str = "token_type";
/// Token type applied when the issuer does not provide one.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Response mode used when the request does not name one.
pub const DEFAULT_RESPONSE_MODE: &str = "query";

/// `invalid_request` error code.
pub const INVALID_REQUEST: &str = "invalid_request";
/// `invalid_client` error code.
pub const INVALID_CLIENT: &str = "invalid_client";
/// `invalid_grant` error code.
pub const INVALID_GRANT: &str = "invalid_grant";
/// `invalid_scope` error code.
pub const INVALID_SCOPE: &str = "invalid_scope";
/// `unauthorized_client` error code.
pub const UNAUTHORIZED_CLIENT: &str = "unauthorized_client";
/// `access_denied` error code.
pub const ACCESS_DENIED: &str = "access_denied";
/// `unsupported_response_type` error code.
pub const UNSUPPORTED_RESPONSE_TYPE: &str = "unsupported_response_type";
/// `unsupported_response_mode` error code (OpenID mailing-list convention, not normative).
pub const UNSUPPORTED_RESPONSE_MODE: &str = "unsupported_response_mode";
/// `unsupported_grant_type` error code.
pub const UNSUPPORTED_GRANT_TYPE: &str = "unsupported_grant_type";
/// `temporarily_unavailable` error code.
pub const TEMPORARILY_UNAVAILABLE: &str = "temporarily_unavailable";
/// `server_error` error code, used for uncoded failures.
pub const SERVER_ERROR: &str = "server_error";
