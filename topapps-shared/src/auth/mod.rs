/// Authentication utilities
///
/// Sign-in and token issuance happen in the platform's auth service. This
/// crate only validates the bearer tokens it hands out so the API can tell
/// which user is asking for their member or owner listing.
///
/// - [`jwt`]: HS256 access-token claims and validation

pub mod jwt;
