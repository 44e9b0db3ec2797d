//! Service layer for the petition: the submission pipeline and the paginated listing.
//! - Validation, XSS filtering and format normalization run before anything is stored.
//! - Storage goes through the `SignatureRepository` gate only.
//! - Orchestrators are independent of the web framework.

pub mod errors;
pub mod pagination;
pub mod signature;
#[cfg(test)]
pub mod test_support;
