use serde::{Deserialize, Serialize};

use crate::pagination::{Links, Pagination};

pub use models::signature::{Model as Signature, NewSignature};

/// Title of the page shown when an insert is refused.
pub const ALREADY_SIGNED_TITLE: &str = "Gat ekki skráð!";
/// Body of the page shown when an insert is refused.
pub const ALREADY_SIGNED_TEXT: &str = "Hafðir þú skrifað undir áður?";

/// Form fields exactly as the visitor submitted them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "nationalId")]
    pub national_id: String,
    #[serde(default)]
    pub comment: String,
    /// Checkbox value; absent when unticked.
    #[serde(default)]
    pub anonymous: Option<String>,
}

/// One violated rule, reported against the raw value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub msg: &'static str,
    pub value: String,
}

/// One page of signatures plus what the view needs to navigate.
#[derive(Clone, Debug, Serialize)]
pub struct Listing {
    pub signatures: Vec<Signature>,
    pub links: Links,
    pub pagination: Pagination,
    pub counted: u64,
}

/// Terminal state of one submission.
#[derive(Debug)]
pub enum Submission {
    Accepted(Signature),
    /// Validation failed; nothing was sanitized or stored.
    Rejected {
        form: SignatureForm,
        errors: Vec<FieldError>,
        listing: Listing,
    },
    /// Duplicate national id or a storage fault.
    AlreadySigned,
}
