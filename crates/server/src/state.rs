use std::sync::Arc;

use service::signature::{repository::SignatureRepository, service::PetitionService};

/// Shared handler state; the petition service owns the storage gate.
#[derive(Clone)]
pub struct ServerState {
    pub petition: Arc<PetitionService<dyn SignatureRepository>>,
}

impl ServerState {
    pub fn new(petition: PetitionService<dyn SignatureRepository>) -> Self {
        Self { petition: Arc::new(petition) }
    }
}
