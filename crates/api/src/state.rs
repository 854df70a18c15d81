use std::sync::Arc;

use portal_infra::rules::DEFAULT_MAX_COACHES;
use portal_infra::store::RegistrationStore;

use crate::auth::JwtService;
use crate::services::{MirrorHandle, PaymentService, RegistrationService};
use crate::sheets::SheetMirror;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RegistrationStore>,
    jwt_service: JwtService,
    mirror: MirrorHandle,
    sheets: Option<SheetMirror>,
    max_coaches: usize,
}

impl AppState {
    /// State with the mirror disabled and the default coach cap.
    pub fn new(store: Arc<dyn RegistrationStore>, jwt_service: JwtService) -> Self {
        Self {
            store,
            jwt_service,
            mirror: MirrorHandle::disabled(),
            sheets: None,
            max_coaches: DEFAULT_MAX_COACHES,
        }
    }

    /// Queue used by the registration workflow.
    pub fn with_mirror(mut self, mirror: MirrorHandle) -> Self {
        self.mirror = mirror;
        self
    }

    /// Spreadsheet access for the synchronous mirror endpoints.
    pub fn with_sheets(mut self, sheets: SheetMirror) -> Self {
        self.sheets = Some(sheets);
        self
    }

    pub fn with_max_coaches(mut self, max_coaches: usize) -> Self {
        self.max_coaches = max_coaches;
        self
    }

    pub fn store(&self) -> &Arc<dyn RegistrationStore> {
        &self.store
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn sheets(&self) -> Option<&SheetMirror> {
        self.sheets.as_ref()
    }

    pub fn registration(&self) -> RegistrationService {
        RegistrationService::new(self.store.clone(), self.mirror.clone(), self.max_coaches)
    }

    pub fn payments(&self) -> PaymentService {
        PaymentService::new(self.store.clone())
    }
}
