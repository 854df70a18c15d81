pub mod mirror;
pub mod payment;
pub mod registration;

pub use mirror::{spawn_mirror_worker, MirrorHandle};
pub use payment::{PaymentService, PaymentStatus, PaymentSummary};
pub use registration::RegistrationService;
