//! Business logic that sits between the HTTP handlers and the store.

pub mod checkout;
pub mod clock;
pub mod codes;
pub mod sweeper;
pub mod verification;

pub use checkout::record_purchase;
pub use clock::{Clock, ManualClock, SystemClock};
pub use codes::{CodeGenerator, RandomCodeGenerator, SequenceCodeGenerator};
pub use sweeper::spawn_sweeper;
pub use verification::{CashierVerification, VerifyOutcome};
