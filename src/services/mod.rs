//! Business logic services module.

pub mod cfp;
pub mod funds;
pub mod report;
pub mod scanner;
pub mod stamp;

pub use cfp::{CfpRegistry, CfpService, OnChainCfp};
pub use funds::FundsService;
pub use report::{OutputFormat, ReportWriter};
pub use scanner::{BlockSource, ReportingSet, ScanOptions, TransferScanner};
pub use stamp::{OnChainStamper, StampRegistry, StampService};
