pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod forms;
pub mod reports;
pub mod store;
pub mod telemetry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{Institution, Professor, Vacancy, VacancyStatus};
pub use reports::{ReportFormat, ReportGenerator, ReportKind};
pub use store::{Database, Repository, StoreError};
