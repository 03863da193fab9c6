pub mod config;
pub mod dialog;
pub mod domain;
pub mod errors;
pub mod search;
pub mod timex;

pub use dialog::date_resolver::{DateResolver, ResolverEntry, ResolverTurn};
pub use dialog::engine::{DialogError, DialogOutcome, DialogState, DialogTurn, QueryDialog};
pub use domain::query::{Slot, StatusQuery};
pub use domain::recognition::{ExtractedEntities, Intent, RecognizedUtterance};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use search::query::QueryExpression;
pub use search::records::{ExecutionRecord, ExecutionTally};
pub use timex::{ResolvedTimex, TimexExpression, TimexKind};
