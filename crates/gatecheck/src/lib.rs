//! `gatecheck` - Vehicle inspection capture engine
//!
//! This library provides the conditional question-driven form engine behind a
//! vehicle-inspection workflow: a declarative question catalog with branching
//! fields, an answer store with dependency-aware clearing, a pure validation
//! predicate gating submission, and an atomic submission pipeline that ships
//! answers plus identity/location/time context to a backend.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod answers;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod notify;
pub mod records;
pub mod submit;
pub mod validate;

pub use answers::{AnswerStore, QuestionStatus};
pub use catalog::{security_catalog, Catalog, Domain, Question};
pub use config::Config;
pub use context::{Clock, GeoFix, LocationProvider, StaffIdentity, SubmissionContext, SystemClock};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use submit::{FormSession, SubmitOutcome, SubmitPipeline, SubmitState, SubmissionPayload};
pub use validate::{is_valid, MIN_REMARKS_CHARS};
