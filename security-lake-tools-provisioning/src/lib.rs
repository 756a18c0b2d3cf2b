//! Security Lake Tools provisioning library
//!
//! Registers Amazon Security Lake custom sources for OCSF event classes and
//! prepares the AWS Glue crawler role those sources depend on.

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aws;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod naming;
pub mod provision;
pub mod status;
pub mod synthesis;
pub mod types;

pub use catalog::{EventClass, EventClassCatalog, EventClassCategory};
pub use classify::{classify, Classification, FailureCategory, Stage};
pub use error::{ProvisioningError, ProvisioningResult, RequestError};
pub use provision::Provisioner;
pub use status::{collect_status, StatusReport, SubscriberSummary};
pub use types::{
    ProvisionOptions, ProvisioningOutcome, ProvisioningRequest, RegisteredSource, Registration,
    RoleLookup, RoleOutcome,
};
