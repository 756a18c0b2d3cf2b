//! AWS service contracts and their SDK-backed implementations
//!
//! The orchestrator only talks to the traits in this module. Each SDK
//! adapter normalizes failures into an [`AwsError`] at the call site so the
//! classifier never sees provider-specific error types.

use std::fmt;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_iam::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_smithy_runtime_api::client::result::SdkError;

use crate::status::{
    DataLakeExceptionSummary, DataLakeSummary, LogSourceSummary, SubscriberSummary,
};
use crate::types::{CustomSourceRequest, RegisteredSource, RoleLookup};

pub mod arn;
pub mod iam;
#[cfg(test)]
pub(crate) mod mock;
pub mod security_lake;
pub mod sts;

pub use iam::IamRoleStore;
pub use security_lake::SecurityLakeService;
pub use sts::StsIdentityService;

/// A remote failure normalized into a (code, message) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsError {
    /// Service error code, absent for transport or credential failures
    pub code: Option<String>,
    pub message: String,
}

impl AwsError {
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Some(code.into()), message)
    }

    /// Failure without a service error code (transport, credentials, bad response)
    pub fn local(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    pub fn is_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl fmt::Display for AwsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for AwsError {}

/// Result type alias
pub type AwsResult<T> = Result<T, AwsError>;

/// Normalize an SDK error, keeping the full context chain when the service
/// did not supply a message (credential and dispatch failures).
pub(crate) fn normalize<E, R>(operation: &str, err: SdkError<E, R>) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => format!("{operation} failed: {}", DisplayErrorContext(&err)),
    };
    AwsError { code, message }
}

/// Caller identity ("who am I")
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn caller_account_id(&self) -> AwsResult<String>;
}

/// IAM role and policy operations needed for the Glue crawler role
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Tri-state lookup; never fails, an unexplained failure is `Indeterminate`.
    async fn get_role(&self, role_name: &str) -> RoleLookup;

    /// Create a role, returning its ARN
    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        description: &str,
    ) -> AwsResult<String>;

    /// Create a customer managed policy, returning its ARN
    async fn create_policy(
        &self,
        policy_name: &str,
        policy_document: &str,
        description: &str,
    ) -> AwsResult<String>;

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()>;
}

/// Security Lake operations
#[async_trait]
pub trait DataLakeService: Send + Sync {
    async fn create_custom_log_source(
        &self,
        request: &CustomSourceRequest,
    ) -> AwsResult<RegisteredSource>;

    async fn list_data_lakes(&self, region: &str) -> AwsResult<Vec<DataLakeSummary>>;

    async fn list_data_lake_exceptions(
        &self,
        region: &str,
    ) -> AwsResult<Vec<DataLakeExceptionSummary>>;

    async fn list_log_sources(&self, region: &str) -> AwsResult<Vec<LogSourceSummary>>;

    async fn list_subscribers(&self, region: &str) -> AwsResult<Vec<SubscriberSummary>>;
}

/// Load the shared AWS configuration, optionally pinned to a profile and region.
pub async fn load_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_code() {
        let err = AwsError::service("NoSuchEntity", "The role cannot be found");
        assert_eq!(err.to_string(), "NoSuchEntity: The role cannot be found");
        assert!(err.is_code("NoSuchEntity"));
    }

    #[test]
    fn test_display_without_code() {
        let err = AwsError::local("dispatch failure");
        assert_eq!(err.to_string(), "dispatch failure");
        assert!(!err.is_code("NoSuchEntity"));
    }
}
