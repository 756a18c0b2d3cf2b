//! In-memory service doubles that record every call
//!
//! Locks are `std::sync::Mutex`; a poisoned lock only happens after a test
//! already panicked.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::aws::arn::{policy_arn, role_arn};
use crate::aws::{AwsError, AwsResult, DataLakeService, IdentityService, RoleStore};
use crate::status::{
    DataLakeExceptionSummary, DataLakeSummary, LogSourceSummary, SubscriberSummary,
};
use crate::types::{CustomSourceRequest, RegisteredSource, RoleLookup};

pub(crate) const MOCK_ACCOUNT: &str = "123456789012";

pub(crate) struct MockIdentity {
    result: AwsResult<String>,
    calls: Mutex<usize>,
}

impl MockIdentity {
    pub(crate) fn account(account_id: &str) -> Self {
        Self {
            result: Ok(account_id.to_string()),
            calls: Mutex::new(0),
        }
    }

    pub(crate) fn failing(error: AwsError) -> Self {
        Self {
            result: Err(error),
            calls: Mutex::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl IdentityService for MockIdentity {
    async fn caller_account_id(&self) -> AwsResult<String> {
        *self.calls.lock().unwrap() += 1;
        self.result.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RoleCall {
    GetRole(String),
    CreateRole {
        role_name: String,
        trust_policy: String,
    },
    CreatePolicy {
        policy_name: String,
        policy_document: String,
    },
    AttachRolePolicy {
        role_name: String,
        policy_arn: String,
    },
}

pub(crate) struct MockRoleStore {
    lookup: RoleLookup,
    create_role_error: Option<AwsError>,
    existing_policies: HashSet<String>,
    create_policy_error: Option<AwsError>,
    attach_error: Option<AwsError>,
    calls: Mutex<Vec<RoleCall>>,
}

impl MockRoleStore {
    pub(crate) fn with_lookup(lookup: RoleLookup) -> Self {
        Self {
            lookup,
            create_role_error: None,
            existing_policies: HashSet::new(),
            create_policy_error: None,
            attach_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn absent() -> Self {
        Self::with_lookup(RoleLookup::Absent)
    }

    pub(crate) fn existing(role_name: &str) -> Self {
        Self::with_lookup(RoleLookup::Exists {
            arn: role_arn("aws", MOCK_ACCOUNT, role_name),
        })
    }

    pub(crate) fn fail_create_role(mut self, error: AwsError) -> Self {
        self.create_role_error = Some(error);
        self
    }

    /// `CreatePolicy` for this name reports `EntityAlreadyExists`.
    pub(crate) fn with_existing_policy(mut self, policy_name: &str) -> Self {
        self.existing_policies.insert(policy_name.to_string());
        self
    }

    pub(crate) fn fail_create_policy(mut self, error: AwsError) -> Self {
        self.create_policy_error = Some(error);
        self
    }

    pub(crate) fn fail_attach(mut self, error: AwsError) -> Self {
        self.attach_error = Some(error);
        self
    }

    pub(crate) fn calls(&self) -> Vec<RoleCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RoleCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RoleStore for MockRoleStore {
    async fn get_role(&self, role_name: &str) -> RoleLookup {
        self.record(RoleCall::GetRole(role_name.to_string()));
        self.lookup.clone()
    }

    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        _description: &str,
    ) -> AwsResult<String> {
        self.record(RoleCall::CreateRole {
            role_name: role_name.to_string(),
            trust_policy: trust_policy.to_string(),
        });
        match &self.create_role_error {
            Some(error) => Err(error.clone()),
            None => Ok(role_arn("aws", MOCK_ACCOUNT, role_name)),
        }
    }

    async fn create_policy(
        &self,
        policy_name: &str,
        policy_document: &str,
        _description: &str,
    ) -> AwsResult<String> {
        self.record(RoleCall::CreatePolicy {
            policy_name: policy_name.to_string(),
            policy_document: policy_document.to_string(),
        });
        if self.existing_policies.contains(policy_name) {
            return Err(AwsError::service(
                "EntityAlreadyExists",
                format!("A policy called {policy_name} already exists."),
            ));
        }
        if let Some(error) = &self.create_policy_error {
            return Err(error.clone());
        }
        Ok(policy_arn("aws", MOCK_ACCOUNT, policy_name))
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()> {
        self.record(RoleCall::AttachRolePolicy {
            role_name: role_name.to_string(),
            policy_arn: policy_arn.to_string(),
        });
        match &self.attach_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub(crate) struct MockDataLake {
    create_error: Mutex<Option<AwsError>>,
    listing_error: Mutex<Option<AwsError>>,
    exceptions: Mutex<Vec<DataLakeExceptionSummary>>,
    subscribers: Mutex<Vec<SubscriberSummary>>,
    requests: Mutex<Vec<CustomSourceRequest>>,
}

impl MockDataLake {
    pub(crate) fn fail_create(&self, error: AwsError) {
        *self.create_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_listing(&self, error: AwsError) {
        *self.listing_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn set_exceptions(&self, exceptions: Vec<DataLakeExceptionSummary>) {
        *self.exceptions.lock().unwrap() = exceptions;
    }

    pub(crate) fn set_subscribers(&self, subscribers: Vec<SubscriberSummary>) {
        *self.subscribers.lock().unwrap() = subscribers;
    }

    pub(crate) fn requests(&self) -> Vec<CustomSourceRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn listing(&self) -> AwsResult<()> {
        match self.listing_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataLakeService for MockDataLake {
    async fn create_custom_log_source(
        &self,
        request: &CustomSourceRequest,
    ) -> AwsResult<RegisteredSource> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(error) = self.create_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(RegisteredSource {
            source_name: Some(request.source_name.clone()),
            source_version: Some("2.0".to_string()),
            provider_role_arn: Some(format!(
                "arn:aws:iam::{}:role/AmazonSecurityLake-Provider-{}-{}",
                request.account_id, request.source_name, request.region
            )),
            location: Some(format!(
                "s3://aws-security-data-lake-{}-test/ext/{}/",
                request.region, request.source_name
            )),
            ..RegisteredSource::default()
        })
    }

    async fn list_data_lakes(&self, region: &str) -> AwsResult<Vec<DataLakeSummary>> {
        self.listing()?;
        Ok(vec![DataLakeSummary {
            arn: format!("arn:aws:securitylake:{region}:{MOCK_ACCOUNT}:data-lake/default"),
            region: region.to_string(),
            s3_bucket_arn: Some(format!("arn:aws:s3:::aws-security-data-lake-{region}-test")),
            create_status: Some("COMPLETED".to_string()),
            kms_key_id: None,
        }])
    }

    async fn list_data_lake_exceptions(
        &self,
        _region: &str,
    ) -> AwsResult<Vec<DataLakeExceptionSummary>> {
        self.listing()?;
        Ok(self.exceptions.lock().unwrap().clone())
    }

    async fn list_log_sources(&self, _region: &str) -> AwsResult<Vec<LogSourceSummary>> {
        self.listing()?;
        Ok(Vec::new())
    }

    async fn list_subscribers(&self, _region: &str) -> AwsResult<Vec<SubscriberSummary>> {
        self.listing()?;
        Ok(self.subscribers.lock().unwrap().clone())
    }
}
