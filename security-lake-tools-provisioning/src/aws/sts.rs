//! STS helpers for caller identity

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sts::Client as StsClient;

use crate::aws::{normalize, AwsError, AwsResult, IdentityService};

pub struct StsIdentityService {
    client: StsClient,
}

impl StsIdentityService {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: StsClient::new(config),
        }
    }
}

#[async_trait]
impl IdentityService for StsIdentityService {
    /// Return the current caller account ID using STS GetCallerIdentity.
    async fn caller_account_id(&self) -> AwsResult<String> {
        let out = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| normalize("STS GetCallerIdentity", e))?;
        let acct = out
            .account()
            .map(std::string::ToString::to_string)
            .ok_or_else(|| AwsError::local("STS GetCallerIdentity missing Account"))?;
        Ok(acct)
    }
}
