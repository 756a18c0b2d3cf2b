//! IAM role store backed by the AWS SDK

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_iam::Client as IamClient;
use log::debug;

use crate::aws::{normalize, AwsError, AwsResult, RoleStore};
use crate::types::RoleLookup;

/// IAM error code for a role that does not exist
const NO_SUCH_ENTITY: &str = "NoSuchEntity";

pub struct IamRoleStore {
    client: IamClient,
}

impl IamRoleStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: IamClient::new(config),
        }
    }
}

#[async_trait]
impl RoleStore for IamRoleStore {
    async fn get_role(&self, role_name: &str) -> RoleLookup {
        match self.client.get_role().role_name(role_name).send().await {
            Ok(out) => match out.role() {
                Some(role) => RoleLookup::Exists {
                    arn: role.arn().to_string(),
                },
                None => RoleLookup::Indeterminate(AwsError::local(
                    "IAM GetRole response missing Role",
                )),
            },
            Err(e) => {
                let error = normalize("IAM GetRole", e);
                if error.is_code(NO_SUCH_ENTITY) {
                    debug!("Role {role_name} not found");
                    RoleLookup::Absent
                } else {
                    RoleLookup::Indeterminate(error)
                }
            }
        }
    }

    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        description: &str,
    ) -> AwsResult<String> {
        let out = self
            .client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(trust_policy)
            .description(description)
            .send()
            .await
            .map_err(|e| normalize("IAM CreateRole", e))?;

        out.role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| AwsError::local("IAM CreateRole response missing Role"))
    }

    async fn create_policy(
        &self,
        policy_name: &str,
        policy_document: &str,
        description: &str,
    ) -> AwsResult<String> {
        let out = self
            .client
            .create_policy()
            .policy_name(policy_name)
            .policy_document(policy_document)
            .description(description)
            .send()
            .await
            .map_err(|e| normalize("IAM CreatePolicy", e))?;

        out.policy()
            .and_then(|policy| policy.arn())
            .map(str::to_string)
            .ok_or_else(|| AwsError::local("IAM CreatePolicy response missing policy ARN"))
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| normalize("IAM AttachRolePolicy", e))?;
        Ok(())
    }
}
