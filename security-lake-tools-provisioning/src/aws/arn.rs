//! Account id, partition and IAM ARN helpers

use std::sync::OnceLock;

use regex::Regex;

use crate::error::RequestError;

/// `true` for a well-formed 12-digit AWS account id
pub fn is_valid_account_id(account_id: &str) -> bool {
    static ACCOUNT_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    ACCOUNT_ID_REGEX
        .get_or_init(|| Regex::new(r"^[0-9]{12}$").expect("account id pattern is valid"))
        .is_match(account_id)
}

/// Partition for a region name; unknown prefixes fall back to the commercial partition.
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else if region.starts_with("us-isob-") {
        "aws-iso-b"
    } else if region.starts_with("us-iso-") {
        "aws-iso"
    } else {
        "aws"
    }
}

pub fn role_arn(partition: &str, account_id: &str, role_name: &str) -> String {
    format!("arn:{partition}:iam::{account_id}:role/{role_name}")
}

pub fn policy_arn(partition: &str, account_id: &str, policy_name: &str) -> String {
    format!("arn:{partition}:iam::{account_id}:policy/{policy_name}")
}

/// AWS managed policy ARN, e.g. `service-role/AWSGlueServiceRole`
pub fn managed_policy_arn(partition: &str, policy_path_and_name: &str) -> String {
    format!("arn:{partition}:iam::aws:policy/{policy_path_and_name}")
}

/// A parsed IAM role ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleArn {
    pub partition: String,
    pub account_id: String,
    /// Role name without its path
    pub name: String,
}

impl RoleArn {
    pub fn parse(arn: &str) -> Result<Self, RequestError> {
        let invalid = |reason: &str| RequestError::InvalidRoleArn(format!("{arn}: {reason}"));

        // arn:partition:service:region:account:resource
        let parts: Vec<&str> = arn.splitn(6, ':').collect();
        if parts.len() < 6 || parts[0] != "arn" {
            return Err(invalid("expected arn:<partition>:iam::<account>:role/<name>"));
        }
        if parts[1].is_empty() {
            return Err(invalid("missing partition"));
        }
        if parts[2] != "iam" {
            return Err(invalid("not an IAM ARN"));
        }
        if !is_valid_account_id(parts[4]) {
            return Err(invalid("account id must be 12 digits"));
        }
        let resource = parts[5];
        let Some(path_and_name) = resource.strip_prefix("role/") else {
            return Err(invalid("not a role ARN"));
        };
        let name = path_and_name.rsplit('/').next().unwrap_or_default();
        if name.is_empty() {
            return Err(invalid("missing role name"));
        }

        Ok(Self {
            partition: parts[1].to_string(),
            account_id: parts[4].to_string(),
            name: name.to_string(),
        })
    }
}
