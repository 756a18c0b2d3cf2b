//! Core type definitions for provisioning Security Lake custom sources

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aws::arn::{is_valid_account_id, RoleArn};
use crate::aws::AwsError;
use crate::error::RequestError;

/// IAM policy language version used for every generated document
pub const POLICY_VERSION: &str = "2012-10-17";

/// Operator intent for a single `create-source` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub class_uid: u32,
    pub region: String,
    pub account_id: Option<String>,
    pub external_id: String,
    pub glue_role_arn: Option<String>,
}

impl ProvisioningRequest {
    /// Check the request before any remote call is made.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.region.trim().is_empty() {
            return Err(RequestError::MissingRegion);
        }
        if self.external_id.trim().is_empty() {
            return Err(RequestError::MissingExternalId);
        }
        if let Some(account_id) = &self.account_id {
            if !is_valid_account_id(account_id) {
                return Err(RequestError::InvalidAccountId(account_id.clone()));
            }
        }
        if let Some(role_arn) = &self.glue_role_arn {
            RoleArn::parse(role_arn)?;
        }
        Ok(())
    }
}

/// Behavioural switches for the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Do not look the Glue role up at all
    pub skip_role_check: bool,
    /// Create the Glue role when the lookup reports it absent
    pub create_role: bool,
    /// Fixed pause after creating a role so IAM can propagate it
    pub role_propagation_delay: Duration,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            skip_role_check: false,
            create_role: true,
            role_propagation_delay: Duration::from_secs(5),
        }
    }
}

/// Result of looking up a role by name.
///
/// `Indeterminate` means the lookup itself failed for a reason other than
/// absence and must never be treated as `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLookup {
    Exists { arn: String },
    Absent,
    Indeterminate(AwsError),
}

/// How the Glue role became ready for registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOutcome {
    Verified,
    Created,
    Skipped,
}

/// Registration request sent to Security Lake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSourceRequest {
    pub source_name: String,
    pub region: String,
    pub event_class: Option<String>,
    pub account_id: String,
    pub external_id: String,
    pub glue_role_arn: String,
}

/// Resource identifiers reported back by Security Lake
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredSource {
    pub source_name: Option<String>,
    pub source_version: Option<String>,
    pub provider_role_arn: Option<String>,
    pub location: Option<String>,
    pub crawler_arn: Option<String>,
    pub database_arn: Option<String>,
    pub table_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(RegisteredSource),
    /// A source with this name was already registered; the desired state holds.
    AlreadyExists,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningOutcome {
    pub source_name: String,
    pub event_class: Option<String>,
    pub account_id: String,
    pub region: String,
    pub glue_role_arn: String,
    pub role: RoleOutcome,
    pub provider_role_name: String,
    pub registration: Registration,
}

/// Policy statement structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<ServicePrincipal>,
    pub action: StringOrList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<StringOrList>,
    /// Operator → condition key → value, e.g. `StringEquals` → `sts:ExternalId`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<BTreeMap<String, BTreeMap<String, String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ServicePrincipal {
    pub service: String,
}

/// Action or Resource can be a single string or list of strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StringOrList {
    Single(String),
    Multiple(Vec<String>),
}

impl StringOrList {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(single) => single == value,
            Self::Multiple(values) => values.iter().any(|v| v == value),
        }
    }
}

/// Policy document structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProvisioningRequest {
        ProvisioningRequest {
            class_uid: 1001,
            region: "us-east-1".to_string(),
            account_id: Some("123456789012".to_string()),
            external_id: "test-ext".to_string(),
            glue_role_arn: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_blank_external_id_rejected() {
        let mut req = request();
        req.external_id = "   ".to_string();
        assert_eq!(req.validate(), Err(RequestError::MissingExternalId));
    }

    #[test]
    fn test_malformed_account_id_rejected() {
        let mut req = request();
        req.account_id = Some("12345".to_string());
        assert_eq!(
            req.validate(),
            Err(RequestError::InvalidAccountId("12345".to_string()))
        );
    }

    #[test]
    fn test_malformed_role_arn_rejected() {
        let mut req = request();
        req.glue_role_arn = Some("arn:aws:s3:::bucket".to_string());
        assert!(matches!(
            req.validate(),
            Err(RequestError::InvalidRoleArn(_))
        ));
    }

    #[test]
    fn test_default_options() {
        let options = ProvisionOptions::default();
        assert!(!options.skip_role_check);
        assert!(options.create_role);
        assert_eq!(options.role_propagation_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_policy_document_serialization() {
        let doc = PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                sid: None,
                effect: "Allow".to_string(),
                principal: None,
                action: StringOrList::Multiple(vec![
                    "s3:GetObject".to_string(),
                    "s3:PutObject".to_string(),
                ]),
                resource: Some(StringOrList::Single("*".to_string())),
                condition: None,
            }],
        };

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"Version\":\"2012-10-17\""));
        assert!(json.contains("\"Action\":[\"s3:GetObject\",\"s3:PutObject\"]"));
        assert!(json.contains("\"Resource\":\"*\""));
        // Optional members are omitted rather than serialized as null
        assert!(!json.contains("Sid"));
        assert!(!json.contains("Condition"));
    }

    #[test]
    fn test_string_or_list_contains() {
        let single = StringOrList::Single("sts:AssumeRole".to_string());
        assert!(single.contains("sts:AssumeRole"));
        let multiple = StringOrList::Multiple(vec!["a".to_string(), "b".to_string()]);
        assert!(multiple.contains("b"));
        assert!(!multiple.contains("c"));
    }
}
