//! Error types for Security Lake provisioning

use thiserror::Error;

use crate::aws::AwsError;
use crate::classify::{
    classify, classify_indeterminate_lookup, classify_missing_role, Classification,
    FailureCategory, Stage,
};

/// Operator input that is rejected before any remote call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("--external-id is required")]
    MissingExternalId,

    #[error("a region is required")]
    MissingRegion,

    #[error("invalid account id '{0}': expected 12 digits")]
    InvalidAccountId(String),

    #[error("invalid Glue role ARN {0}")]
    InvalidRoleArn(String),
}

/// Terminal failure of a provisioning run
#[derive(Error, Debug)]
pub enum ProvisioningError {
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("Failed {stage}: {error}")]
    Remote {
        stage: Stage,
        error: AwsError,
        classification: Classification,
    },

    #[error("Glue role does not exist and role creation is disabled: {role_arn}")]
    RoleMissing {
        role_arn: String,
        classification: Classification,
    },

    #[error("Could not verify Glue role {role_name}: {error}")]
    RoleLookupIndeterminate {
        role_name: String,
        error: AwsError,
        classification: Classification,
    },

    /// The role was created but is not fully functional; nothing is rolled back.
    #[error(
        "Glue role {role_name} ({role_arn}) was created but {stage} failed: {error}. \
         The role exists without its full permissions"
    )]
    PartialRole {
        role_name: String,
        role_arn: String,
        stage: Stage,
        error: AwsError,
        classification: Classification,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

impl ProvisioningError {
    /// Classify a remote failure at the call site that produced it
    pub fn remote(stage: Stage, error: AwsError) -> Self {
        let classification = classify(stage, &error);
        Self::Remote {
            stage,
            error,
            classification,
        }
    }

    pub fn role_missing(role_arn: impl Into<String>) -> Self {
        let role_arn = role_arn.into();
        Self::RoleMissing {
            classification: classify_missing_role(&role_arn),
            role_arn,
        }
    }

    pub fn role_lookup_indeterminate(role_name: impl Into<String>, error: AwsError) -> Self {
        let role_name = role_name.into();
        Self::RoleLookupIndeterminate {
            classification: classify_indeterminate_lookup(&role_name, &error),
            role_name,
            error,
        }
    }

    pub fn partial_role(
        role_name: impl Into<String>,
        role_arn: impl Into<String>,
        stage: Stage,
        error: AwsError,
    ) -> Self {
        Self::PartialRole {
            classification: classify(stage, &error),
            role_name: role_name.into(),
            role_arn: role_arn.into(),
            stage,
            error,
        }
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Remote { classification, .. }
            | Self::RoleMissing { classification, .. }
            | Self::RoleLookupIndeterminate { classification, .. }
            | Self::PartialRole { classification, .. } => Some(classification),
            Self::Request(_) | Self::Serialization(_) => None,
        }
    }

    /// Failure category; `None` for errors that never reached a remote service
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            Self::Serialization(_) => Some(FailureCategory::Unclassified),
            _ => self.classification().map(|c| c.category),
        }
    }

    /// Operator-facing guidance for this failure
    pub fn remediation(&self) -> String {
        match self {
            Self::PartialRole {
                role_name,
                classification,
                ..
            } => format!(
                "{}\nThe role {role_name} was left in place. Attach the missing policies \
                 manually or delete the role, then re-run the command.",
                classification.remediation
            ),
            Self::Request(err) => format!("Fix the command arguments: {err}"),
            Self::Serialization(_) => "This is a bug in security-lake-tools.".to_string(),
            _ => self
                .classification()
                .map(|c| c.remediation.clone())
                .unwrap_or_default(),
        }
    }

    /// `true` when the failure is caused by operator input rather than a remote service
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}
