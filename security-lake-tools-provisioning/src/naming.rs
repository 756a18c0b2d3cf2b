//! Deterministic resource names
//!
//! These formats are part of the tool's contract: re-running with the same
//! class uid must target the same resources, so changing any of them would
//! orphan sources and roles created by earlier runs.

/// Prefix of every custom source created by this tool
pub const SOURCE_PREFIX: &str = "tnz-ocsf";

/// Prefix of the Glue crawler role derived from a source name
pub const GLUE_ROLE_PREFIX: &str = "AWSGlueServiceRole-SecurityLake";

const PROVIDER_ROLE_PREFIX: &str = "AmazonSecurityLake-Provider";
const S3_POLICY_PREFIX: &str = "SecurityLakeGlueS3Access";
const LAKE_FORMATION_POLICY_PREFIX: &str = "SecurityLakeLakeFormationAccess";

// IAM name limits
// Reference: https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_iam-quotas.html
const MAX_ROLE_NAME_LENGTH: usize = 64;
const MAX_POLICY_NAME_LENGTH: usize = 128;

fn truncate(name: String, max: usize) -> String {
    if name.len() <= max {
        return name;
    }
    name.chars().take(max).collect()
}

/// `tnz-ocsf-{class_uid}`
pub fn source_name(class_uid: u32) -> String {
    format!("{SOURCE_PREFIX}-{class_uid}")
}

/// Default Glue crawler role for a source, e.g.
/// `AWSGlueServiceRole-SecurityLake-tnz-ocsf-1001`
pub fn glue_role_name(source_name: &str) -> String {
    truncate(
        format!("{GLUE_ROLE_PREFIX}-{source_name}"),
        MAX_ROLE_NAME_LENGTH,
    )
}

/// Role Security Lake creates for the source provider (informational only)
pub fn provider_role_name(source_name: &str, region: &str) -> String {
    format!("{PROVIDER_ROLE_PREFIX}-{source_name}-{region}")
}

pub fn s3_policy_name(role_name: &str) -> String {
    truncate(
        format!("{S3_POLICY_PREFIX}-{role_name}"),
        MAX_POLICY_NAME_LENGTH,
    )
}

pub fn lake_formation_policy_name(role_name: &str) -> String {
    truncate(
        format!("{LAKE_FORMATION_POLICY_PREFIX}-{role_name}"),
        MAX_POLICY_NAME_LENGTH,
    )
}
