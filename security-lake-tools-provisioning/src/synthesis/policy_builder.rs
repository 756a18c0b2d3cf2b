//! Policy document generation for the Glue crawler role

use std::collections::BTreeMap;

use crate::types::{PolicyDocument, ServicePrincipal, Statement, StringOrList, POLICY_VERSION};

/// Service principal allowed to assume the crawler role
pub const GLUE_SERVICE_PRINCIPAL: &str = "glue.amazonaws.com";

/// AWS managed policy attached to every crawler role
pub const GLUE_MANAGED_POLICY: &str = "service-role/AWSGlueServiceRole";

/// Bucket name pattern Security Lake uses for its storage
const SECURITY_LAKE_BUCKET_PATTERN: &str = "aws-security-data-lake-*";

const EXTERNAL_ID_CONDITION_KEY: &str = "sts:ExternalId";

/// Trust policy letting Glue assume the role only with the given external id
#[must_use]
pub fn build_trust_policy(external_id: &str) -> PolicyDocument {
    let condition = BTreeMap::from([(
        "StringEquals".to_string(),
        BTreeMap::from([(
            EXTERNAL_ID_CONDITION_KEY.to_string(),
            external_id.to_string(),
        )]),
    )]);

    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![Statement {
            sid: None,
            effect: "Allow".to_string(),
            principal: Some(ServicePrincipal {
                service: GLUE_SERVICE_PRINCIPAL.to_string(),
            }),
            action: StringOrList::Single("sts:AssumeRole".to_string()),
            resource: None,
            condition: Some(condition),
        }],
    }
}

/// Read/write access to the Security Lake buckets in `partition`
#[must_use]
pub fn build_s3_access_policy(partition: &str) -> PolicyDocument {
    let bucket = format!("arn:{partition}:s3:::{SECURITY_LAKE_BUCKET_PATTERN}");
    let objects = format!("{bucket}/*");

    build_allow(
        &["s3:GetObject", "s3:ListBucket", "s3:PutObject", "s3:DeleteObject"],
        StringOrList::Multiple(vec![bucket, objects]),
    )
}

/// Lake Formation access needed by the crawler to update the catalog
#[must_use]
pub fn build_lake_formation_policy() -> PolicyDocument {
    build_allow(
        &["lakeformation:GetDataAccess", "lakeformation:GrantPermissions"],
        StringOrList::Single("*".to_string()),
    )
}

fn build_allow(actions: &[&str], resource: StringOrList) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![Statement {
            sid: None,
            effect: "Allow".to_string(),
            principal: None,
            action: StringOrList::Multiple(actions.iter().map(|a| (*a).to_string()).collect()),
            resource: Some(resource),
            condition: None,
        }],
    }
}
