//! Classification of remote failures into operator remediation guidance
//!
//! Every SDK failure is first normalized into an [`AwsError`] (code, message)
//! pair. Classification is a pure function of that pair and the [`Stage`]
//! that produced it: a fixed, ordered rule table picks the cause, and the
//! stage selects the remediation wording.

use std::fmt;

use crate::aws::AwsError;

/// Closed set of failure categories surfaced to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    Credential,
    Permission,
    PrerequisiteMissing,
    /// Not a failure: the desired resource is already in place
    AlreadyExists,
    InvalidPrincipal,
    Unclassified,
}

impl FailureCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credential => "credential",
            Self::Permission => "permission",
            Self::PrerequisiteMissing => "prerequisite-missing",
            Self::AlreadyExists => "already-exists",
            Self::InvalidPrincipal => "invalid-principal",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The remote step a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    IdentityResolution,
    RoleLookup,
    RoleCreation,
    PolicyCreation,
    PolicyAttachment,
    SourceRegistration,
    Status,
}

impl Stage {
    pub fn description(self) -> &'static str {
        match self {
            Self::IdentityResolution => "resolving the caller identity",
            Self::RoleLookup => "looking up the Glue role",
            Self::RoleCreation => "creating the Glue role",
            Self::PolicyCreation => "creating a Glue role policy",
            Self::PolicyAttachment => "attaching a policy to the Glue role",
            Self::SourceRegistration => "registering the custom source",
            Self::Status => "reading the Security Lake status",
        }
    }

    /// IAM actions the caller needs for this stage
    pub fn required_permissions(self) -> &'static [&'static str] {
        match self {
            Self::IdentityResolution => &["sts:GetCallerIdentity"],
            Self::RoleLookup => &["iam:GetRole"],
            Self::RoleCreation => &["iam:CreateRole"],
            Self::PolicyCreation => &["iam:CreatePolicy"],
            Self::PolicyAttachment => &["iam:AttachRolePolicy"],
            Self::SourceRegistration => &["securitylake:CreateCustomLogSource", "iam:PassRole"],
            Self::Status => &[
                "securitylake:ListDataLakes",
                "securitylake:ListDataLakeExceptions",
                "securitylake:ListLogSources",
                "securitylake:ListSubscribers",
            ],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Category plus the operator-facing remediation text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: FailureCategory,
    pub remediation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cause {
    SessionExpired,
    MissingCredentials,
    InvalidCredentials,
    AccessDenied,
    AlreadyExists,
    InvalidPrincipal,
    RoleNotFound,
    ServiceNotEnabled,
}

impl Cause {
    fn category(self) -> FailureCategory {
        match self {
            Self::SessionExpired | Self::MissingCredentials | Self::InvalidCredentials => {
                FailureCategory::Credential
            }
            Self::AccessDenied => FailureCategory::Permission,
            Self::AlreadyExists => FailureCategory::AlreadyExists,
            Self::InvalidPrincipal => FailureCategory::InvalidPrincipal,
            Self::RoleNotFound | Self::ServiceNotEnabled => FailureCategory::PrerequisiteMissing,
        }
    }
}

/// Message patterns are lowercase and matched against the lowercased message.
enum Matcher {
    Code(&'static str),
    CodeAndMessage(&'static str, &'static str),
    /// Every pattern must occur in the message.
    CodeAndMessages(&'static str, &'static [&'static str]),
    Message(&'static str),
}

impl Matcher {
    fn matches(&self, code: Option<&str>, message: &str) -> bool {
        match self {
            Self::Code(expected) => code == Some(*expected),
            Self::CodeAndMessage(expected, pattern) => {
                code == Some(*expected) && message.contains(*pattern)
            }
            Self::CodeAndMessages(expected, patterns) => {
                code == Some(*expected) && patterns.iter().all(|p| message.contains(*p))
            }
            Self::Message(pattern) => message.contains(*pattern),
        }
    }
}

struct Rule {
    matcher: Matcher,
    cause: Cause,
}

const fn rule(matcher: Matcher, cause: Cause) -> Rule {
    Rule { matcher, cause }
}

// First match wins.
static RULES: &[Rule] = &[
    rule(Matcher::Code("ExpiredToken"), Cause::SessionExpired),
    rule(Matcher::Code("ExpiredTokenException"), Cause::SessionExpired),
    rule(Matcher::Message("token has expired"), Cause::SessionExpired),
    rule(Matcher::Message("session has expired"), Cause::SessionExpired),
    rule(Matcher::Message("sso session"), Cause::SessionExpired),
    rule(
        Matcher::Message("no providers in chain provided credentials"),
        Cause::MissingCredentials,
    ),
    rule(Matcher::Message("no credentials"), Cause::MissingCredentials),
    rule(Matcher::Code("InvalidClientTokenId"), Cause::InvalidCredentials),
    rule(Matcher::Code("UnrecognizedClientException"), Cause::InvalidCredentials),
    rule(Matcher::Code("SignatureDoesNotMatch"), Cause::InvalidCredentials),
    rule(Matcher::Code("InvalidSignatureException"), Cause::InvalidCredentials),
    rule(Matcher::Code("AccessDenied"), Cause::AccessDenied),
    rule(Matcher::Code("AccessDeniedException"), Cause::AccessDenied),
    rule(Matcher::Code("UnauthorizedOperation"), Cause::AccessDenied),
    rule(Matcher::Message("is not authorized to perform"), Cause::AccessDenied),
    rule(Matcher::Code("ResourceAlreadyExistsException"), Cause::AlreadyExists),
    rule(Matcher::Code("EntityAlreadyExists"), Cause::AlreadyExists),
    rule(Matcher::Code("AlreadyExistsException"), Cause::AlreadyExists),
    rule(
        Matcher::CodeAndMessage("ConflictException", "already exists"),
        Cause::AlreadyExists,
    ),
    rule(
        Matcher::CodeAndMessage("ValidationException", "principal"),
        Cause::InvalidPrincipal,
    ),
    rule(
        Matcher::CodeAndMessage("ValidationException", "external"),
        Cause::InvalidPrincipal,
    ),
    rule(
        Matcher::CodeAndMessage("BadRequestException", "principal"),
        Cause::InvalidPrincipal,
    ),
    rule(
        Matcher::CodeAndMessage("BadRequestException", "external"),
        Cause::InvalidPrincipal,
    ),
    rule(
        Matcher::CodeAndMessage("MalformedPolicyDocument", "principal"),
        Cause::InvalidPrincipal,
    ),
    rule(Matcher::Code("NoSuchEntity"), Cause::RoleNotFound),
    rule(
        Matcher::CodeAndMessages("BadRequestException", &["role", "does not exist"]),
        Cause::RoleNotFound,
    ),
    rule(
        Matcher::CodeAndMessages("BadRequestException", &["role", "not found"]),
        Cause::RoleNotFound,
    ),
    rule(Matcher::Code("ResourceNotFoundException"), Cause::ServiceNotEnabled),
    rule(Matcher::Message("not enabled"), Cause::ServiceNotEnabled),
    rule(Matcher::Message("not been enabled"), Cause::ServiceNotEnabled),
    rule(Matcher::Message("already exists"), Cause::AlreadyExists),
];

fn match_cause(error: &AwsError) -> Option<Cause> {
    let code = error.code.as_deref();
    let message = error.message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(code, &message))
        .map(|rule| rule.cause)
}

/// Classify a normalized remote failure raised while performing `stage`.
#[must_use]
pub fn classify(stage: Stage, error: &AwsError) -> Classification {
    match match_cause(error) {
        Some(cause) => Classification {
            category: cause.category(),
            remediation: remediation(cause, stage),
        },
        None => Classification {
            category: FailureCategory::Unclassified,
            remediation: format!(
                "Unrecognized error while {stage}: {error}\n\
                 Check AWS credentials and permissions, and that Security Lake is enabled \
                 in the target region."
            ),
        },
    }
}

fn remediation(cause: Cause, stage: Stage) -> String {
    match cause {
        Cause::SessionExpired => format!(
            "The AWS session expired while {stage}.\n\
             Refresh the session, for example with `aws sso login --profile <your-profile>`, \
             then re-run the command."
        ),
        Cause::MissingCredentials => format!(
            "No AWS credentials were found while {stage}.\n\
             Configure credentials with `aws configure`, the AWS_ACCESS_KEY_ID and \
             AWS_SECRET_ACCESS_KEY environment variables, an instance role, or select a \
             profile with --profile."
        ),
        Cause::InvalidCredentials => format!(
            "The AWS credentials were rejected while {stage}.\n\
             Check that the access key is valid and active, or select another profile with \
             --profile."
        ),
        Cause::AccessDenied => format!(
            "Access denied while {stage}.\n\
             The caller is missing the IAM permission(s): {}.",
            stage.required_permissions().join(", ")
        ),
        Cause::AlreadyExists => match stage {
            Stage::SourceRegistration => "A custom source with this name is already registered; \
                 nothing to do. Delete the existing source first to re-create it."
                .to_string(),
            _ => format!("The resource targeted while {stage} already exists."),
        },
        Cause::InvalidPrincipal => format!(
            "The provider identity was rejected while {stage}.\n\
             Check that --account-id is the account that writes to the source and that \
             --external-id matches the trust relationship."
        ),
        Cause::RoleNotFound => format!(
            "The Glue role does not exist ({stage}).\n\
             Re-run without --no-create-role to create it, or pass an existing role with \
             --glue-role-arn. The role needs a trust relationship with glue.amazonaws.com, \
             the AWSGlueServiceRole managed policy, and S3 access to the Security Lake buckets."
        ),
        Cause::ServiceNotEnabled => format!(
            "A prerequisite is missing while {stage}.\n\
             Security Lake may not be enabled in the target region, or the referenced Glue \
             role may not exist."
        ),
    }
}

/// Classification for a role lookup that neither found nor ruled out the role.
///
/// Credential failures keep their own category; anything else is reported as
/// a missing prerequisite with `iam:GetRole` guidance.
#[must_use]
pub fn classify_indeterminate_lookup(role_name: &str, error: &AwsError) -> Classification {
    let base = classify(Stage::RoleLookup, error);
    if base.category == FailureCategory::Credential {
        return base;
    }
    Classification {
        category: FailureCategory::PrerequisiteMissing,
        remediation: format!(
            "Could not determine whether the Glue role {role_name} exists: {error}\n\
             The role was not created because the lookup did not prove it absent.\n\
             Grant iam:GetRole to the caller, or pass --skip-role-check if the role is known \
             to exist."
        ),
    }
}

/// Classification for an absent role when role creation is disabled
#[must_use]
pub fn classify_missing_role(role_arn: &str) -> Classification {
    Classification {
        category: FailureCategory::PrerequisiteMissing,
        remediation: format!(
            "The Glue role does not exist: {role_arn}\n\
             To create the role, you need:\n  \
             1. An IAM role with a trust relationship for glue.amazonaws.com\n  \
             2. The AWSGlueServiceRole managed policy attached\n  \
             3. A policy for S3 access to Security Lake buckets\n\
             Alternatively:\n  \
             - Remove --no-create-role to create it automatically\n  \
             - Specify an existing role with --glue-role-arn\n  \
             - Skip this check with --skip-role-check"
        ),
    }
}
