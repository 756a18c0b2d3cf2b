//! Orchestration of a single custom source provisioning run
//!
//! A run walks a fixed sequence of states exactly once:
//!
//! ```text
//! Start -> IdentityResolved -> RoleChecked -> RoleReady -> SourceRegistered -> Done
//! ```
//!
//! Any failing transition ends the run with a classified [`ProvisioningError`].
//! Nothing is retried and nothing that was created is rolled back.

use log::{debug, info, warn};

use crate::aws::arn::{managed_policy_arn, partition_for_region, policy_arn, role_arn, RoleArn};
use crate::aws::{DataLakeService, IdentityService, RoleStore};
use crate::catalog::EventClassCatalog;
use crate::classify::{FailureCategory, Stage};
use crate::error::{ProvisioningError, ProvisioningResult};
use crate::naming;
use crate::synthesis::policy_builder::{
    build_lake_formation_policy, build_s3_access_policy, build_trust_policy, GLUE_MANAGED_POLICY,
};
use crate::types::{
    CustomSourceRequest, PolicyDocument, ProvisionOptions, ProvisioningOutcome,
    ProvisioningRequest, Registration, RoleLookup, RoleOutcome,
};

const ROLE_DESCRIPTION: &str = "Glue service role for Amazon Security Lake custom sources";
const S3_POLICY_DESCRIPTION: &str = "S3 access to Security Lake buckets for Glue crawlers";
const LAKE_FORMATION_POLICY_DESCRIPTION: &str =
    "Lake Formation access for Security Lake Glue crawlers";

/// IAM error code returned when a customer managed policy name is taken
const ENTITY_ALREADY_EXISTS: &str = "EntityAlreadyExists";

/// The Glue role a run registers the source with
#[derive(Debug, Clone)]
struct RoleTarget {
    name: String,
    arn: String,
    partition: String,
    account_id: String,
    /// `CreateRole` on `name` in the caller's account yields exactly `arn`
    creatable: bool,
}

impl RoleTarget {
    fn resolve(
        request: &ProvisioningRequest,
        source_name: &str,
        account_id: &str,
    ) -> ProvisioningResult<Self> {
        match &request.glue_role_arn {
            Some(arn) => {
                let parsed = RoleArn::parse(arn)?;
                let creatable = parsed.account_id == account_id
                    && *arn == role_arn(&parsed.partition, account_id, &parsed.name);
                Ok(Self {
                    name: parsed.name,
                    arn: arn.clone(),
                    partition: parsed.partition,
                    account_id: parsed.account_id,
                    creatable,
                })
            }
            None => {
                let partition = partition_for_region(&request.region);
                let name = naming::glue_role_name(source_name);
                Ok(Self {
                    arn: role_arn(partition, account_id, &name),
                    name,
                    partition: partition.to_string(),
                    account_id: account_id.to_string(),
                    creatable: true,
                })
            }
        }
    }
}

#[derive(Debug)]
enum State {
    Start,
    IdentityResolved {
        account_id: String,
    },
    RoleChecked {
        account_id: String,
        target: RoleTarget,
        /// `None` when the check was skipped
        lookup: Option<RoleLookup>,
    },
    RoleReady {
        account_id: String,
        role_arn: String,
        role: RoleOutcome,
    },
    SourceRegistered {
        account_id: String,
        role_arn: String,
        role: RoleOutcome,
        registration: Registration,
    },
}

enum Transition {
    Next(State),
    Done(ProvisioningOutcome),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::IdentityResolved { .. } => "IdentityResolved",
            Self::RoleChecked { .. } => "RoleChecked",
            Self::RoleReady { .. } => "RoleReady",
            Self::SourceRegistered { .. } => "SourceRegistered",
        }
    }
}

/// Drives identity resolution, role verification or creation, and source
/// registration against the injected services.
pub struct Provisioner<'a> {
    identity: &'a dyn IdentityService,
    roles: &'a dyn RoleStore,
    data_lake: &'a dyn DataLakeService,
    catalog: &'a EventClassCatalog,
    options: ProvisionOptions,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        identity: &'a dyn IdentityService,
        roles: &'a dyn RoleStore,
        data_lake: &'a dyn DataLakeService,
        catalog: &'a EventClassCatalog,
        options: ProvisionOptions,
    ) -> Self {
        Self {
            identity,
            roles,
            data_lake,
            catalog,
            options,
        }
    }

    /// Run the provisioning state machine once for `request`.
    pub async fn run(
        &self,
        request: &ProvisioningRequest,
    ) -> ProvisioningResult<ProvisioningOutcome> {
        request.validate()?;

        let source_name = naming::source_name(request.class_uid);
        let mut state = State::Start;
        loop {
            debug!("Provisioning {source_name}: {}", state.name());
            match self.step(request, &source_name, state).await? {
                Transition::Next(next) => state = next,
                Transition::Done(outcome) => {
                    debug!("Provisioning {source_name}: Done");
                    return Ok(outcome);
                }
            }
        }
    }

    async fn step(
        &self,
        request: &ProvisioningRequest,
        source_name: &str,
        state: State,
    ) -> ProvisioningResult<Transition> {
        let next = match state {
            State::Start => {
                let account_id = self.resolve_identity(request).await?;
                State::IdentityResolved { account_id }
            }
            State::IdentityResolved { account_id } => {
                let target = RoleTarget::resolve(request, source_name, &account_id)?;
                let lookup = self.verify_role(&target, &account_id).await;
                State::RoleChecked {
                    account_id,
                    target,
                    lookup,
                }
            }
            State::RoleChecked {
                account_id,
                target,
                lookup,
            } => {
                let (role_arn, role) = self.ready_role(request, target, lookup).await?;
                State::RoleReady {
                    account_id,
                    role_arn,
                    role,
                }
            }
            State::RoleReady {
                account_id,
                role_arn,
                role,
            } => {
                let registration = self
                    .register_source(request, source_name, &account_id, &role_arn)
                    .await?;
                State::SourceRegistered {
                    account_id,
                    role_arn,
                    role,
                    registration,
                }
            }
            State::SourceRegistered {
                account_id,
                role_arn,
                role,
                registration,
            } => {
                return Ok(Transition::Done(ProvisioningOutcome {
                    source_name: source_name.to_string(),
                    event_class: self.catalog.name(request.class_uid).map(str::to_string),
                    account_id,
                    region: request.region.clone(),
                    glue_role_arn: role_arn,
                    role,
                    provider_role_name: naming::provider_role_name(source_name, &request.region),
                    registration,
                }))
            }
        };
        Ok(Transition::Next(next))
    }

    async fn resolve_identity(&self, request: &ProvisioningRequest) -> ProvisioningResult<String> {
        if let Some(account_id) = &request.account_id {
            debug!("Using explicit account id {account_id}");
            return Ok(account_id.clone());
        }

        let account_id = self
            .identity
            .caller_account_id()
            .await
            .map_err(|e| ProvisioningError::remote(Stage::IdentityResolution, e))?;
        info!("Auto-detected account ID: {account_id}");
        Ok(account_id)
    }

    async fn verify_role(&self, target: &RoleTarget, account_id: &str) -> Option<RoleLookup> {
        if self.options.skip_role_check {
            info!("Skipping Glue role check for {}", target.arn);
            return None;
        }
        // GetRole only sees roles of the caller's account
        if target.account_id != account_id {
            warn!(
                "Glue role {} belongs to account {}; it cannot be checked from account {account_id}",
                target.arn, target.account_id
            );
            return None;
        }
        info!("Checking Glue role: {}", target.arn);
        Some(self.roles.get_role(&target.name).await)
    }

    async fn ready_role(
        &self,
        request: &ProvisioningRequest,
        target: RoleTarget,
        lookup: Option<RoleLookup>,
    ) -> ProvisioningResult<(String, RoleOutcome)> {
        match lookup {
            None => Ok((target.arn, RoleOutcome::Skipped)),
            Some(RoleLookup::Exists { arn }) => {
                info!("Glue role verified: {arn}");
                Ok((arn, RoleOutcome::Verified))
            }
            Some(RoleLookup::Absent) if self.options.create_role && target.creatable => {
                info!("Glue role {} does not exist, creating it", target.name);
                let arn = self.provision_role(&target, &request.external_id).await?;
                Ok((arn, RoleOutcome::Created))
            }
            Some(RoleLookup::Absent) => {
                if self.options.create_role {
                    warn!(
                        "Not creating {}: an explicit role ARN with a path is never auto-created",
                        target.arn
                    );
                }
                Err(ProvisioningError::role_missing(target.arn))
            }
            Some(RoleLookup::Indeterminate(error)) => {
                warn!("Could not determine whether {} exists: {error}", target.name);
                Err(ProvisioningError::role_lookup_indeterminate(target.name, error))
            }
        }
    }

    /// Create the Glue role and attach its policies.
    ///
    /// Once `CreateRole` succeeds every later failure is a partial role.
    async fn provision_role(
        &self,
        target: &RoleTarget,
        external_id: &str,
    ) -> ProvisioningResult<String> {
        let trust_policy = to_json(&build_trust_policy(external_id))?;
        let customer_policies = [
            (
                naming::s3_policy_name(&target.name),
                to_json(&build_s3_access_policy(&target.partition))?,
                S3_POLICY_DESCRIPTION,
            ),
            (
                naming::lake_formation_policy_name(&target.name),
                to_json(&build_lake_formation_policy())?,
                LAKE_FORMATION_POLICY_DESCRIPTION,
            ),
        ];

        let created_arn = self
            .roles
            .create_role(&target.name, &trust_policy, ROLE_DESCRIPTION)
            .await
            .map_err(|e| ProvisioningError::remote(Stage::RoleCreation, e))?;
        info!("Created Glue role {created_arn}");

        let partial = |stage: Stage, error| {
            ProvisioningError::partial_role(
                target.name.as_str(),
                created_arn.as_str(),
                stage,
                error,
            )
        };

        let managed = managed_policy_arn(&target.partition, GLUE_MANAGED_POLICY);
        self.roles
            .attach_role_policy(&target.name, &managed)
            .await
            .map_err(|e| partial(Stage::PolicyAttachment, e))?;
        debug!("Attached {managed}");

        for (policy_name, document, description) in &customer_policies {
            let arn = match self.roles.create_policy(policy_name, document, description).await {
                Ok(arn) => arn,
                Err(e) if e.is_code(ENTITY_ALREADY_EXISTS) => {
                    info!("Policy {policy_name} already exists, reusing it");
                    policy_arn(&target.partition, &target.account_id, policy_name)
                }
                Err(e) => return Err(partial(Stage::PolicyCreation, e)),
            };
            self.roles
                .attach_role_policy(&target.name, &arn)
                .await
                .map_err(|e| partial(Stage::PolicyAttachment, e))?;
            debug!("Attached {arn}");
        }

        let delay = self.options.role_propagation_delay;
        if !delay.is_zero() {
            info!("Waiting {}s for the role to propagate", delay.as_secs_f32());
            tokio::time::sleep(delay).await;
        }

        Ok(created_arn)
    }

    async fn register_source(
        &self,
        request: &ProvisioningRequest,
        source_name: &str,
        account_id: &str,
        role_arn: &str,
    ) -> ProvisioningResult<Registration> {
        let event_class = self.catalog.name(request.class_uid).map(str::to_string);
        if event_class.is_none() {
            warn!(
                "Class UID {} is not in the OCSF catalog; registering without an event class",
                request.class_uid
            );
        }

        let source = CustomSourceRequest {
            source_name: source_name.to_string(),
            region: request.region.clone(),
            event_class,
            account_id: account_id.to_string(),
            external_id: request.external_id.clone(),
            glue_role_arn: role_arn.to_string(),
        };
        info!(
            "Creating custom source {} in {} with Glue role {}",
            source.source_name, source.region, source.glue_role_arn
        );

        match self.data_lake.create_custom_log_source(&source).await {
            Ok(registered) => Ok(Registration::Created(registered)),
            Err(e) => {
                let error = ProvisioningError::remote(Stage::SourceRegistration, e);
                if error.category() == Some(FailureCategory::AlreadyExists) {
                    info!("Custom source {source_name} already exists");
                    Ok(Registration::AlreadyExists)
                } else {
                    Err(error)
                }
            }
        }
    }
}

fn to_json(document: &PolicyDocument) -> ProvisioningResult<String> {
    document
        .to_json()
        .map_err(|e| ProvisioningError::serialization(e.to_string()))
}
