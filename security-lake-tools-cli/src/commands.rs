//! Subcommand handlers

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, info};
use security_lake_tools_provisioning::aws::{
    load_config, IamRoleStore, SecurityLakeService, StsIdentityService,
};
use security_lake_tools_provisioning::{
    collect_status, EventClassCatalog, ProvisionOptions, Provisioner, ProvisioningOutcome,
    ProvisioningRequest, ProvisioningResult,
};

use crate::output;
use crate::types::ExitCode;

/// Arguments of the create-source subcommand
#[derive(Args, Debug, Clone)]
pub(crate) struct CreateSourceArgs {
    /// OCSF class UID (e.g., 1001 for File System Activity)
    #[arg(value_name = "CLASS_UID", required_unless_present = "list")]
    pub(crate) class_uid: Option<u32>,

    /// AWS region
    #[arg(long = "region", default_value = "us-east-1")]
    pub(crate) region: String,

    /// AWS account ID (auto-detected from the caller identity if not provided)
    #[arg(long = "account-id")]
    pub(crate) account_id: Option<String>,

    /// External ID for the source provider trust relationship
    #[arg(long = "external-id", required_unless_present = "list")]
    pub(crate) external_id: Option<String>,

    /// Glue service role ARN (default: AWSGlueServiceRole-SecurityLake-<source name>)
    #[arg(long = "glue-role-arn")]
    pub(crate) glue_role_arn: Option<String>,

    /// AWS profile to use
    #[arg(long = "profile")]
    pub(crate) profile: Option<String>,

    /// Do not create the Glue role if it does not exist
    #[arg(long = "no-create-role")]
    pub(crate) no_create_role: bool,

    /// Skip checking whether the Glue role exists
    #[arg(long = "skip-role-check")]
    pub(crate) skip_role_check: bool,

    /// List the available OCSF class UIDs and exit
    #[arg(long = "list")]
    pub(crate) list: bool,
}

pub(crate) async fn create_source(args: &CreateSourceArgs) -> Result<ExitCode> {
    let catalog = EventClassCatalog::ocsf();

    if args.list {
        output::print_catalog(&catalog);
        return Ok(ExitCode::Success);
    }

    let Some(class_uid) = args.class_uid else {
        eprintln!("error: CLASS_UID is required unless --list is used");
        return Ok(ExitCode::Usage);
    };

    let request = ProvisioningRequest {
        class_uid,
        region: args.region.clone(),
        account_id: args.account_id.clone(),
        external_id: args.external_id.clone().unwrap_or_default(),
        glue_role_arn: args.glue_role_arn.clone(),
    };
    // Rejected before any credentials are loaded
    if let Err(e) = request.validate() {
        output::print_usage_error(&e);
        return Ok(ExitCode::Usage);
    }

    let options = ProvisionOptions {
        skip_role_check: args.skip_role_check,
        create_role: !args.no_create_role,
        ..ProvisionOptions::default()
    };
    debug!("Provisioning options: {options:?}");

    output::print_plan(&request, &catalog);

    let config = load_config(args.profile.as_deref(), Some(&args.region)).await;
    let identity = StsIdentityService::new(&config);
    let roles = IamRoleStore::new(&config);
    let data_lake = SecurityLakeService::new(&config);

    let provisioner = Provisioner::new(&identity, &roles, &data_lake, &catalog, options);
    let result = provisioner.run(&request).await;
    match &result {
        Ok(outcome) => output::print_outcome(outcome),
        Err(e) => output::print_failure(e),
    }
    Ok(exit_code(&result))
}

/// Maps a provisioning run to the process exit code.
///
/// An already-registered source is a success; request errors are usage errors.
pub(crate) fn exit_code(result: &ProvisioningResult<ProvisioningOutcome>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::Success,
        Err(e) if e.is_usage_error() => ExitCode::Usage,
        Err(_) => ExitCode::Failure,
    }
}

pub(crate) async fn status(region: Option<&str>, profile: Option<&str>) -> Result<ExitCode> {
    let config = load_config(profile, region).await;
    let Some(region) = region
        .map(str::to_string)
        .or_else(|| config.region().map(ToString::to_string))
    else {
        eprintln!("error: no region configured; pass --region or set one in the AWS profile");
        return Ok(ExitCode::Usage);
    };
    info!("Reading Security Lake status in {region}");

    let service = SecurityLakeService::new(&config);
    match collect_status(&service, &region).await {
        Ok(report) => {
            output::print_status(&report);
            Ok(ExitCode::Success)
        }
        Err(e) => {
            output::print_failure(&e);
            Ok(ExitCode::Failure)
        }
    }
}

pub(crate) fn print_version_info() -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "{} {}",
        env!("CARGO_BIN_NAME"),
        env!("CARGO_PKG_VERSION")
    )
    .context("Failed to write version information")?;
    Ok(())
}
