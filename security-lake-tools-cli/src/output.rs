//! Operator-facing rendering. Results go to stdout, failures to stderr.

use security_lake_tools_provisioning::status::{
    glue_resource_name, SourceEntry, SubscriberSummary,
};
use security_lake_tools_provisioning::{
    EventClassCatalog, ProvisioningError, ProvisioningOutcome, ProvisioningRequest,
    Registration, RequestError, RoleOutcome, StatusReport,
};

/// Print the catalog grouped by category
pub(crate) fn print_catalog(catalog: &EventClassCatalog) {
    println!("Available OCSF class UIDs:\n");
    for category in catalog.categories() {
        println!("{}:", category.name);
        for class in category.classes {
            println!("  {}: {}", class.uid, class.name);
        }
        println!();
    }
}

pub(crate) fn print_plan(request: &ProvisioningRequest, catalog: &EventClassCatalog) {
    println!(
        "ℹ Creating custom source for OCSF class {} ({}) in {}",
        request.class_uid,
        catalog.display_name(request.class_uid),
        request.region
    );
    if !catalog.contains(request.class_uid) {
        println!(
            "⚠ Class UID {} is not a known OCSF event class; the source is registered without one",
            request.class_uid
        );
    }
}

pub(crate) fn print_outcome(outcome: &ProvisioningOutcome) {
    let event_class = outcome.event_class.as_deref().unwrap_or("unknown");
    let role_state = match outcome.role {
        RoleOutcome::Verified => "verified",
        RoleOutcome::Created => "created",
        RoleOutcome::Skipped => "not checked",
    };

    match &outcome.registration {
        Registration::AlreadyExists => {
            println!(
                "ℹ Custom source {} already exists in {}; nothing to do",
                outcome.source_name, outcome.region
            );
            println!("  Event class:    {event_class}");
            println!("  Glue role:      {} ({role_state})", outcome.glue_role_arn);
        }
        Registration::Created(source) => {
            println!("✔ Created custom source {}", outcome.source_name);
            println!("  Event class:    {event_class}");
            println!("  Account:        {}", outcome.account_id);
            println!("  Region:         {}", outcome.region);
            println!("  Glue role:      {} ({role_state})", outcome.glue_role_arn);
            println!(
                "  Source version: {}",
                source.source_version.as_deref().unwrap_or("N/A")
            );
            if let Some(location) = &source.location {
                println!("  Location:       {location}");
            }
            match &source.provider_role_arn {
                Some(arn) => println!("  Provider role:  {arn}"),
                None => println!(
                    "  Provider role:  {} (created by Security Lake)",
                    outcome.provider_role_name
                ),
            }
            for (label, arn) in [
                ("Crawler", &source.crawler_arn),
                ("Database", &source.database_arn),
                ("Table", &source.table_arn),
            ] {
                if let Some(arn) = arn {
                    println!("  {:<15} {arn}", format!("{label}:"));
                }
            }
        }
    }
}

pub(crate) fn print_failure(error: &ProvisioningError) {
    eprintln!("✗ Error: {error}");
    if let Some(category) = error.category() {
        eprintln!("  Category: {category}");
    }
    let remediation = error.remediation();
    if !remediation.is_empty() {
        eprintln!();
        eprintln!("{remediation}");
    }
}

pub(crate) fn print_usage_error(error: &RequestError) {
    eprintln!("error: {error}");
    eprintln!();
    eprintln!("For more information, try '--help'.");
}

pub(crate) fn print_status(report: &StatusReport) {
    println!("Security Lake status for {}\n", report.region);

    println!("Data lakes:");
    if report.data_lakes.is_empty() {
        println!("  (none; Security Lake may not be enabled in this region)");
    }
    for lake in &report.data_lakes {
        println!("  {}", lake.arn);
        println!("    Status:    {}", lake.create_status.as_deref().unwrap_or("N/A"));
        println!("    S3 bucket: {}", lake.s3_bucket_arn.as_deref().unwrap_or("N/A"));
        if let Some(key) = &lake.kms_key_id {
            println!("    KMS key:   {key}");
        }
    }
    println!();

    println!("Exceptions (last 7 days):");
    if report.recent_exceptions.is_empty() {
        println!("  (none)");
    }
    for exception in &report.recent_exceptions {
        let when = exception
            .occurred_at()
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        println!(
            "  [{when}] {}: {}",
            exception.region.as_deref().unwrap_or("-"),
            exception.exception.as_deref().unwrap_or("(no message)")
        );
        if let Some(remediation) = &exception.remediation {
            println!("    Remediation: {remediation}");
        }
    }
    println!();

    println!("Log sources:");
    if report.log_sources.iter().all(|group| group.sources.is_empty()) {
        println!("  (none)");
    }
    for group in &report.log_sources {
        if group.sources.is_empty() {
            continue;
        }
        println!(
            "  Account {} in {}:",
            group.account.as_deref().unwrap_or("-"),
            group.region.as_deref().unwrap_or("-")
        );
        for entry in &group.sources {
            print_source_entry(entry);
        }
    }
    println!();

    println!("Subscribers:");
    if report.subscribers.is_empty() {
        println!("  No subscribers configured");
    }
    for subscriber in &report.subscribers {
        print_subscriber(subscriber);
    }
}

fn print_subscriber(subscriber: &SubscriberSummary) {
    println!("  {}", subscriber.name);
    println!("    ID:           {}", subscriber.id);
    println!("    ARN:          {}", subscriber.arn);
    println!(
        "    Status:       {}",
        subscriber.status.as_deref().unwrap_or("N/A")
    );
    if let Some(description) = &subscriber.description {
        println!("    Description:  {description}");
    }
    println!(
        "    Principal:    {}",
        subscriber.principal.as_deref().unwrap_or("N/A")
    );
    println!(
        "    External ID:  {}",
        subscriber.external_id.as_deref().unwrap_or("N/A")
    );
    if !subscriber.access_types.is_empty() {
        println!("    Access types: {}", subscriber.access_types.join(", "));
    }
    if !subscriber.sources.is_empty() {
        println!("    Sources:");
        for entry in &subscriber.sources {
            match entry {
                SourceEntry::Aws { name, .. } => {
                    println!("      AWS    {}", name.as_deref().unwrap_or("-"));
                }
                SourceEntry::Custom { name, .. } => {
                    println!("      Custom {}", name.as_deref().unwrap_or("-"));
                }
            }
        }
    }
    if let Some(share) = &subscriber.resource_share_arn {
        println!("    Resource share: {share}");
    }
    if let Some(bucket) = &subscriber.s3_bucket_arn {
        println!("    S3 bucket:    {bucket}");
    }
    if let Some(endpoint) = &subscriber.endpoint {
        println!("    Endpoint:     {endpoint}");
    }
}

fn print_source_entry(entry: &SourceEntry) {
    match entry {
        SourceEntry::Aws { name, version } => println!(
            "    AWS    {} {}",
            name.as_deref().unwrap_or("-"),
            version.as_deref().unwrap_or("")
        ),
        SourceEntry::Custom {
            name,
            version,
            location,
            role_arn,
            database_arn,
            table_arn,
        } => {
            println!(
                "    Custom {} {}",
                name.as_deref().unwrap_or("-"),
                version.as_deref().unwrap_or("")
            );
            if let Some(location) = location {
                println!("      Location:      {location}");
            }
            if let Some(role_arn) = role_arn {
                println!("      Provider role: {role_arn}");
            }
            if let (Some(database), Some(table)) = (database_arn, table_arn) {
                println!(
                    "      Glue table:    {}.{}",
                    glue_resource_name(database),
                    glue_resource_name(table)
                );
            }
        }
    }
}
