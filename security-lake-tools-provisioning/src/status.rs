//! Read-only view of the Security Lake setup in one region

use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::aws::DataLakeService;
use crate::classify::Stage;
use crate::error::{ProvisioningError, ProvisioningResult};

/// Exceptions older than this are left out of the report
const EXCEPTION_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLakeSummary {
    pub arn: String,
    pub region: String,
    pub s3_bucket_arn: Option<String>,
    pub create_status: Option<String>,
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLakeExceptionSummary {
    pub region: Option<String>,
    pub exception: Option<String>,
    pub remediation: Option<String>,
    /// Seconds since the Unix epoch
    pub timestamp: Option<i64>,
}

impl DataLakeExceptionSummary {
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEntry {
    Aws {
        name: Option<String>,
        version: Option<String>,
    },
    Custom {
        name: Option<String>,
        version: Option<String>,
        location: Option<String>,
        role_arn: Option<String>,
        database_arn: Option<String>,
        table_arn: Option<String>,
    },
}

/// Log sources registered for one account and region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSourceSummary {
    pub account: Option<String>,
    pub region: Option<String>,
    pub sources: Vec<SourceEntry>,
}

/// A subscriber with read access to the data lake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberSummary {
    pub name: String,
    pub id: String,
    pub arn: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub principal: Option<String>,
    pub external_id: Option<String>,
    /// `LAKEFORMATION` and/or `S3`
    pub access_types: Vec<String>,
    pub sources: Vec<SourceEntry>,
    pub resource_share_arn: Option<String>,
    pub s3_bucket_arn: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub region: String,
    pub data_lakes: Vec<DataLakeSummary>,
    /// Only exceptions inside the reporting window
    pub recent_exceptions: Vec<DataLakeExceptionSummary>,
    pub log_sources: Vec<LogSourceSummary>,
    pub subscribers: Vec<SubscriberSummary>,
}

/// Collect the status report for `region`, stopping at the first failed listing.
pub async fn collect_status(
    service: &dyn DataLakeService,
    region: &str,
) -> ProvisioningResult<StatusReport> {
    collect_status_at(service, region, Utc::now()).await
}

pub(crate) async fn collect_status_at(
    service: &dyn DataLakeService,
    region: &str,
    now: DateTime<Utc>,
) -> ProvisioningResult<StatusReport> {
    info!("Collecting Security Lake status for region {region}");
    let failed = |error| ProvisioningError::remote(Stage::Status, error);

    let data_lakes = service.list_data_lakes(region).await.map_err(failed)?;
    let exceptions = service
        .list_data_lake_exceptions(region)
        .await
        .map_err(failed)?;
    let log_sources = service.list_log_sources(region).await.map_err(failed)?;
    let subscribers = service.list_subscribers(region).await.map_err(failed)?;

    let cutoff = now - Duration::days(EXCEPTION_WINDOW_DAYS);
    let recent_exceptions = exceptions
        .into_iter()
        .filter(|exc| exc.occurred_at().is_none_or(|at| at >= cutoff))
        .collect();

    Ok(StatusReport {
        region: region.to_string(),
        data_lakes,
        recent_exceptions,
        log_sources,
        subscribers,
    })
}

/// Last path segment of a Glue ARN (`.../database/name`, `.../table/db/name`)
pub fn glue_resource_name(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}
