//! Security Lake data-lake service backed by the AWS SDK

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_securitylake::types::{
    AwsIdentity, CustomLogSourceConfiguration, CustomLogSourceCrawlerConfiguration,
    CustomLogSourceResource, LogSourceResource, SubscriberResource,
};
use aws_sdk_securitylake::Client as SecurityLakeClient;
use log::trace;

use crate::aws::{normalize, AwsError, AwsResult, DataLakeService};
use crate::status::{
    DataLakeExceptionSummary, DataLakeSummary, LogSourceSummary, SourceEntry, SubscriberSummary,
};
use crate::types::{CustomSourceRequest, RegisteredSource};

/// Security Lake client factory; every call is pinned to the request region.
pub struct SecurityLakeService {
    config: SdkConfig,
}

impl SecurityLakeService {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn client(&self, region: &str) -> SecurityLakeClient {
        let config = aws_sdk_securitylake::config::Builder::from(&self.config)
            .region(aws_config::Region::new(region.to_string()))
            .build();
        SecurityLakeClient::from_conf(config)
    }
}

fn registered_source(source: &CustomLogSourceResource) -> RegisteredSource {
    let provider = source.provider();
    let attributes = source.attributes();
    RegisteredSource {
        source_name: source.source_name().map(str::to_string),
        source_version: source.source_version().map(str::to_string),
        provider_role_arn: provider.and_then(|p| p.role_arn()).map(str::to_string),
        location: provider.and_then(|p| p.location()).map(str::to_string),
        crawler_arn: attributes.and_then(|a| a.crawler_arn()).map(str::to_string),
        database_arn: attributes.and_then(|a| a.database_arn()).map(str::to_string),
        table_arn: attributes.and_then(|a| a.table_arn()).map(str::to_string),
    }
}

fn source_entry(resource: &LogSourceResource) -> Option<SourceEntry> {
    match resource {
        LogSourceResource::AwsLogSource(aws) => Some(SourceEntry::Aws {
            name: aws.source_name().map(|n| n.as_str().to_string()),
            version: aws.source_version().map(str::to_string),
        }),
        LogSourceResource::CustomLogSource(custom) => {
            let registered = registered_source(custom);
            Some(SourceEntry::Custom {
                name: registered.source_name,
                version: registered.source_version,
                location: registered.location,
                role_arn: registered.provider_role_arn,
                database_arn: registered.database_arn,
                table_arn: registered.table_arn,
            })
        }
        _ => None,
    }
}

fn subscriber_summary(subscriber: &SubscriberResource) -> SubscriberSummary {
    let identity = subscriber.subscriber_identity();
    SubscriberSummary {
        name: subscriber.subscriber_name().to_string(),
        id: subscriber.subscriber_id().to_string(),
        arn: subscriber.subscriber_arn().to_string(),
        status: subscriber
            .subscriber_status()
            .map(|status| status.as_str().to_string()),
        description: subscriber.subscriber_description().map(str::to_string),
        principal: identity.map(|id| id.principal().to_string()),
        external_id: identity.map(|id| id.external_id().to_string()),
        access_types: subscriber
            .access_types()
            .iter()
            .map(|access| access.as_str().to_string())
            .collect(),
        sources: subscriber.sources().iter().filter_map(source_entry).collect(),
        resource_share_arn: subscriber.resource_share_arn().map(str::to_string),
        s3_bucket_arn: subscriber.s3_bucket_arn().map(str::to_string),
        endpoint: subscriber.subscriber_endpoint().map(str::to_string),
    }
}

#[async_trait]
impl DataLakeService for SecurityLakeService {
    async fn create_custom_log_source(
        &self,
        request: &CustomSourceRequest,
    ) -> AwsResult<RegisteredSource> {
        let crawler = CustomLogSourceCrawlerConfiguration::builder()
            .role_arn(&request.glue_role_arn)
            .build()
            .map_err(|e| AwsError::local(format!("Invalid crawler configuration: {e}")))?;
        let identity = AwsIdentity::builder()
            .principal(&request.account_id)
            .external_id(&request.external_id)
            .build()
            .map_err(|e| AwsError::local(format!("Invalid provider identity: {e}")))?;
        let configuration = CustomLogSourceConfiguration::builder()
            .crawler_configuration(crawler)
            .provider_identity(identity)
            .build();

        let out = self
            .client(&request.region)
            .create_custom_log_source()
            .source_name(&request.source_name)
            .set_event_classes(request.event_class.clone().map(|class| vec![class]))
            .configuration(configuration)
            .send()
            .await
            .map_err(|e| normalize("Security Lake CreateCustomLogSource", e))?;

        Ok(out.source().map(registered_source).unwrap_or_default())
    }

    async fn list_data_lakes(&self, region: &str) -> AwsResult<Vec<DataLakeSummary>> {
        let out = self
            .client(region)
            .list_data_lakes()
            .regions(region)
            .send()
            .await
            .map_err(|e| normalize("Security Lake ListDataLakes", e))?;

        Ok(out
            .data_lakes()
            .iter()
            .map(|lake| DataLakeSummary {
                arn: lake.data_lake_arn().to_string(),
                region: lake.region().to_string(),
                s3_bucket_arn: lake.s3_bucket_arn().map(str::to_string),
                create_status: lake.create_status().map(|s| s.as_str().to_string()),
                kms_key_id: lake
                    .encryption_configuration()
                    .and_then(|enc| enc.kms_key_id())
                    .map(str::to_string),
            })
            .collect())
    }

    async fn list_data_lake_exceptions(
        &self,
        region: &str,
    ) -> AwsResult<Vec<DataLakeExceptionSummary>> {
        let client = self.client(region);
        let mut exceptions = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let out = client
                .list_data_lake_exceptions()
                .regions(region)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| normalize("Security Lake ListDataLakeExceptions", e))?;

            exceptions.extend(out.exceptions().iter().map(|exc| DataLakeExceptionSummary {
                region: exc.region().map(str::to_string),
                exception: exc.exception().map(str::to_string),
                remediation: exc.remediation().map(str::to_string),
                timestamp: exc.timestamp().map(|ts| ts.secs()),
            }));

            match out.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        trace!("Listed {} data lake exceptions", exceptions.len());
        Ok(exceptions)
    }

    async fn list_log_sources(&self, region: &str) -> AwsResult<Vec<LogSourceSummary>> {
        let client = self.client(region);
        let mut sources = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let out = client
                .list_log_sources()
                .regions(region)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| normalize("Security Lake ListLogSources", e))?;

            for log_source in out.sources() {
                let entries = log_source
                    .sources()
                    .iter()
                    .filter_map(source_entry)
                    .collect();

                sources.push(LogSourceSummary {
                    account: log_source.account().map(str::to_string),
                    region: log_source.region().map(str::to_string),
                    sources: entries,
                });
            }

            match out.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        trace!("Listed {} log source groups", sources.len());
        Ok(sources)
    }

    async fn list_subscribers(&self, region: &str) -> AwsResult<Vec<SubscriberSummary>> {
        let client = self.client(region);
        let mut subscribers = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let out = client
                .list_subscribers()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| normalize("Security Lake ListSubscribers", e))?;

            subscribers.extend(out.subscribers().iter().map(subscriber_summary));

            match out.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        trace!("Listed {} subscribers", subscribers.len());
        Ok(subscribers)
    }
}
