//! DescribeTable-backed metadata source

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{KeySchemaElement, KeyType, TableDescription};
use aws_sdk_dynamodb::Client;
use tracing::debug;

use super::source::{KeyRole, LiveIndex, LiveKeyElement, LiveTable, MetadataSource, ResolveError};
use crate::config::CodegenConfig;
use crate::parser::IndexKind;

/// Error codes DynamoDB uses for credential and authorization failures
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDeniedException",
    "UnrecognizedClientException",
    "ExpiredTokenException",
    "InvalidSignatureException",
];

/// Metadata source that calls DynamoDB `DescribeTable`.
///
/// Cloning is cheap: the SDK client is `Arc`-backed.
#[derive(Clone, Debug)]
pub struct DynamoMetadataSource {
    client: Client,
}

impl DynamoMetadataSource {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS provider chain, applying the
    /// region, profile and endpoint overrides from `config`.
    pub async fn from_config(config: &CodegenConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            debug!("Using DynamoDB endpoint {}", endpoint_url);
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }

    /// Get a reference to the underlying SDK client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl MetadataSource for DynamoMetadataSource {
    async fn describe_table(&self, table_name: &str) -> Result<LiveTable, ResolveError> {
        debug!("DescribeTable {}", table_name);
        let output = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(classify_error)?;

        let description = output.table.ok_or_else(|| ResolveError::Service {
            code: "EmptyResponse".to_string(),
            message: format!("DescribeTable returned no description for {}", table_name),
        })?;
        Ok(live_table_from(table_name, &description))
    }
}

fn classify_error(err: SdkError<DescribeTableError>) -> ResolveError {
    match &err {
        SdkError::ServiceError(service) => {
            let error = service.err();
            let message = error.message().unwrap_or_default().to_string();
            if error.is_resource_not_found_exception() {
                return ResolveError::NotFound(message);
            }
            let code = error.code().unwrap_or("Unknown");
            if ACCESS_DENIED_CODES.contains(&code) {
                ResolveError::AccessDenied(message)
            } else {
                ResolveError::Service {
                    code: code.to_string(),
                    message,
                }
            }
        }
        _ => ResolveError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

fn live_table_from(table_name: &str, description: &TableDescription) -> LiveTable {
    let mut indexes = Vec::new();
    for gsi in description.global_secondary_indexes() {
        indexes.push(LiveIndex {
            name: gsi.index_name().unwrap_or_default().to_string(),
            kind: IndexKind::Global,
            key_schema: key_elements(gsi.key_schema()),
        });
    }
    for lsi in description.local_secondary_indexes() {
        indexes.push(LiveIndex {
            name: lsi.index_name().unwrap_or_default().to_string(),
            kind: IndexKind::Local,
            key_schema: key_elements(lsi.key_schema()),
        });
    }

    LiveTable {
        name: description
            .table_name()
            .unwrap_or(table_name)
            .to_string(),
        key_schema: key_elements(description.key_schema()),
        attribute_definitions: description
            .attribute_definitions()
            .iter()
            .map(|def| {
                (
                    def.attribute_name().to_string(),
                    def.attribute_type().as_str().to_string(),
                )
            })
            .collect(),
        indexes,
    }
}

fn key_elements(schema: &[KeySchemaElement]) -> Vec<LiveKeyElement> {
    schema
        .iter()
        .filter_map(|element| {
            let role = match element.key_type() {
                KeyType::Hash => KeyRole::Hash,
                KeyType::Range => KeyRole::Range,
                _ => return None,
            };
            Some(LiveKeyElement {
                attribute_name: element.attribute_name().to_string(),
                role,
            })
        })
        .collect()
}
