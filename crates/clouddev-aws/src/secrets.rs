//! Secrets Manager.

use aws_sdk_secretsmanager::operation::delete_secret::DeleteSecretError;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;

use crate::error::{AwsError, Result, service_error};
use crate::{AwsClients, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub arn: String,
    pub name: String,
}

fn secret_tags(tags: &[Tag]) -> Vec<aws_sdk_secretsmanager::types::Tag> {
    tags.iter()
        .map(|tag| {
            aws_sdk_secretsmanager::types::Tag::builder()
                .key(&tag.key)
                .value(&tag.value)
                .build()
        })
        .collect()
}

impl AwsClients {
    pub fn get_secret_string(&self, secret_id: &str) -> Result<String> {
        let output = self
            .block_on(self.secrets.get_secret_value().secret_id(secret_id).send())
            .map_err(|err| {
                service_error(
                    "GetSecretValue",
                    err.into_service_error(),
                    GetSecretValueError::is_resource_not_found_exception,
                )
            })?;
        output
            .secret_string()
            .map(str::to_string)
            .ok_or(AwsError::MissingField {
                operation: "GetSecretValue",
                what: "SecretString",
            })
    }

    pub fn create_secret(&self, name: &str, secret_string: &str, tags: &[Tag]) -> Result<SecretRef> {
        let output = self
            .block_on(
                self.secrets
                    .create_secret()
                    .name(name)
                    .secret_string(secret_string)
                    .set_tags(Some(secret_tags(tags)))
                    .send(),
            )
            .map_err(|err| AwsError::service("CreateSecret", err.into_service_error()))?;
        Ok(SecretRef {
            arn: output.arn().unwrap_or_default().to_string(),
            name: output.name().unwrap_or(name).to_string(),
        })
    }

    /// Delete a secret immediately, skipping the recovery window.
    pub fn delete_secret(&self, secret_id: &str) -> Result<()> {
        self.block_on(
            self.secrets
                .delete_secret()
                .secret_id(secret_id)
                .force_delete_without_recovery(true)
                .send(),
        )
        .map_err(|err| {
            service_error(
                "DeleteSecret",
                err.into_service_error(),
                DeleteSecretError::is_resource_not_found_exception,
            )
        })?;
        Ok(())
    }
}
