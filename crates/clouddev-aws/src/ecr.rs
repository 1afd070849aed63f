//! Elastic Container Registry.

use aws_sdk_ecr::operation::delete_repository::DeleteRepositoryError;
use aws_sdk_ecr::operation::describe_repositories::DescribeRepositoriesError;
use aws_sdk_ecr::types::Tag as EcrTag;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{AwsError, Result, service_error};
use crate::{AwsClients, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub repository_name: String,
    pub repository_uri: String,
    pub repository_arn: String,
}

impl From<&aws_sdk_ecr::types::Repository> for Repository {
    fn from(repository: &aws_sdk_ecr::types::Repository) -> Self {
        Self {
            repository_name: repository.repository_name().unwrap_or_default().to_string(),
            repository_uri: repository.repository_uri().unwrap_or_default().to_string(),
            repository_arn: repository.repository_arn().unwrap_or_default().to_string(),
        }
    }
}

fn ecr_tags(tags: &[Tag]) -> Result<Vec<EcrTag>> {
    tags.iter()
        .map(|tag| Ok(EcrTag::builder().key(&tag.key).value(&tag.value).build()?))
        .collect()
}

/// The password half of a decoded `AWS:<password>` authorization token.
fn registry_password(token: &str) -> Option<String> {
    let decoded = STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (_user, password) = decoded.split_once(':')?;
    (!password.is_empty()).then(|| password.to_string())
}

impl AwsClients {
    /// Look a repository up by name; `None` when it does not exist.
    pub fn describe_repository(&self, name: &str) -> Result<Option<Repository>> {
        let described = self.block_on(
            self.ecr
                .describe_repositories()
                .repository_names(name)
                .send(),
        );
        match described {
            Ok(output) => Ok(output.repositories().first().map(Repository::from)),
            Err(err) => {
                let err = service_error(
                    "DescribeRepositories",
                    err.into_service_error(),
                    DescribeRepositoriesError::is_repository_not_found_exception,
                );
                if err.is_not_found() { Ok(None) } else { Err(err) }
            }
        }
    }

    pub fn create_repository(&self, name: &str, tags: &[Tag]) -> Result<Repository> {
        let output = self
            .block_on(
                self.ecr
                    .create_repository()
                    .repository_name(name)
                    .set_tags(Some(ecr_tags(tags)?))
                    .send(),
            )
            .map_err(|err| AwsError::service("CreateRepository", err.into_service_error()))?;
        output
            .repository()
            .map(Repository::from)
            .ok_or(AwsError::MissingField {
                operation: "CreateRepository",
                what: "repository",
            })
    }

    /// Delete a repository together with every image in it.
    pub fn delete_repository(&self, name: &str) -> Result<()> {
        self.block_on(
            self.ecr
                .delete_repository()
                .repository_name(name)
                .force(true)
                .send(),
        )
        .map_err(|err| {
            service_error(
                "DeleteRepository",
                err.into_service_error(),
                DeleteRepositoryError::is_repository_not_found_exception,
            )
        })?;
        Ok(())
    }

    /// Password for `docker login` against the account's registry.
    pub fn ecr_login_password(&self) -> Result<String> {
        let output = self
            .block_on(self.ecr.get_authorization_token().send())
            .map_err(|err| AwsError::service("GetAuthorizationToken", err.into_service_error()))?;
        output
            .authorization_data()
            .iter()
            .find_map(|data| data.authorization_token().and_then(registry_password))
            .ok_or(AwsError::MissingField {
                operation: "GetAuthorizationToken",
                what: "authorization token",
            })
    }
}
