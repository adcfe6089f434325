use crate::error::{self, Result};
use async_trait::async_trait;
use aws_sdk_ecr::types::ImageIdentifier;
use aws_types::SdkConfig;
use snafu::{OptionExt, ResultExt};

/// Resolves image tags to digests.
#[async_trait]
pub(crate) trait Ecr: Send + Sync {
    /// Returns the digest (`sha256:...`) of the image tagged `tag` in `repository`.
    async fn image_digest(&self, repository: &str, tag: &str) -> Result<String>;
}

/// `Ecr` backed by the AWS SDK.
pub(crate) struct AwsEcr {
    client: aws_sdk_ecr::Client,
}

impl AwsEcr {
    pub(crate) fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecr::Client::new(config),
        }
    }
}

#[async_trait]
impl Ecr for AwsEcr {
    async fn image_digest(&self, repository: &str, tag: &str) -> Result<String> {
        let output = self
            .client
            .describe_images()
            .repository_name(repository)
            .image_ids(ImageIdentifier::builder().image_tag(tag).build())
            .send()
            .await
            .context(error::DescribeImagesSnafu { repository, tag })?;

        output
            .image_details()
            .first()
            .context(error::ImageNotFoundSnafu { repository, tag })?
            .image_digest()
            .map(str::to_string)
            .context(error::MissingSnafu {
                operation: "DescribeImages",
                field: "imageDigest",
            })
    }
}
