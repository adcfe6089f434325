//! Provides the list of errors for `ecs-deploy-lambda`.

use aws_smithy_types::error::display::DisplayErrorContext;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum Error {
    #[snafu(display("Failed to read configuration from environment: {}", source))]
    ConfigEnv { source: envy::Error },

    #[snafu(display("Invalid log level '{}': {}", level, source))]
    LogLevel {
        level: String,
        source: log::ParseLevelError,
    },

    #[snafu(display("Unable to configure logger: {}", source))]
    Logger { source: log::SetLoggerError },

    #[snafu(display("Request is not a JSON object with a 'version' field: {}", source))]
    InvalidRequest { source: serde_json::Error },

    #[snafu(display("Request is missing the 'version' field"))]
    MissingVersion,

    #[snafu(display("Request 'version' must be a string, got {}", version))]
    InvalidVersion { version: String },

    #[snafu(display(
        "Unable to describe task definition '{}': {}",
        task_definition,
        DisplayErrorContext(source)
    ))]
    DescribeTaskDefinition {
        task_definition: String,
        source: aws_sdk_ecs::error::SdkError<
            aws_sdk_ecs::operation::describe_task_definition::DescribeTaskDefinitionError,
        >,
    },

    #[snafu(display("Task definition '{}' has no container definitions", task_definition))]
    NoContainerDefinitions { task_definition: String },

    #[snafu(display(
        "Unable to register task definition for family '{}': {}",
        family,
        DisplayErrorContext(source)
    ))]
    RegisterTaskDefinition {
        family: String,
        source: aws_sdk_ecs::error::SdkError<
            aws_sdk_ecs::operation::register_task_definition::RegisterTaskDefinitionError,
        >,
    },

    #[snafu(display(
        "Unable to update service '{}' in cluster '{}': {}",
        service,
        cluster,
        DisplayErrorContext(source)
    ))]
    UpdateService {
        cluster: String,
        service: String,
        source: aws_sdk_ecs::error::SdkError<
            aws_sdk_ecs::operation::update_service::UpdateServiceError,
        >,
    },

    #[snafu(display(
        "Unable to describe image '{}:{}' in ECR: {}",
        repository,
        tag,
        DisplayErrorContext(source)
    ))]
    DescribeImages {
        repository: String,
        tag: String,
        source: aws_sdk_ecr::error::SdkError<
            aws_sdk_ecr::operation::describe_images::DescribeImagesError,
        >,
    },

    #[snafu(display("Missing field '{}' in {} response", field, operation))]
    Missing {
        operation: &'static str,
        field: &'static str,
    },

    #[snafu(display("Image '{}:{}' not found in ECR", repository, tag))]
    ImageNotFound { repository: String, tag: String },
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
