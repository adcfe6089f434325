use aws_config::BehaviorVersion;
use aws_types::SdkConfig;

/// Loads the SDK configuration shared by the ECS and ECR clients. Region and credentials come
/// from the standard environment chain, which the Lambda runtime populates.
pub(crate) async fn sdk_config() -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest()).load().await
}
