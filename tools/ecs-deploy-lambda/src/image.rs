//! Builds the image references a deployment points the main container at.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches an ECR repository URI and captures the repository name, e.g.
    /// `123456789012.dkr.ecr.us-west-2.amazonaws.com/team/app` -> `team/app`.
    static ref ECR_REPOSITORY_URI: Regex =
        Regex::new(r"^[^.]+\.dkr\.ecr\.[^.]+\.amazonaws\.com/(.*)$").unwrap();
}

/// Returns `<image_name>:<version>`. The version is used as given.
pub(crate) fn tagged(image_name: &str, version: &str) -> String {
    format!("{}:{}", image_name, version)
}

/// Returns `<image_name>@<digest>`.
pub(crate) fn pinned(image_name: &str, digest: &str) -> String {
    format!("{}@{}", image_name, digest)
}

/// Returns the ECR repository name if the image lives in an ECR registry.
pub(crate) fn ecr_repository(image_name: &str) -> Option<&str> {
    ECR_REPOSITORY_URI
        .captures(image_name)
        .and_then(|captures| captures.get(1))
        .map(|repository| repository.as_str())
        .filter(|repository| !repository.is_empty())
}
