use aws_sdk_s3::Client;

/// Load the shared AWS configuration for `region`.
pub async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

/// Build an S3 client from an already loaded configuration.
pub fn build_client(config: &aws_config::SdkConfig) -> Client {
    Client::new(config)
}
