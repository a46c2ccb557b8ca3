use aws_sdk_bedrockruntime::Client;

/// Build a Bedrock runtime client from a loaded AWS configuration.
pub fn build_client(config: &aws_config::SdkConfig) -> Client {
    Client::new(config)
}
