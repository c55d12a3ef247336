mod config;
mod dynamodb;
mod errors;
mod event;
mod handler;
mod iot;
mod model;
mod policy;
mod s3;

use crate::config::{Config, Platform};
use crate::dynamodb::DynamoRecordStore;
use crate::handler::function_handler;
use crate::iot::IotDeviceRegistry;
use crate::model::AppState;
use crate::s3::S3CodeStorage;
use aws_config::BehaviorVersion;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = Config::from_env();
    if let Platform::Unset(platform) = &config.platform {
        tracing::info!(?platform, "no platform defined");
        return Ok(());
    }

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let state = AppState {
        config: Arc::new(config),
        store: Arc::new(DynamoRecordStore {
            db: aws_sdk_dynamodb::Client::new(&aws),
        }),
        registry: Arc::new(IotDeviceRegistry {
            iot: aws_sdk_iot::Client::new(&aws),
        }),
        storage: Arc::new(S3CodeStorage {
            s3: aws_sdk_s3::Client::new(&aws),
        }),
    };

    run(service_fn(|event: LambdaEvent<Value>| {
        let state = state.clone();
        async move { function_handler(&state, event).await.map_err(Error::from) }
    }))
    .await
}
