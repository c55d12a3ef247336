use crate::errors::{BoxError, S3Error};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

#[async_trait]
pub trait CodeStorage: Send + Sync {
    async fn create_prefix(&self, bucket: &str, key: &str) -> Result<(), BoxError>;
}

pub struct S3CodeStorage {
    pub s3: Client,
}

pub fn code_prefix(company_id: &str) -> String {
    format!("{}/", company_id)
}

#[async_trait]
impl CodeStorage for S3CodeStorage {
    async fn create_prefix(&self, bucket: &str, key: &str) -> Result<(), BoxError> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .map_err(S3Error::PutObjectError)?;
        Ok(())
    }
}
