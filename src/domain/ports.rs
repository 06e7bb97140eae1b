use crate::core::normalize::DoubleFactorial;
use crate::domain::model::{ParsedCoefficients, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn table_filename(&self) -> &str;
    fn secular_filename(&self) -> Option<&str>;
    fn constants_filename(&self) -> Option<&str>;
    fn json_filename(&self) -> Option<&str>;
    fn double_factorial(&self) -> DoubleFactorial;
    fn literal_macro(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ParsedCoefficients>;
    async fn transform(&self, data: ParsedCoefficients) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
