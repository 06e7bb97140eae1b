use crate::core::indexer::build_model;
use crate::core::normalize::DoubleFactorial;
use crate::core::parser::parse_coefficients;
use crate::core::render::TableRenderer;
use crate::core::{ConfigProvider, Model, ParsedCoefficients, Pipeline, Storage, TransformResult};
use crate::utils::error::{Result, TableGenError};
use std::path::Path;

/// Text in, table text out: parse, normalize, index and render the main table.
pub fn generate_table(text: &str, mode: DoubleFactorial, renderer: &TableRenderer) -> Result<String> {
    let parsed = parse_coefficients(text)?;
    let model = build_model(parsed, mode)?;
    Ok(renderer.render_main(&model))
}

pub struct CoeffPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    renderer: TableRenderer,
}

impl<S: Storage, C: ConfigProvider> CoeffPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let renderer = TableRenderer::new(config.literal_macro());
        Self {
            storage,
            config,
            renderer,
        }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    /// Extract and index without rendering or writing anything.
    pub async fn check(&self) -> Result<Model> {
        let parsed = self.extract().await?;
        build_model(parsed, self.config.double_factorial())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CoeffPipeline<S, C> {
    async fn extract(&self) -> Result<ParsedCoefficients> {
        let path = self.config.input_path();
        tracing::debug!("Reading coefficient file: {}", path);

        let bytes = self.storage.read_file(path).await?;
        let text = String::from_utf8(bytes).map_err(|e| {
            TableGenError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is not valid UTF-8: {}", path, e),
            ))
        })?;

        parse_coefficients(&text)
    }

    async fn transform(&self, data: ParsedCoefficients) -> Result<TransformResult> {
        let mode = self.config.double_factorial();
        tracing::debug!("Normalizing {} rows ({} double factorial)", data.rows.len(), mode);

        let model = build_model(data, mode)?;
        let table_output = self.renderer.render_main(&model);
        let secular_output = self
            .config
            .secular_filename()
            .map(|_| self.renderer.render_secular(&model));
        let constants_output = self
            .config
            .constants_filename()
            .map(|_| self.renderer.render_constants(&model));

        Ok(TransformResult {
            model,
            table_output,
            secular_output,
            constants_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let table_path = self.output_file(self.config.table_filename());
        self.storage
            .write_file(&table_path, result.table_output.as_bytes())
            .await?;
        tracing::debug!("Wrote {} table lines to {}", result.model.len(), table_path);

        let extras = [
            (self.config.secular_filename(), result.secular_output.as_deref()),
            (self.config.constants_filename(), result.constants_output.as_deref()),
        ];
        for (name, content) in extras {
            if let (Some(name), Some(content)) = (name, content) {
                let path = self.output_file(name);
                self.storage.write_file(&path, content.as_bytes()).await?;
                tracing::debug!("Wrote {}", path);
            }
        }

        if let Some(name) = self.config.json_filename() {
            let path = self.output_file(name);
            let json_data = serde_json::to_string_pretty(&result.model)?;
            self.storage.write_file(&path, json_data.as_bytes()).await?;
            tracing::debug!("Wrote model JSON to {}", path);
        }

        Ok(table_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::PROVENANCE;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const WMM_DEGREE_2: &str = "    2020.0            WMM-2020        12/10/2019
  1  0  -29404.5       0.0        6.7        0.0
  1  1   -1450.7    4652.9        7.7      -25.1
  2  0   -2499.6       0.0      -11.5        0.0
  2  1    2982.0   -2991.6       -7.1      -30.2
  2  2    1676.8    -734.6       -2.2      -23.9
999999999999999999999999999999999999999999999999
999999999999999999999999999999999999999999999999
";

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_count(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                TableGenError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        secular: Option<String>,
        constants: Option<String>,
        json: Option<String>,
        mode: DoubleFactorial,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                secular: None,
                constants: None,
                json: None,
                mode: DoubleFactorial::Legacy,
            }
        }

        fn with_all_outputs() -> Self {
            Self {
                secular: Some("secular.inc".to_string()),
                constants: Some("constants.inc".to_string()),
                json: Some("model.json".to_string()),
                mode: DoubleFactorial::Legacy,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "WMM.COF"
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn table_filename(&self) -> &str {
            "coeffs.inc"
        }

        fn secular_filename(&self) -> Option<&str> {
            self.secular.as_deref()
        }

        fn constants_filename(&self) -> Option<&str> {
            self.constants.as_deref()
        }

        fn json_filename(&self) -> Option<&str> {
            self.json.as_deref()
        }

        fn double_factorial(&self) -> DoubleFactorial {
            self.mode
        }

        fn literal_macro(&self) -> &str {
            "REAL"
        }
    }

    #[test]
    fn test_generate_table_matches_reference_lines() {
        let out = generate_table(WMM_DEGREE_2, DoubleFactorial::Legacy, &TableRenderer::default())
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], PROVENANCE);
        assert_eq!(
            lines[1],
            "{ .g = REAL(-2.9404500000000000e+04), .h = REAL( 0.0000000000000000e+00) },  // (n =   1, m =   0)"
        );
        assert_eq!(
            lines[2],
            "{ .g = REAL(-1.4507000000000000e+03), .h = REAL( 4.6528999999999996e+03) },  // (n =   1, m =   1)"
        );
        assert_eq!(
            lines[4],
            "{ .g = REAL( 1.7216585027234639e+03), .h = REAL(-1.7272010653076843e+03) },  // (n =   2, m =   1)"
        );
    }

    #[test]
    fn test_generate_table_is_deterministic() {
        let renderer = TableRenderer::default();
        let a = generate_table(WMM_DEGREE_2, DoubleFactorial::Legacy, &renderer).unwrap();
        let b = generate_table(WMM_DEGREE_2, DoubleFactorial::Legacy, &renderer).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_double_factorial_mode_changes_output() {
        let renderer = TableRenderer::default();
        let legacy = generate_table(WMM_DEGREE_2, DoubleFactorial::Legacy, &renderer).unwrap();
        let textbook = generate_table(WMM_DEGREE_2, DoubleFactorial::Textbook, &renderer).unwrap();

        // 一階係數不受影響
        assert_eq!(legacy.lines().nth(1), textbook.lines().nth(1));
        assert_ne!(legacy.lines().nth(3), textbook.lines().nth(3));
        assert!(textbook.contains("REAL(-3.7493999999999996e+03)"));
    }

    #[tokio::test]
    async fn test_extract_reads_from_storage() {
        let storage = MockStorage::new();
        storage.put_file("WMM.COF", WMM_DEGREE_2.as_bytes()).await;
        let pipeline = CoeffPipeline::new(storage, MockConfig::new());

        let parsed = pipeline.extract().await.unwrap();
        assert_eq!(parsed.title, "WMM-2020");
        assert_eq!(parsed.rows.len(), 5);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let pipeline = CoeffPipeline::new(MockStorage::new(), MockConfig::new());
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, TableGenError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_utf8() {
        let storage = MockStorage::new();
        storage.put_file("WMM.COF", &[0xff, 0xfe, 0x00]).await;
        let pipeline = CoeffPipeline::new(storage, MockConfig::new());
        assert!(pipeline.extract().await.is_err());
    }

    #[tokio::test]
    async fn test_check_indexes_without_writing() {
        let storage = MockStorage::new();
        storage.put_file("WMM.COF", WMM_DEGREE_2.as_bytes()).await;
        let pipeline = CoeffPipeline::new(storage.clone(), MockConfig::with_all_outputs());

        let model = pipeline.check().await.unwrap();
        assert_eq!(model.len(), 5);
        assert_eq!(model.nm_max(), 2);
        assert_eq!(storage.file_count().await, 1);
    }

    #[tokio::test]
    async fn test_check_reports_errors_like_a_real_run() {
        let storage = MockStorage::new();
        storage.put_file("WMM.COF", &[0xff, 0xfe, 0x00]).await;
        let pipeline = CoeffPipeline::new(storage, MockConfig::new());

        let checked = pipeline.check().await.unwrap_err();
        let extracted = pipeline.extract().await.unwrap_err();
        assert_eq!(checked.to_string(), extracted.to_string());
        assert_eq!(checked.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_transform_without_optional_outputs() {
        let pipeline = CoeffPipeline::new(MockStorage::new(), MockConfig::new());
        let parsed = parse_coefficients(WMM_DEGREE_2).unwrap();

        let result = pipeline.transform(parsed).await.unwrap();
        assert_eq!(result.model.len(), 5);
        assert!(result.secular_output.is_none());
        assert!(result.constants_output.is_none());
        assert!(result.table_output.starts_with(PROVENANCE));
    }

    #[tokio::test]
    async fn test_transform_renders_secular_and_constants() {
        let pipeline = CoeffPipeline::new(MockStorage::new(), MockConfig::with_all_outputs());
        let parsed = parse_coefficients(WMM_DEGREE_2).unwrap();

        let result = pipeline.transform(parsed).await.unwrap();
        let secular = result.secular_output.unwrap();
        assert!(secular.contains("{ .g = REAL( 6.7000000000000002e+00), .h = REAL( 0.0000000000000000e+00) },  // (n =   1, m =   0)"));
        let constants = result.constants_output.unwrap();
        assert!(constants.contains("#define N_MAX           (2U)"));
        assert!(constants.contains("#define TOTAL_COEFFS    (5U)"));
    }

    #[tokio::test]
    async fn test_transform_propagates_completeness_error() {
        let text = "2020.0 WMM-2020 12/10/2019\n1 0 1 0 0 0\n1 1 1 1 0 0\n2 0 1 0 0 0\n2 2 1 1 0 0\n9999\n";
        let pipeline = CoeffPipeline::new(MockStorage::new(), MockConfig::new());
        let parsed = parse_coefficients(text).unwrap();

        let err = pipeline.transform(parsed).await.unwrap_err();
        assert!(err.is_completeness_error());
    }

    #[tokio::test]
    async fn test_load_writes_table_only() {
        let storage = MockStorage::new();
        let pipeline = CoeffPipeline::new(storage.clone(), MockConfig::new());
        let parsed = parse_coefficients(WMM_DEGREE_2).unwrap();
        let result = pipeline.transform(parsed).await.unwrap();
        let expected = result.table_output.clone();

        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output/coeffs.inc");
        assert_eq!(storage.file_count().await, 1);
        let written = storage.get_file("test_output/coeffs.inc").await.unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_load_writes_all_outputs() {
        let storage = MockStorage::new();
        let pipeline = CoeffPipeline::new(storage.clone(), MockConfig::with_all_outputs());
        let parsed = parse_coefficients(WMM_DEGREE_2).unwrap();
        let result = pipeline.transform(parsed).await.unwrap();

        pipeline.load(result).await.unwrap();

        assert_eq!(storage.file_count().await, 4);
        assert!(storage.get_file("test_output/secular.inc").await.is_some());
        assert!(storage.get_file("test_output/constants.inc").await.is_some());

        let json = storage.get_file("test_output/model.json").await.unwrap();
        let model: Model = serde_json::from_slice(&json).unwrap();
        assert_eq!(model.title, "WMM-2020");
        assert_eq!(model.nm, vec![(1, 0), (1, 1), (2, 0), (2, 1), (2, 2)]);
        assert_eq!(model.g[2], -1249.8);
    }
}
