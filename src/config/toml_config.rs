use crate::core::normalize::DoubleFactorial;
use crate::core::render::DEFAULT_LITERAL_MACRO;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, TableGenError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TABLE_FILENAME: &str = "coeffs.inc";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub model: Option<ModelConfig>,
    pub source: SourceConfig,
    pub normalization: Option<NormalizationConfig>,
    pub render: Option<RenderConfig>,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationConfig {
    pub double_factorial: Option<DoubleFactorial>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub literal_macro: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub table_filename: Option<String>,
    pub secular_filename: Option<String>,
    pub constants_filename: Option<String>,
    pub json_filename: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TableGenError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TableGenError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WMM_DIR})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TableGenError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        let input = validation::validate_required_field("source.path", &self.source.path)?;
        validation::validate_path("source.path", input)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        validation::validate_file_name("load.table_filename", self.table_filename())?;
        for (field, name) in [
            ("load.secular_filename", &self.load.secular_filename),
            ("load.constants_filename", &self.load.constants_filename),
            ("load.json_filename", &self.load.json_filename),
        ] {
            if let Some(name) = name {
                validation::validate_file_name(field, name)?;
            }
        }

        if let Some(model) = &self.model {
            validation::validate_non_empty_string("model.name", &model.name)?;
        }

        validation::validate_identifier("render.literal_macro", self.literal_macro())
    }

    /// 取得模型名稱 (僅作為標示)
    pub fn model_name(&self) -> &str {
        self.model.as_ref().map(|m| m.name.as_str()).unwrap_or("unnamed")
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.source.path.as_deref().unwrap_or("")
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn table_filename(&self) -> &str {
        self.load
            .table_filename
            .as_deref()
            .unwrap_or(DEFAULT_TABLE_FILENAME)
    }

    fn secular_filename(&self) -> Option<&str> {
        self.load.secular_filename.as_deref()
    }

    fn constants_filename(&self) -> Option<&str> {
        self.load.constants_filename.as_deref()
    }

    fn json_filename(&self) -> Option<&str> {
        self.load.json_filename.as_deref()
    }

    fn double_factorial(&self) -> DoubleFactorial {
        self.normalization
            .as_ref()
            .and_then(|n| n.double_factorial)
            .unwrap_or_default()
    }

    fn literal_macro(&self) -> &str {
        self.render
            .as_ref()
            .and_then(|r| r.literal_macro.as_deref())
            .unwrap_or(DEFAULT_LITERAL_MACRO)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
