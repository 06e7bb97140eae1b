pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use crate::core::normalize::DoubleFactorial;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "geomag-tablegen")]
    #[command(about = "Generate a normalized spherical-harmonic coefficient table from a WMM .COF file")]
    pub struct CliConfig {
        /// Path to the coefficient file
        #[arg(short, long)]
        pub input: String,

        #[arg(long, default_value = ".")]
        pub output_path: String,

        #[arg(long, default_value = "coeffs.inc")]
        pub table_file: String,

        /// Also write the secular-variation table under this name
        #[arg(long)]
        pub secular_file: Option<String>,

        /// Also write the EPOCH/N_MAX/TOTAL_COEFFS defines under this name
        #[arg(long)]
        pub constants_file: Option<String>,

        /// Also write the normalized model as JSON under this name
        #[arg(long)]
        pub json_file: Option<String>,

        #[arg(long, value_enum, default_value_t = DoubleFactorial::Legacy)]
        pub double_factorial: DoubleFactorial,

        #[arg(long, default_value = "REAL")]
        pub literal_macro: String,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn table_filename(&self) -> &str {
            &self.table_file
        }

        fn secular_filename(&self) -> Option<&str> {
            self.secular_file.as_deref()
        }

        fn constants_filename(&self) -> Option<&str> {
            self.constants_file.as_deref()
        }

        fn json_filename(&self) -> Option<&str> {
            self.json_file.as_deref()
        }

        fn double_factorial(&self) -> DoubleFactorial {
            self.double_factorial
        }

        fn literal_macro(&self) -> &str {
            &self.literal_macro
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("input", &self.input)?;
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_file_name("table_file", &self.table_file)?;
            for (field, name) in [
                ("secular_file", &self.secular_file),
                ("constants_file", &self.constants_file),
                ("json_file", &self.json_file),
            ] {
                if let Some(name) = name {
                    validation::validate_file_name(field, name)?;
                }
            }
            validation::validate_identifier("literal_macro", &self.literal_macro)
        }
    }

}
