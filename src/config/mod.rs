use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP timeouts and deadlines
    pub http: HttpConfig,

    /// Transcript extraction settings
    pub extraction: ExtractionConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Timeout for the non-critical metadata branch
    pub metadata_timeout_secs: u64,

    /// Hard wall-clock budget for the whole strategy chain, sized for a
    /// constrained hosting execution window
    pub transcript_deadline_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Preferred caption languages, in order
    pub languages: Vec<String>,

    /// Delay between failed strategy attempts in milliseconds
    pub attempt_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                request_timeout_secs: 10,
                metadata_timeout_secs: 5,
                transcript_deadline_secs: 20,
            },
            extraction: ExtractionConfig {
                languages: vec!["en".to_string(), "en-US".to_string()],
                attempt_delay_ms: 400,
            },
            app: AppConfig {
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("vidscribe").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.extraction.languages.is_empty() {
            anyhow::bail!("At least one preferred caption language must be configured");
        }

        if self.http.transcript_deadline_secs == 0 {
            anyhow::bail!("Transcript deadline must be greater than zero");
        }

        if self.http.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be greater than zero");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Request Timeout: {}s", self.http.request_timeout_secs);
        println!("  Metadata Timeout: {}s", self.http.metadata_timeout_secs);
        println!("  Transcript Deadline: {}s", self.http.transcript_deadline_secs);
        println!("  Languages: {}", self.extraction.languages.join(", "));
        println!("  Attempt Delay: {}ms", self.extraction.attempt_delay_ms);
        println!("  Default Format: {}", self.app.default_output_format);
    }

    /// Interactive configuration setup
    pub async fn interactive_setup(&self) -> Result<()> {
        println!("Interactive configuration setup coming soon!");
        println!("For now, please edit the config file manually:");
        println!("  {}", Self::config_path()?.display());
        Ok(())
    }
}
