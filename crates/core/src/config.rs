//! Configuration management for the degree program advisor.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults (mirroring the reference deployment layout)
//! - Config file (`.advisor/config.yaml` in the workspace, or `ADVISOR_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Relative paths in the `knowledge` section resolve against the workspace.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["ollama", "openai", "groq"];

/// Embedding providers the knowledge crate knows how to build.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["ollama", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .advisor/ and the data files)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Reasoning provider ("ollama", "groq", "openai")
    pub provider: String,

    /// Model identifier used for routing and answering
    pub model: String,

    /// Explicit API key, overrides provider-specific env vars
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Reasoning provider configurations
    pub llm: Option<LlmConfig>,

    /// Embedding settings for the handbook index
    pub embedding: EmbeddingConfig,

    /// Knowledge store locations and ingestion settings
    pub knowledge: KnowledgeConfig,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    /// Any OpenAI-compatible chat completions endpoint (OpenAI, Groq)
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAI { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::OpenAI { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
        }
    }
}

/// Embedding configuration for the handbook index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingConfig {
    /// Provider name: "ollama" or "mock"
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Model identifier (provider-specific)
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding vector dimensions
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,

    /// Provider endpoint (falls back to OLLAMA_URL, then localhost)
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_embedding_provider() -> String {
    "ollama".to_string()
}

// 384-dim MiniLM, same family as the model the handbook was first embedded with
fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

fn default_embedding_dimensions() -> usize {
    384
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            dimensions: default_embedding_dimensions(),
            endpoint: None,
        }
    }
}

/// Where the two knowledge sources and the prompt templates live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeConfig {
    /// JSON file mapping subject key to document text
    #[serde(default = "default_subjects_path")]
    pub subjects_path: PathBuf,

    /// YAML file with `router_prompt` and `rag_final_prompt`
    #[serde(default = "default_prompts_path")]
    pub prompts_path: PathBuf,

    /// LanceDB directory holding the handbook collection
    #[serde(default = "default_handbook_db_path")]
    pub handbook_db_path: PathBuf,

    /// Collection (table) name inside the handbook database
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Handbook chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive handbook chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_subjects_path() -> PathBuf {
    PathBuf::from("subjects_db.json")
}

fn default_prompts_path() -> PathBuf {
    PathBuf::from("config/rag_prompts.yaml")
}

fn default_handbook_db_path() -> PathBuf {
    PathBuf::from("handbook_db")
}

fn default_collection() -> String {
    "handbook".to_string()
}

fn default_chunk_size() -> usize {
    1500
}

fn default_chunk_overlap() -> usize {
    300
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            subjects_path: default_subjects_path(),
            prompts_path: default_prompts_path(),
            handbook_db_path: default_handbook_db_path(),
            collection: default_collection(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    embedding: Option<EmbeddingConfig>,
    knowledge: Option<KnowledgeConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.1:8b".to_string(),
            api_key: None,
            log_level: None,
            log_format: LogFormat::default(),
            verbose: false,
            no_color: false,
            llm: None,
            embedding: EmbeddingConfig::default(),
            knowledge: KnowledgeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file, and the environment.
    ///
    /// `workspace` and `config_file` come from the command line when given;
    /// otherwise `ADVISOR_WORKSPACE` / `ADVISOR_CONFIG` are consulted.
    ///
    /// Environment variables:
    /// - `ADVISOR_WORKSPACE`: Override workspace path
    /// - `ADVISOR_CONFIG`: Path to config file
    /// - `ADVISOR_PROVIDER`: Reasoning provider
    /// - `ADVISOR_MODEL`: Model identifier
    /// - `ADVISOR_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use advisor_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None, None).expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("ADVISOR_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("ADVISOR_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.advisor_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("ADVISOR_PROVIDER") {
            config.provider = provider.to_lowercase();
        }

        if let Ok(model) = std::env::var("ADVISOR_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("ADVISOR_API_KEY").ok();

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self;

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(knowledge) = config_file.knowledge {
            result.knowledge = knowledge;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.to_lowercase();

            if let Some(provider_config) = llm.providers.get(&result.provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over both the config file and the environment.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider.map(|p| p.to_lowercase()) {
            // A provider switch invalidates a model picked for the old provider
            if provider != self.provider {
                if let Some(pc) = self.get_provider_config(&provider) {
                    self.model = pc.model().to_string();
                }
            }
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .advisor directory.
    pub fn advisor_dir(&self) -> PathBuf {
        self.workspace.join(".advisor")
    }

    /// Resolve a possibly-relative path against the workspace.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    pub fn subjects_path(&self) -> PathBuf {
        self.resolve_path(&self.knowledge.subjects_path)
    }

    pub fn prompts_path(&self) -> PathBuf {
        self.resolve_path(&self.knowledge.prompts_path)
    }

    pub fn handbook_db_path(&self) -> PathBuf {
        self.resolve_path(&self.knowledge.handbook_db_path)
    }

    /// Get the configuration block for a provider, if the config file has one.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Endpoint for a provider, when configured.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        self.get_provider_config(provider)
            .and_then(|pc| pc.endpoint().map(str::to_string))
    }

    /// Resolve the API key for a provider.
    ///
    /// Order: `ADVISOR_API_KEY`, the provider's `apiKeyEnv`, then the
    /// conventional variable for hosted providers (`GROQ_API_KEY`, `OPENAI_API_KEY`).
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(ProviderConfig::OpenAI { api_key_env, .. }) = self.get_provider_config(provider)
        {
            return std::env::var(&api_key_env).ok();
        }

        default_api_key_env(provider).and_then(|var| std::env::var(var).ok())
    }

    /// Validate configuration before any store or client is built.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider != "ollama" && self.resolve_api_key(provider).is_none() {
            let env_var = match self.get_provider_config(provider) {
                Some(ProviderConfig::OpenAI { api_key_env, .. }) => api_key_env,
                _ => default_api_key_env(provider)
                    .unwrap_or("ADVISOR_API_KEY")
                    .to_string(),
            };
            return Err(AppError::Config(format!(
                "API key for provider '{}' not found in environment variable: {}",
                provider, env_var
            )));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        if self.knowledge.chunk_overlap >= self.knowledge.chunk_size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.knowledge.chunk_overlap, self.knowledge.chunk_size
            )));
        }

        Ok(())
    }
}

fn default_api_key_env(provider: &str) -> Option<&'static str> {
    match provider {
        "groq" => Some("GROQ_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.1:8b");
        assert_eq!(config.knowledge.collection, "handbook");
        assert_eq!(config.knowledge.chunk_size, 1500);
        assert_eq!(config.knowledge.chunk_overlap, 300);
        assert_eq!(config.embedding.dimensions, 384);
        assert!(!config.verbose);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some("groq".to_string()),
            Some("llama-3.1-8b-instant".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "groq");
        assert_eq!(overridden.model, "llama-3.1-8b-instant");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: groq
  providers:
    groq:
      apiKeyEnv: GROQ_API_KEY
      model: llama-3.1-8b-instant
    ollama:
      endpoint: http://localhost:11434
      model: llama3.1:8b
embedding:
  provider: mock
  dimensions: 16
knowledge:
  subjectsPath: data/subjects.json
  collection: handbook_v2
logging:
  level: debug
  format: json
"#,
        )
        .unwrap();

        let config = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(config.provider, "groq");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.embedding.provider, "mock");
        assert_eq!(config.embedding.model, "all-minilm");
        assert_eq!(config.embedding.dimensions, 16);
        assert_eq!(config.knowledge.subjects_path, PathBuf::from("data/subjects.json"));
        assert_eq!(config.knowledge.collection, "handbook_v2");
        assert_eq!(config.knowledge.chunk_size, 1500);
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert_eq!(config.log_format, LogFormat::Json);

        match config.get_provider_config("groq") {
            Some(ProviderConfig::OpenAI { api_key_env, .. }) => {
                assert_eq!(api_key_env, "GROQ_API_KEY")
            }
            other => panic!("Expected OpenAI-compatible provider, got {:?}", other),
        }
        assert_eq!(
            config.resolve_endpoint("ollama"),
            Some("http://localhost:11434".to_string())
        );
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: Groq
  providers:
    groq:
      apiKeyEnv: GROQ_API_KEY
      model: llama-3.1-8b-instant
"#,
        )
        .unwrap();

        let config = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(config.provider, "groq");
        assert_eq!(config.model, "llama-3.1-8b-instant");

        let overridden = AppConfig::default().with_overrides(
            Some("OLLAMA".to_string()),
            None,
            None,
            false,
            false,
        );
        assert_eq!(overridden.provider, "ollama");
        assert!(overridden.validate().is_ok());
    }

    #[test]
    fn test_merge_yaml_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "llm: [not, a, map").unwrap();

        let result = AppConfig::default().merge_yaml(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_missing_explicit_config_file() {
        let temp = TempDir::new().unwrap();
        let result = AppConfig::load(
            Some(temp.path().to_path_buf()),
            Some(temp.path().join("nope.yaml")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_path() {
        let mut config = AppConfig::default();
        config.workspace = PathBuf::from("/srv/advisor");

        assert_eq!(
            config.subjects_path(),
            PathBuf::from("/srv/advisor/subjects_db.json")
        );
        assert_eq!(
            config.resolve_path(Path::new("/etc/prompts.yaml")),
            PathBuf::from("/etc/prompts.yaml")
        );
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_hosted_provider_requires_key() {
        let mut providers = HashMap::new();
        providers.insert(
            "groq".to_string(),
            ProviderConfig::OpenAI {
                api_key_env: "ADVISOR_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
                model: "llama-3.1-8b-instant".to_string(),
                endpoint: None,
            },
        );

        let mut config = AppConfig::default();
        config.provider = "groq".to_string();
        config.llm = Some(LlmConfig {
            active_provider: "groq".to_string(),
            providers,
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ADVISOR_TEST_KEY_THAT_IS_NEVER_SET"));

        config.api_key = Some("explicit".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_chunk_overlap() {
        let mut config = AppConfig::default();
        config.knowledge.chunk_overlap = config.knowledge.chunk_size;
        assert!(config.validate().is_err());
    }
}
