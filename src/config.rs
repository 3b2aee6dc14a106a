//! アプリケーション設定管理モジュール
//!
//! XDGディレクトリ（または明示的なパス）にあるTOML設定ファイルを読み書きします。

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analytics::metrics::DEFAULT_TOP_SHOWS;
use crate::analytics::report::ReportFormat;
use crate::error::{ViewstatsError, ViewstatsResult};

/// ログ設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// ログレベル (trace/debug/info/warn/error)
    pub level: String,
    /// ログファイル出力先（Noneの場合は標準エラーのみ）
    pub log_dir: Option<PathBuf>,
    /// ログファイル名の接頭辞
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "viewstats.log".to_string(),
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 視聴履歴CSV
    pub input: PathBuf,
    /// レポート出力ディレクトリ
    pub output_dir: PathBuf,
    /// 出力ファイル名（拡張子なし）
    pub output_stem: String,
    /// 出力形式
    pub formats: Vec<ReportFormat>,
    /// 上位番組の件数
    pub top_shows: usize,
    /// ログ設定
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("NetflixViewingHistory.csv"),
            output_dir: PathBuf::from("."),
            output_stem: "viewing_report".to_string(),
            formats: vec![ReportFormat::Text, ReportFormat::Excel],
            top_shows: DEFAULT_TOP_SHOWS,
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// 設定の妥当性を検証
    pub fn validate(&self) -> ViewstatsResult<()> {
        if self.top_shows == 0 {
            return Err(ViewstatsError::config("top_shows must be greater than 0"));
        }

        if self.output_stem.trim().is_empty() {
            return Err(ViewstatsError::config("output_stem must not be empty"));
        }

        Ok(())
    }
}

/// 設定管理マネージャー
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// XDG設定ディレクトリの `config.toml` を使うマネージャーを作成
    pub fn new() -> ViewstatsResult<Self> {
        Ok(Self {
            config_path: Self::default_config_path()?,
        })
    }

    /// 指定パスの設定ファイルを使うマネージャーを作成
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// XDGディレクトリに基づく設定ファイルパスを取得
    pub fn default_config_path() -> ViewstatsResult<PathBuf> {
        let project_dirs = ProjectDirs::from("dev", "sifyfy", "viewstats")
            .ok_or_else(|| ViewstatsError::config("failed to get project directories"))?;

        let config_file = project_dirs.config_dir().join("config.toml");
        debug!("Config file path: {}", config_file.display());

        Ok(config_file)
    }

    /// 設定を読み込み（ファイルがなければ既定値）
    pub fn load_config(&self) -> ViewstatsResult<AppConfig> {
        if !self.config_path.exists() {
            info!(
                "Config file not found, using default settings: {}",
                self.config_path.display()
            );
            return Ok(AppConfig::default());
        }

        let config_content = fs::read_to_string(&self.config_path)
            .map_err(|e| ViewstatsError::io(&self.config_path, e))?;

        let config: AppConfig = toml::from_str(&config_content).map_err(|e| {
            ViewstatsError::config(format!(
                "failed to parse '{}': {}",
                self.config_path.display(),
                e
            ))
        })?;
        config.validate()?;

        info!(
            "✅ Configuration loaded from: {}",
            self.config_path.display()
        );

        Ok(config)
    }

    /// 設定を保存
    pub fn save_config(&self, config: &AppConfig) -> ViewstatsResult<()> {
        let config_content = toml::to_string_pretty(config)
            .map_err(|e| ViewstatsError::config(format!("failed to serialize config: {}", e)))?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ViewstatsError::io(parent, e))?;
        }
        fs::write(&self.config_path, config_content)
            .map_err(|e| ViewstatsError::io(&self.config_path, e))?;

        info!("💾 Configuration saved to: {}", self.config_path.display());

        Ok(())
    }

    /// 設定ファイルパスを取得
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.top_shows, 10);
        assert_eq!(config.input, PathBuf::from("NetflixViewingHistory.csv"));
        assert_eq!(config.log.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("absent.toml"));
        assert_eq!(manager.load_config().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "input = \"history.csv\"\nformats = [\"json\"]\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = ConfigManager::with_path(&path).load_config().unwrap();
        assert_eq!(config.input, PathBuf::from("history.csv"));
        assert_eq!(config.formats, vec![ReportFormat::Json]);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.top_shows, 10);
        assert_eq!(config.output_stem, "viewing_report");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "top_shows = 0\n").unwrap();
        assert!(matches!(
            ConfigManager::with_path(&path).load_config(),
            Err(ViewstatsError::Config { .. })
        ));

        fs::write(&path, "formats = [\"pdf\"]\n").unwrap();
        assert!(matches!(
            ConfigManager::with_path(&path).load_config(),
            Err(ViewstatsError::Config { .. })
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(&path);

        let config = AppConfig {
            top_shows: 5,
            formats: vec![ReportFormat::Excel],
            ..Default::default()
        };
        manager.save_config(&config).unwrap();

        assert_eq!(manager.load_config().unwrap(), config);
    }
}
