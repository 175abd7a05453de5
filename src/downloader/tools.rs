use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::errors::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    YtDlp,
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    fn binary_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }

    fn version_arg(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "--version",
            ToolType::Ffmpeg => "-version", // ffmpeg uses a single dash
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: Option<PathBuf>,
    pub is_available: bool,
}

pub struct ToolManager;

impl ToolManager {
    pub fn new() -> Self {
        Self
    }

    /// Path of a usable binary: the explicit override if given, otherwise
    /// the first hit in common install locations or `PATH`.
    pub fn locate(
        &self,
        tool_type: ToolType,
        override_path: Option<&Path>,
    ) -> Result<PathBuf, ProviderError> {
        if let Some(path) = override_path {
            return if path.exists() {
                Ok(path.to_path_buf())
            } else {
                Err(ProviderError::ToolNotFound(format!(
                    "{} not found at {}",
                    tool_type.as_str(),
                    path.display()
                )))
            };
        }

        self.detect_tool(tool_type).ok_or_else(|| {
            ProviderError::ToolNotFound(format!("{} is not installed or not in PATH", tool_type.as_str()))
        })
    }

    /// Like `locate`, but never fails: an override is returned as-is and an
    /// undiscovered tool falls back to its bare name, so the spawn error
    /// surfaces at the stage that needs the tool.
    pub fn find_binary(&self, tool_type: ToolType, override_path: Option<&Path>) -> PathBuf {
        if let Some(path) = override_path {
            return path.to_path_buf();
        }
        self.detect_tool(tool_type)
            .unwrap_or_else(|| PathBuf::from(tool_type.binary_name()))
    }

    pub fn get_tool_info(&self, tool_type: ToolType, override_path: Option<&Path>) -> ToolInfo {
        let path = self.locate(tool_type, override_path).ok();
        let version = path.as_deref().and_then(|p| self.get_version(p, tool_type));

        ToolInfo {
            name: tool_type.as_str().to_string(),
            tool_type,
            is_available: path.is_some(),
            version,
            path,
        }
    }

    fn detect_tool(&self, tool_type: ToolType) -> Option<PathBuf> {
        let binary_name = tool_type.binary_name();

        // 1. Try common paths first
        let common_dirs = ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"];

        for dir in common_dirs {
            let path = Path::new(dir).join(&binary_name);
            if path.exists() {
                debug!(tool = tool_type.as_str(), path = %path.display(), "found in common location");
                return Some(path);
            }
        }

        // 2. Try PATH
        let finder = if cfg!(windows) { "where" } else { "which" };
        if let Ok(output) = Command::new(finder).arg(&binary_name).output() {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if let Some(first) = stdout.lines().map(str::trim).find(|l| !l.is_empty()) {
                    debug!(tool = tool_type.as_str(), path = first, "found in PATH");
                    return Some(PathBuf::from(first));
                }
            }
        }

        None
    }

    fn get_version(&self, path: &Path, tool_type: ToolType) -> Option<String> {
        match Command::new(path).arg(tool_type.version_arg()).output() {
            Ok(output) if output.status.success() => {
                // ffmpeg prints a banner; the version is on the first line
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .map(|l| l.trim().to_string())
            }
            _ => None,
        }
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_must_exist() {
        let manager = ToolManager::new();
        let err = manager
            .locate(ToolType::Ffmpeg, Some(Path::new("/nowhere/ffmpeg")))
            .unwrap_err();
        assert!(matches!(err, ProviderError::ToolNotFound(ref m) if m.contains("/nowhere/ffmpeg")));
    }

    #[test]
    fn test_override_is_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("yt-dlp");
        std::fs::write(&fake, b"").unwrap();

        let manager = ToolManager::new();
        assert_eq!(manager.locate(ToolType::YtDlp, Some(&fake)).unwrap(), fake);
    }

    #[test]
    fn test_find_binary_never_fails() {
        let manager = ToolManager::new();
        assert_eq!(
            manager.find_binary(ToolType::Ffmpeg, Some(Path::new("/nowhere/ffmpeg"))),
            PathBuf::from("/nowhere/ffmpeg")
        );
        let found = manager.find_binary(ToolType::YtDlp, None);
        assert!(found.ends_with(ToolType::YtDlp.binary_name()));
    }

    #[test]
    fn test_unavailable_tool_info() {
        let info = ToolManager::new().get_tool_info(ToolType::YtDlp, Some(Path::new("/nowhere/yt-dlp")));
        assert!(!info.is_available);
        assert_eq!(info.version, None);
        assert_eq!(info.name, "yt-dlp");
    }
}
