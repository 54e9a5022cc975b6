//! 媒体库能力：站点媒体文件管理与播放列表生成。
//!
//! 目录约定（root 即配置的 media_root）：
//! - 站点目录：`<root>/<site>`（上传/列表/删除、播放列表生成的作用域）
//! - 设备目录：`<root>/<site>/<location>`（设备下载与 sync 读取的作用域）
//! - 播放列表：固定文件名 `playlist.txt`，生成时整体覆盖
//!
//! 并发约定：对同一路径的并发写入为后写者胜出，不做建议锁；
//! sync 读取与播放列表重建之间的竞争是已接受的设计（无原子换名）。

use std::path::{Path, PathBuf};
use tracing::info;

/// 播放列表文件名（站点目录与设备目录内通用）。
pub const PLAYLIST_FILE: &str = "playlist.txt";

/// 播放列表收录的扩展名允许清单（不区分大小写）。
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["mp4", "mov", "jpg", "jpeg", "png"];

/// 媒体库错误。
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 文件系统上的媒体库。
pub struct MediaLibrary {
    root: PathBuf,
}

impl MediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn site_dir(&self, site: &str) -> Result<PathBuf, MediaError> {
        ensure_component(site)?;
        Ok(self.root.join(site))
    }

    fn device_dir(&self, site: &str, location: &str) -> Result<PathBuf, MediaError> {
        ensure_component(location)?;
        Ok(self.site_dir(site)?.join(location))
    }

    /// 保存一个站点媒体文件；已存在且未要求替换时报冲突。
    pub async fn save_file(
        &self,
        site: &str,
        filename: &str,
        bytes: &[u8],
        replace: bool,
    ) -> Result<PathBuf, MediaError> {
        ensure_component(filename)?;
        let dir = self.site_dir(site)?;
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(filename);
        if !replace && tokio::fs::try_exists(&path).await? {
            return Err(MediaError::AlreadyExists(filename.to_string()));
        }
        tokio::fs::write(&path, bytes).await?;
        info!(site, filename, "media_file_saved");
        Ok(path)
    }

    /// 列出站点目录下的文件（目录缺失视为空）。
    pub async fn list_files(&self, site: &str) -> Result<Vec<String>, MediaError> {
        let dir = self.site_dir(site)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Ok(name) = entry.file_name().into_string() {
                    files.push(name);
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// 删除一个站点媒体文件（不存在时静默成功）。
    pub async fn delete_file(&self, site: &str, filename: &str) -> Result<(), MediaError> {
        ensure_component(filename)?;
        let path = self.site_dir(site)?.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(site, filename, "media_file_deleted");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// 读取设备目录下的一个媒体文件（下载路径）。
    pub async fn read_device_file(
        &self,
        site: &str,
        location: &str,
        filename: &str,
    ) -> Result<Vec<u8>, MediaError> {
        ensure_component(filename)?;
        let path = self.device_dir(site, location)?.join(filename);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaError::NotFound(filename.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 读取设备目录的播放列表（文件缺失视为空列表）。
    pub async fn read_playlist(
        &self,
        site: &str,
        location: &str,
    ) -> Result<Vec<String>, MediaError> {
        let path = self.device_dir(site, location)?.join(PLAYLIST_FILE);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// 重建站点播放列表。
    ///
    /// 非递归扫描站点目录，按扩展名允许清单过滤，字典序排序，
    /// 逐行写入 `playlist.txt`（覆盖旧内容），返回收录的文件名。
    pub async fn build_playlist(&self, site: &str) -> Result<Vec<String>, MediaError> {
        let dir = self.site_dir(site)?;
        if !tokio::fs::try_exists(&dir).await? {
            return Err(MediaError::NotFound(site.to_string()));
        }
        let mut entries = tokio::fs::read_dir(&dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if has_allowed_extension(&name) {
                files.push(name);
            }
        }
        files.sort();
        let mut content = String::new();
        for name in &files {
            content.push_str(name);
            content.push('\n');
        }
        tokio::fs::write(dir.join(PLAYLIST_FILE), content).await?;
        info!(site, entries = files.len(), "playlist_rebuilt");
        Ok(files)
    }
}

/// 扩展名是否在允许清单内（不区分大小写）。
fn has_allowed_extension(filename: &str) -> bool {
    let Some((_, extension)) = filename.rsplit_once('.') else {
        return false;
    };
    let extension = extension.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&extension.as_str())
}

/// 路径片段校验：站点名/位置名/文件名都必须是单层片段，
/// 不能逃出媒体根目录。
fn ensure_component(value: &str) -> Result<(), MediaError> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
    {
        return Err(MediaError::InvalidName(value.to_string()));
    }
    Ok(())
}

/// 按扩展名推断下载响应的 Content-Type。
pub fn content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_allowed_extension("clip.MOV"));
        assert!(has_allowed_extension("photo.Jpeg"));
        assert!(!has_allowed_extension("notes.txt"));
        assert!(!has_allowed_extension("noextension"));
    }

    #[test]
    fn path_components_cannot_escape_root() {
        assert!(ensure_component("..").is_err());
        assert!(ensure_component("a/b").is_err());
        assert!(ensure_component("a\\b").is_err());
        assert!(ensure_component("").is_err());
        assert!(ensure_component("a.mp4").is_ok());
    }

    #[test]
    fn content_types_cover_allowed_extensions() {
        assert_eq!(content_type("a.mp4"), "video/mp4");
        assert_eq!(content_type("b.PNG"), "image/png");
        assert_eq!(content_type("c.bin"), "application/octet-stream");
    }
}
