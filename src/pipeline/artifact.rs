//! 调研文档的磁盘存储，按 (category, subcategory) 确定性寻址

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ResearchError;

/// 单个 (category, subcategory) 对应的文档文件名
const ARTIFACT_FILE_NAME: &str = "research_summary.txt";

/// 调研文档存储。同一键的并发写入不加锁，以最后写入者为准。
#[derive(Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// (category, subcategory) 对应的文档目录
    pub fn directory(&self, category: &str, subcategory: &str) -> PathBuf {
        self.root.join(category).join(subcategory)
    }

    /// 文档文件的完整路径
    pub fn artifact_path(&self, category: &str, subcategory: &str) -> PathBuf {
        self.directory(category, subcategory).join(ARTIFACT_FILE_NAME)
    }

    /// 写入调研摘要，覆盖同键的历史文档。写入失败视为致命错误。
    pub fn save(
        &self,
        category: &str,
        subcategory: &str,
        summary: &str,
    ) -> Result<PathBuf, ResearchError> {
        let directory = self.directory(category, subcategory);
        fs::create_dir_all(&directory).map_err(|source| ResearchError::Persist {
            path: directory.clone(),
            source,
        })?;

        let path = self.artifact_path(category, subcategory);
        let content = format!(
            "Market Research Summary:\n\nGenerated at: {} (UTC)\n\n{}\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
            summary.trim()
        );
        fs::write(&path, content).map_err(|source| ResearchError::Persist {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// 读取并合并某键下的全部文本文档。
    /// 目录不存在返回 `ArtifactNotFound`，没有可读的非空文档返回 `ArtifactEmpty`。
    pub fn load_combined(
        &self,
        category: &str,
        subcategory: &str,
    ) -> Result<String, ResearchError> {
        let directory = self.directory(category, subcategory);
        if !directory.exists() {
            return Err(ResearchError::ArtifactNotFound(directory));
        }

        let mut documents = Vec::new();
        for path in enumerate_text_files(&directory) {
            match fs::read_to_string(&path) {
                Ok(content) if !content.trim().is_empty() => documents.push(content),
                Ok(_) => {}
                Err(e) => {
                    eprintln!("⚠️ 无法读取调研文档 {}: {}", path.display(), e);
                }
            }
        }

        if documents.is_empty() {
            return Err(ResearchError::ArtifactEmpty(directory));
        }

        Ok(documents.join("\n"))
    }
}

/// 枚举目录下的 *.txt 文档，枚举顺序不做保证。
/// glob通配模式只作用于文件名，目录部分按字面转义，category/subcategory
/// 中的 `[`、`*`、`?` 等字符不会影响匹配。
fn enumerate_text_files(directory: &Path) -> Vec<PathBuf> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&directory.to_string_lossy()),
        "*.txt"
    );
    match glob::glob(&pattern) {
        Ok(entries) => entries.flatten().collect(),
        Err(e) => {
            eprintln!("⚠️ 文档枚举模式非法 {}: {}", pattern, e);
            Vec::new()
        }
    }
}
