// ==========================================
// 排产数据集校验 - 数据集导入
// ==========================================
// 流程: 识别数据集类型 → 解析文件 → ImportedDataset
// 批量: 多文件并发导入, 单个文件失败不影响其他文件
// ==========================================

use crate::domain::session::ImportedDataset;
use crate::importer::entity_detector::EntityDetector;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

// ==========================================
// WorkspaceImporter Trait
// ==========================================
// 实现者: WorkspaceImporterImpl
#[async_trait]
pub trait WorkspaceImporter: Send + Sync {
    /// 导入单个文件
    ///
    /// # 返回
    /// - Ok(ImportedDataset): 数据集类型 + 原始行
    /// - Err: 类型无法识别 / 文件读取或解析失败
    async fn import_file(&self, path: &Path) -> ImportResult<ImportedDataset>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 返回
    /// - 与输入顺序一致, 每个文件一个结果
    async fn import_files(&self, paths: &[PathBuf]) -> Vec<ImportResult<ImportedDataset>>;
}

// ==========================================
// WorkspaceImporterImpl
// ==========================================
#[derive(Default)]
pub struct WorkspaceImporterImpl;

impl WorkspaceImporterImpl {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkspaceImporter for WorkspaceImporterImpl {
    #[instrument(skip(self), fields(file = %path.display()))]
    async fn import_file(&self, path: &Path) -> ImportResult<ImportedDataset> {
        let entity = EntityDetector.detect(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // 文件解析是阻塞 IO
        let owned = path.to_path_buf();
        let rows = tokio::task::spawn_blocking(move || UniversalFileParser.parse(owned)).await??;

        info!(entity = %entity, rows = rows.len(), "文件导入成功");

        Ok(ImportedDataset {
            entity,
            file_name,
            rows,
        })
    }

    async fn import_files(&self, paths: &[PathBuf]) -> Vec<ImportResult<ImportedDataset>> {
        info!(count = paths.len(), "开始批量导入文件");

        let import_tasks = paths.iter().map(|path| async move {
            let result = self.import_file(path).await;
            if let Err(e) = &result {
                error!(file = %path.display(), error = %e, "文件导入失败");
            }
            result
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
