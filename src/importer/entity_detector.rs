// ==========================================
// 排产数据集校验 - 数据集类型识别
// ==========================================
// 规则: 文件名（不含目录, 大小写无关）包含
//   client → clients / worker → workers / task → tasks
// 按 client → worker → task 顺序匹配, 先命中者为准
// ==========================================

use crate::domain::types::EntityKind;
use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

pub struct EntityDetector;

impl EntityDetector {
    const KEYWORDS: [(&'static str, EntityKind); 3] = [
        ("client", EntityKind::Clients),
        ("worker", EntityKind::Workers),
        ("task", EntityKind::Tasks),
    ];

    pub fn detect(&self, path: &Path) -> ImportResult<EntityKind> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| file_name.contains(keyword))
            .map(|(_, entity)| *entity)
            .ok_or_else(|| ImportError::UnknownEntity(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_file_name() {
        let detector = EntityDetector;
        assert_eq!(
            detector.detect(Path::new("data/Clients_2024.csv")).unwrap(),
            EntityKind::Clients
        );
        assert_eq!(
            detector.detect(Path::new("WORKERS.xlsx")).unwrap(),
            EntityKind::Workers
        );
        assert_eq!(
            detector.detect(Path::new("my-task-list.csv")).unwrap(),
            EntityKind::Tasks
        );
    }

    #[test]
    fn test_directory_name_is_ignored() {
        let detector = EntityDetector;
        assert!(matches!(
            detector.detect(Path::new("tasks/people.csv")),
            Err(ImportError::UnknownEntity(_))
        ));
    }
}
