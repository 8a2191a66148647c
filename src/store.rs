//! Persistence for generated citations.
//!
//! A repository is an ordered list of [`Citation`]s keyed by id. New
//! citations are appended; saving an existing id replaces it in place.
//!
//! # Example
//!
//! ```
//! use citegen::{CitationRepository, MemoryRepository};
//! use citegen::store::StoreResult;
//!
//! # fn main() -> StoreResult<()> {
//! let mut repository = MemoryRepository::new();
//! assert!(repository.list()?.is_empty());
//! assert!(!repository.delete("missing")?);
//! # Ok(())
//! # }
//! ```

use crate::{Citation, CitationEdit, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of a repository operation.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// An ordered store of citations keyed by id.
pub trait CitationRepository {
    /// All citations in insertion order.
    fn list(&self) -> StoreResult<Vec<Citation>>;

    fn get(&self, id: &str) -> StoreResult<Option<Citation>>;

    /// Appends `citation`, or replaces the stored citation with the same id.
    fn save(&mut self, citation: Citation) -> StoreResult<()>;

    /// Removes a citation. Returns whether anything was removed.
    fn delete(&mut self, id: &str) -> StoreResult<bool>;

    /// Applies `edit` to a stored citation and saves it.
    ///
    /// Returns the edited citation, or `None` if no citation has that id.
    fn edit(&mut self, id: &str, edit: CitationEdit) -> StoreResult<Option<Citation>> {
        let Some(mut citation) = self.get(id)? else {
            return Ok(None);
        };
        citation.apply_edit(edit);
        self.save(citation.clone())?;
        Ok(Some(citation))
    }
}

fn upsert(citations: &mut Vec<Citation>, citation: Citation) {
    match citations.iter_mut().find(|c| c.id == citation.id) {
        Some(existing) => *existing = citation,
        None => citations.push(citation),
    }
}

fn remove(citations: &mut Vec<Citation>, id: &str) -> bool {
    let before = citations.len();
    citations.retain(|c| c.id != id);
    citations.len() != before
}

/// A repository held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    citations: Vec<Citation>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CitationRepository for MemoryRepository {
    fn list(&self) -> StoreResult<Vec<Citation>> {
        Ok(self.citations.clone())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Citation>> {
        Ok(self.citations.iter().find(|c| c.id == id).cloned())
    }

    fn save(&mut self, citation: Citation) -> StoreResult<()> {
        upsert(&mut self.citations, citation);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.citations, id))
    }
}

/// A repository persisted as a camelCase JSON array in a single file.
///
/// Every operation reads the file; every mutation rewrites it. A missing
/// file reads as an empty repository.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<Vec<Citation>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, citations: &[Citation]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(citations)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), count = citations.len(), "wrote citation store");
        Ok(())
    }
}

impl CitationRepository for JsonFileRepository {
    fn list(&self) -> StoreResult<Vec<Citation>> {
        self.read()
    }

    fn get(&self, id: &str) -> StoreResult<Option<Citation>> {
        Ok(self.read()?.into_iter().find(|c| c.id == id))
    }

    fn save(&mut self, citation: Citation) -> StoreResult<()> {
        let mut citations = self.read()?;
        upsert(&mut citations, citation);
        self.write(&citations)
    }

    fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let mut citations = self.read()?;
        let removed = remove(&mut citations, id);
        if removed {
            self.write(&citations)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceType, StyleId};
    use pretty_assertions::assert_eq;

    fn citation(id: &str, text: &str) -> Citation {
        Citation {
            id: id.to_string(),
            citation: text.to_string(),
            style: StyleId::Apa,
            source_type: SourceType::Manual,
            source_url: None,
            file_id: None,
            title: Some("A Study".to_string()),
            authors: Some("Smith, John".to_string()),
            year: Some("2020".to_string()),
            source: None,
            additional_info: None,
        }
    }

    fn ids(repository: &impl CitationRepository) -> Vec<String> {
        repository
            .list()
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect()
    }

    fn exercise(repository: &mut impl CitationRepository) {
        repository.save(citation("a", "first")).unwrap();
        repository.save(citation("b", "second")).unwrap();
        repository.save(citation("a", "first, revised")).unwrap();
        assert_eq!(ids(&*repository), vec!["a", "b"]);
        assert_eq!(
            repository.get("a").unwrap().map(|c| c.citation),
            Some("first, revised".to_string())
        );

        assert!(repository.delete("a").unwrap());
        assert!(!repository.delete("a").unwrap());
        assert_eq!(ids(&*repository), vec!["b"]);
        assert_eq!(repository.get("a").unwrap(), None);
    }

    #[test]
    fn test_memory_repository() {
        exercise(&mut MemoryRepository::new());
    }

    #[test]
    fn test_json_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        let mut repository = JsonFileRepository::new(dir.path().join("citations.json"));
        exercise(&mut repository);

        let reopened = JsonFileRepository::new(repository.path());
        assert_eq!(ids(&reopened), vec!["b"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::new(dir.path().join("absent.json"));
        assert_eq!(repository.list().unwrap(), Vec::new());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("citations.json");
        fs::write(&path, "{not json").unwrap();
        let repository = JsonFileRepository::new(path);
        assert!(matches!(
            repository.list(),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_file_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("citations.json");
        let mut repository = JsonFileRepository::new(&path);
        let mut saved = citation("a", "text");
        saved.source_type = SourceType::Url;
        saved.source_url = Some("https://ex.com".to_string());
        repository.save(saved).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("\"sourceType\": \"url\""));
        assert!(contents.contains("\"sourceUrl\": \"https://ex.com\""));
        assert!(!contents.contains("fileId"));
    }

    #[test]
    fn test_edit_preserves_unedited_fields() {
        let mut repository = MemoryRepository::new();
        let original = citation("a", "Smith, J. (2020). A Study.");
        repository.save(original.clone()).unwrap();

        let edit = CitationEdit {
            title: Some("A Better Study".to_string()),
            ..CitationEdit::default()
        };
        let edited = repository.edit("a", edit).unwrap().unwrap();

        assert_eq!(
            edited,
            Citation {
                title: Some("A Better Study".to_string()),
                ..original
            }
        );
        assert_eq!(repository.get("a").unwrap(), Some(edited));
    }

    #[test]
    fn test_edit_missing_id() {
        let mut repository = MemoryRepository::new();
        assert_eq!(
            repository.edit("nope", CitationEdit::default()).unwrap(),
            None
        );
    }
}
