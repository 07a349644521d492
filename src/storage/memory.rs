use super::{Result, StorageProvider};
use std::cell::RefCell;

/// In-process backend. Each instance is isolated, which keeps tests
/// independent of each other.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: &str) -> Self {
        Self {
            document: RefCell::new(Some(document.to_string())),
        }
    }
}

impl StorageProvider for MemoryStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.document.borrow().clone())
    }

    fn save(&self, document: &str) -> Result<()> {
        *self.document.borrow_mut() = Some(document.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.document.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());

        storage.save("{\"words\":{}}").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("{\"words\":{}}"));

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }
}
