use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Workbook, WorkbookBackend, WorkbookError};

/// In-memory workbook for tests/dev.
///
/// `fail_writes` simulates a disk that rejects writes (full, read-only).
#[derive(Debug, Default)]
pub struct InMemoryWorkbook {
    inner: RwLock<Option<Workbook>>,
    fail_writes: AtomicBool,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(workbook: Workbook) -> Self {
        Self {
            inner: RwLock::new(Some(workbook)),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of what is currently persisted.
    pub fn snapshot(&self) -> Option<Workbook> {
        self.inner.read().ok()?.clone()
    }
}

impl WorkbookBackend for InMemoryWorkbook {
    fn read(&self) -> Result<Option<Workbook>, WorkbookError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| WorkbookError::Unavailable("lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn write(&self, workbook: &Workbook) -> Result<(), WorkbookError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WorkbookError::Unavailable("writes disabled".to_string()));
        }
        let mut guard = self
            .inner
            .write()
            .map_err(|_| WorkbookError::Unavailable("lock poisoned".to_string()))?;
        *guard = Some(workbook.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
