use bkl::{LockError, LockGuard, LockProvider};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Lock provider keeping held paths in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryLocks {
    held: Rc<RefCell<HashSet<PathBuf>>>,
    releases: Rc<Cell<usize>>,
}

impl MemoryLocks {
    pub fn is_held(&self, path: &Path) -> bool {
        self.held.borrow().contains(path)
    }

    pub fn releases(&self) -> usize {
        self.releases.get()
    }
}

impl LockProvider for MemoryLocks {
    type Guard = MemoryGuard;

    fn acquire(&self, path: &Path) -> Result<MemoryGuard, LockError> {
        if !self.held.borrow_mut().insert(path.to_path_buf()) {
            return Err(LockError::Held {
                path: path.to_path_buf(),
            });
        }

        Ok(MemoryGuard {
            locks: self.clone(),
            path: path.to_path_buf(),
        })
    }
}

#[derive(Debug)]
pub struct MemoryGuard {
    locks: MemoryLocks,
    path: PathBuf,
}

impl LockGuard for MemoryGuard {
    fn release_without_commit(self) {
        self.locks.held.borrow_mut().remove(&self.path);
        self.locks.releases.set(self.locks.releases.get() + 1);
    }
}
