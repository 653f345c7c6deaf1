//! Saved-grid history behind a storage seam.
//!
//! Both implementations keep saved grids unique by id and only replace a
//! stored grid when the incoming one has a strictly newer `updated_at`.

use std::sync::Mutex;

use bitgrid::Grid;
use grid_db::{Database, DbError};

/// Storage for saved grids plus the single working-grid slot.
pub trait HistoryRepository {
    /// Saved grids, most recently updated first.
    fn list(&self) -> Result<Vec<Grid>, DbError>;

    fn get(&self, id: &str) -> Result<Option<Grid>, DbError>;

    /// Insert or replace. Returns `false` if a stored grid with the same id
    /// was as new or newer and was kept.
    fn save(&self, grid: &Grid) -> Result<bool, DbError>;

    /// Returns `false` if no grid had this id.
    fn delete(&self, id: &str) -> Result<bool, DbError>;

    fn load_current(&self) -> Result<Option<Grid>, DbError>;

    fn store_current(&self, grid: &Grid) -> Result<(), DbError>;
}

impl HistoryRepository for Database {
    fn list(&self) -> Result<Vec<Grid>, DbError> {
        self.get_all_grids()
    }

    fn get(&self, id: &str) -> Result<Option<Grid>, DbError> {
        self.get_grid(id)
    }

    fn save(&self, grid: &Grid) -> Result<bool, DbError> {
        self.upsert_grid(grid)
    }

    fn delete(&self, id: &str) -> Result<bool, DbError> {
        self.delete_grid(id)
    }

    fn load_current(&self) -> Result<Option<Grid>, DbError> {
        self.load_current_grid()
    }

    fn store_current(&self, grid: &Grid) -> Result<(), DbError> {
        self.save_current_grid(grid)
    }
}

/// Process-local history, used when nothing needs to outlive the session.
#[derive(Default)]
pub struct MemoryHistory {
    saved: Mutex<Vec<Grid>>,
    current: Mutex<Option<Grid>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryRepository for MemoryHistory {
    fn list(&self) -> Result<Vec<Grid>, DbError> {
        let saved = self.saved.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(saved.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Grid>, DbError> {
        let saved = self.saved.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(saved.iter().find(|g| g.id() == id).cloned())
    }

    fn save(&self, grid: &Grid) -> Result<bool, DbError> {
        let mut saved = self.saved.lock().map_err(|_| DbError::LockPoisoned)?;
        match saved.iter_mut().find(|g| g.id() == grid.id()) {
            Some(existing) if grid.updated_at() > existing.updated_at() => {
                *existing = grid.clone();
            }
            Some(_) => return Ok(false),
            None => saved.push(grid.clone()),
        }
        saved.sort_by(|a, b| {
            b.updated_at()
                .cmp(&a.updated_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool, DbError> {
        let mut saved = self.saved.lock().map_err(|_| DbError::LockPoisoned)?;
        let before = saved.len();
        saved.retain(|g| g.id() != id);
        Ok(saved.len() < before)
    }

    fn load_current(&self) -> Result<Option<Grid>, DbError> {
        let current = self.current.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(current.clone())
    }

    fn store_current(&self, grid: &Grid) -> Result<(), DbError> {
        let mut current = self.current.lock().map_err(|_| DbError::LockPoisoned)?;
        *current = Some(grid.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(name: &str) -> Grid {
        Grid::new(name, 8, 2).unwrap()
    }

    /// Both implementations must behave the same.
    fn check_history_contract(repo: &dyn HistoryRepository) {
        let a = grid("a");
        let b = grid("b");
        assert!(repo.save(&a).unwrap());
        assert!(repo.save(&b).unwrap());
        assert_eq!(repo.list().unwrap().len(), 2);

        // Same timestamp: kept.
        assert!(!repo.save(&a).unwrap());

        let mut newer = a.toggled(0).unwrap();
        newer.rename("a2");
        assert!(repo.save(&newer).unwrap());
        let list = repo.list().unwrap();
        assert_eq!(list.len(), 2);
        let stored = list.iter().find(|g| g.id() == a.id()).unwrap();
        assert_eq!(stored.name(), "a2");

        // Stale copy does not overwrite.
        assert!(!repo.save(&a).unwrap());
        assert_eq!(repo.get(a.id()).unwrap().unwrap().name(), "a2");

        assert!(repo.delete(b.id()).unwrap());
        assert!(!repo.delete(b.id()).unwrap());
        assert!(repo.get(b.id()).unwrap().is_none());

        assert!(repo.load_current().unwrap().is_none());
        repo.store_current(&newer).unwrap();
        assert_eq!(repo.load_current().unwrap().unwrap(), newer);
    }

    #[test]
    fn test_memory_history_contract() {
        check_history_contract(&MemoryHistory::new());
    }

    #[test]
    fn test_database_history_contract() {
        let db = Database::open_in_memory().unwrap();
        check_history_contract(&db);
    }

    #[test]
    fn test_memory_history_sorted_newest_first() {
        let repo = MemoryHistory::new();
        let first = grid("first");
        let second = grid("second");
        repo.save(&first).unwrap();
        repo.save(&second).unwrap();

        let mut touched = first.clone();
        while touched.updated_at() <= second.updated_at() {
            touched.touch();
        }
        repo.save(&touched).unwrap();

        let names: Vec<_> = repo.list().unwrap().iter().map(|g| g.name().to_string()).collect();
        assert_eq!(names, ["first", "second"]);
    }
}
