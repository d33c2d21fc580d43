use crate::errors::EntryError;
use crate::models::{
    Activity, Employee, JournalEntry, LibraryHabit, MicroHabit, MoodImage, MoodLogEntry,
};

pub trait Record: Clone + Send + Sync {
    fn id(&self) -> &str;
}

/// Collection interface the workflows are written against.
pub trait Repository<T: Record>: Send + Sync {
    fn list(&self) -> Vec<T>;
    fn get(&self, id: &str) -> Option<T>;
    fn add(&mut self, item: T);
    fn update(&mut self, item: T) -> Result<(), EntryError>;
    fn remove(&mut self, id: &str) -> Result<T, EntryError>;

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    /// Newest record first.
    Front,
    Back,
}

#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    items: Vec<T>,
    insert_at: InsertAt,
}

impl<T: Record> MemoryRepository<T> {
    pub fn newest_first() -> Self {
        Self::with_items(Vec::new(), InsertAt::Front)
    }

    pub fn with_items(items: Vec<T>, insert_at: InsertAt) -> Self {
        Self { items, insert_at }
    }
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn list(&self) -> Vec<T> {
        self.items.clone()
    }

    fn get(&self, id: &str) -> Option<T> {
        self.items.iter().find(|item| item.id() == id).cloned()
    }

    fn add(&mut self, item: T) {
        match self.insert_at {
            InsertAt::Front => self.items.insert(0, item),
            InsertAt::Back => self.items.push(item),
        }
    }

    fn update(&mut self, item: T) -> Result<(), EntryError> {
        let slot = self
            .items
            .iter_mut()
            .find(|existing| existing.id() == item.id())
            .ok_or_else(|| EntryError::NotFound(item.id().to_string()))?;
        *slot = item;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<T, EntryError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

macro_rules! record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

record!(
    MoodLogEntry,
    JournalEntry,
    MicroHabit,
    Employee,
    LibraryHabit,
    MoodImage,
    Activity,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;

    fn habit(id: &str) -> LibraryHabit {
        LibraryHabit {
            id: id.into(),
            title: format!("Habit {id}"),
            description: "Take a short walk outside".into(),
            mood: Mood::Calm,
        }
    }

    fn ids(repo: &MemoryRepository<LibraryHabit>) -> Vec<String> {
        repo.list().into_iter().map(|h| h.id).collect()
    }

    #[test]
    fn newest_first_prepends() {
        let mut repo = MemoryRepository::newest_first();
        repo.add(habit("1"));
        repo.add(habit("2"));
        assert_eq!(ids(&repo), ["2", "1"]);
    }

    #[test]
    fn back_insertion_keeps_insertion_order() {
        let mut repo = MemoryRepository::with_items(Vec::new(), InsertAt::Back);
        repo.add(habit("1"));
        repo.add(habit("2"));
        assert_eq!(ids(&repo), ["1", "2"]);
    }

    #[test]
    fn update_and_remove_unknown_ids_fail() {
        let mut repo = MemoryRepository::with_items(vec![habit("1")], InsertAt::Back);

        let mut changed = habit("1");
        changed.title = "Renamed".into();
        repo.update(changed).unwrap();
        assert_eq!(repo.get("1").unwrap().title, "Renamed");

        assert_eq!(
            repo.update(habit("9")),
            Err(EntryError::NotFound("9".into()))
        );
        assert_eq!(repo.remove("9"), Err(EntryError::NotFound("9".into())));
        assert_eq!(repo.remove("1").unwrap().id, "1");
        assert!(repo.is_empty());
    }
}
