use crate::error::Error;
use crate::model::{Film, User};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub trait Entity: Clone {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

impl Entity for Film {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Entity for User {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

/// One entity table. Keyed by id so iteration (and therefore `all`) is in
/// ascending id order, which equals insertion order under sequential ids.
struct Table<T> {
    rows: BTreeMap<u64, T>,
    last_id: u64,
    kind: &'static str,
}

impl<T: Entity> Table<T> {
    fn new(kind: &'static str) -> Table<T> {
        Table {
            rows: BTreeMap::new(),
            last_id: 0,
            kind,
        }
    }

    fn insert(&mut self, mut row: T) -> T {
        self.last_id += 1;
        row.set_id(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    /// Ids outside the sequence handed out so far were never assigned, which
    /// is malformed input rather than a missing record.
    fn lookup(&mut self, id: u64) -> Result<&mut T, Error> {
        if id == 0 || id > self.last_id {
            return Err(Error::validation(format!(
                "{} id {} was never assigned",
                self.kind, id
            )));
        }
        match self.rows.get_mut(&id) {
            Some(row) => Ok(row),
            None => Err(Error::not_found(self.kind, id)),
        }
    }

    /// Relationship operations treat any absent id as missing, including ids
    /// the sequence never handed out; the never-assigned distinction only
    /// matters for full-record update and delete.
    fn find(&mut self, id: u64) -> Result<&mut T, Error> {
        match self.rows.get_mut(&id) {
            Some(row) => Ok(row),
            None => Err(Error::not_found(self.kind, id)),
        }
    }

    fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

pub trait FilmDb {
    fn add_film(&self, film: Film) -> Film;
    fn update_film(&self, film: Film) -> Result<Film, Error>;
    fn get_film(&self, id: u64) -> Option<Film>;
    fn get_films(&self) -> Vec<Film>;
    fn delete_film(&self, id: u64) -> Result<Vec<Film>, Error>;
    fn with_film<R, F>(&self, id: u64, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut Film) -> R;
}

pub trait UserDb {
    fn add_user(&self, user: User) -> User;
    fn update_user(&self, user: User) -> Result<User, Error>;
    fn get_user(&self, id: u64) -> Option<User>;
    fn get_users(&self) -> Vec<User>;
    fn with_user_pair<R, F>(&self, user_id: u64, friend_id: u64, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut User, &mut User) -> R;
}

/// In-memory store. Each table sits behind its own mutex; every trait method
/// is a single lock acquisition, so read-modify-write cycles through
/// `with_film`/`with_user_pair` cannot lose concurrent updates.
pub struct Database {
    films: Mutex<Table<Film>>,
    users: Mutex<Table<User>>,
}

impl Database {
    pub fn new() -> Database {
        Database {
            films: Mutex::new(Table::new("film")),
            users: Mutex::new(Table::new("user")),
        }
    }
}

impl FilmDb for Database {
    fn add_film(&self, mut film: Film) -> Film {
        film.likes.clear();
        self.films.lock().unwrap().insert(film)
    }

    // A full-record update replaces the scalar fields but keeps the stored
    // like set; likes only change through their own operations.
    fn update_film(&self, mut film: Film) -> Result<Film, Error> {
        let mut films = self.films.lock().unwrap();
        let stored = films.lookup(film.id)?;
        film.likes = stored.likes.clone();
        *stored = film.clone();
        Ok(film)
    }

    fn get_film(&self, id: u64) -> Option<Film> {
        self.films.lock().unwrap().get(id)
    }

    fn get_films(&self) -> Vec<Film> {
        self.films.lock().unwrap().all()
    }

    fn delete_film(&self, id: u64) -> Result<Vec<Film>, Error> {
        let mut films = self.films.lock().unwrap();
        films.lookup(id)?;
        films.rows.remove(&id);
        Ok(films.all())
    }

    fn with_film<R, F>(&self, id: u64, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut Film) -> R,
    {
        let mut films = self.films.lock().unwrap();
        Ok(f(films.find(id)?))
    }
}

impl UserDb for Database {
    fn add_user(&self, mut user: User) -> User {
        user.friends.clear();
        self.users.lock().unwrap().insert(user)
    }

    fn update_user(&self, mut user: User) -> Result<User, Error> {
        let mut users = self.users.lock().unwrap();
        let stored = users.lookup(user.id)?;
        user.friends = stored.friends.clone();
        *stored = user.clone();
        Ok(user)
    }

    fn get_user(&self, id: u64) -> Option<User> {
        self.users.lock().unwrap().get(id)
    }

    fn get_users(&self) -> Vec<User> {
        self.users.lock().unwrap().all()
    }

    fn with_user_pair<R, F>(&self, user_id: u64, friend_id: u64, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut User, &mut User) -> R,
    {
        if user_id == friend_id {
            return Err(Error::SelfReference(format!(
                "user {} cannot be paired with themselves",
                user_id
            )));
        }
        let mut users = self.users.lock().unwrap();
        let mut user = users.find(user_id)?.clone();
        let mut friend = users.find(friend_id)?.clone();
        let out = f(&mut user, &mut friend);
        users.rows.insert(user.id(), user);
        users.rows.insert(friend.id(), friend);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn film(name: &str) -> Film {
        Film {
            id: 0,
            name: name.to_owned(),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
            duration: 136,
            likes: BTreeSet::new(),
        }
    }

    fn user(login: &str) -> User {
        User {
            id: 0,
            email: format!("{}@example.com", login),
            login: login.to_owned(),
            name: login.to_owned(),
            birthday: NaiveDate::from_ymd_opt(1980, 6, 1).unwrap(),
            friends: BTreeSet::new(),
        }
    }

    #[test]
    fn ids_are_sequential_starting_at_one() {
        let db = Database::new();
        assert_eq!(db.add_film(film("a")).id, 1);
        assert_eq!(db.add_film(film("b")).id, 2);
        assert_eq!(db.add_user(user("a")).id, 1);
    }

    #[test]
    fn create_ignores_client_supplied_likes() {
        let db = Database::new();
        let mut f = film("a");
        f.likes.insert(7);
        assert!(db.add_film(f).likes.is_empty());
    }

    #[test]
    fn update_of_unassigned_id_is_rejected() {
        let db = Database::new();
        db.add_film(film("a"));
        let mut f = film("b");
        f.id = 99;
        assert!(matches!(db.update_film(f), Err(Error::Validation(_))));
        let mut f = film("b");
        f.id = 0;
        assert!(matches!(db.update_film(f), Err(Error::Validation(_))));
        assert_eq!(db.get_films().len(), 1);
    }

    #[test]
    fn update_of_deleted_film_is_not_found() {
        let db = Database::new();
        let stored = db.add_film(film("a"));
        db.add_film(film("b"));
        db.delete_film(stored.id).unwrap();
        assert!(matches!(db.update_film(stored), Err(Error::NotFound(_))));
    }

    #[test]
    fn update_replaces_fields_but_keeps_likes() {
        let db = Database::new();
        let stored = db.add_film(film("a"));
        db.with_film(stored.id, |f| f.add_like(42)).unwrap();

        let mut updated = film("a, director's cut");
        updated.id = stored.id;
        updated.likes.insert(7);
        let updated = db.update_film(updated).unwrap();

        assert_eq!(updated.name, "a, director's cut");
        assert_eq!(updated.likes, BTreeSet::from([42]));
    }

    #[test]
    fn delete_returns_remaining_films() {
        let db = Database::new();
        let first = db.add_film(film("a"));
        db.add_film(film("b"));
        let remaining = db.delete_film(first.id).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "b");
        assert!(matches!(db.delete_film(first.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn with_user_pair_mutates_both_under_one_call() {
        let db = Database::new();
        let a = db.add_user(user("a"));
        let b = db.add_user(user("b"));
        db.with_user_pair(a.id, b.id, |a, b| {
            a.add_friend(b.id);
            b.add_friend(a.id);
        })
        .unwrap();
        assert!(db.get_user(a.id).unwrap().friends.contains(&b.id));
        assert!(db.get_user(b.id).unwrap().friends.contains(&a.id));
    }

    #[test]
    fn with_user_pair_requires_both_users() {
        let db = Database::new();
        let a = db.add_user(user("a"));
        assert!(matches!(
            db.with_user_pair(a.id, 99, |_, _| ()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.with_user_pair(a.id, a.id, |_, _| ()),
            Err(Error::SelfReference(_))
        ));
    }
}
