use crate::database::{FilmDb, UserDb};
use crate::error::Error;
use crate::model::{Film, User};
use crate::validate;
use log::{debug, info};

fn log_reject(err: Error) -> Error {
    debug!("{}", err);
    err
}

pub fn create_film<D: FilmDb>(db: &D, film: Film) -> Result<Film, Error> {
    validate::film(&film).map_err(log_reject)?;
    let film = db.add_film(film);
    info!("created film {}", film.id);
    Ok(film)
}

pub fn update_film<D: FilmDb>(db: &D, film: Film) -> Result<Film, Error> {
    validate::film(&film).map_err(log_reject)?;
    let film = db.update_film(film)?;
    info!("updated film {}", film.id);
    Ok(film)
}

pub fn film_by_id<D: FilmDb>(db: &D, id: u64) -> Result<Film, Error> {
    db.get_film(id).ok_or_else(|| Error::not_found("film", id))
}

pub fn delete_film<D: FilmDb>(db: &D, id: u64) -> Result<Vec<Film>, Error> {
    let remaining = db.delete_film(id)?;
    info!("deleted film {}", id);
    Ok(remaining)
}

pub fn set_like<D: FilmDb + UserDb>(
    db: &D,
    film_id: u64,
    user_id: u64,
    liked: bool,
) -> Result<Film, Error> {
    user_by_id(db, user_id)?;
    let film = db.with_film(film_id, |film| {
        if liked {
            film.add_like(user_id);
        } else {
            film.remove_like(user_id);
        }
        film.clone()
    })?;
    info!(
        "user {} {} film {}",
        user_id,
        if liked { "liked" } else { "unliked" },
        film_id
    );
    Ok(film)
}

/// The `count` most liked films, most liked first. The sort is stable, so
/// films with equal like counts stay in id order and the result is
/// deterministic for a fixed snapshot of like counts.
pub fn popular_films<D: FilmDb>(db: &D, count: usize) -> Result<Vec<Film>, Error> {
    if count == 0 {
        return Err(Error::validation("count must be positive"));
    }
    let mut films = db.get_films();
    films.sort_by_key(|film| std::cmp::Reverse(film.likes.len()));
    films.truncate(count);
    Ok(films)
}

pub fn create_user<D: UserDb>(db: &D, mut user: User) -> Result<User, Error> {
    validate::user(&user).map_err(log_reject)?;
    user.fill_name();
    let user = db.add_user(user);
    info!("created user {}", user.id);
    Ok(user)
}

pub fn update_user<D: UserDb>(db: &D, mut user: User) -> Result<User, Error> {
    validate::user(&user).map_err(log_reject)?;
    user.fill_name();
    let user = db.update_user(user)?;
    info!("updated user {}", user.id);
    Ok(user)
}

pub fn user_by_id<D: UserDb>(db: &D, id: u64) -> Result<User, Error> {
    db.get_user(id).ok_or_else(|| Error::not_found("user", id))
}

/// Friendship is symmetric: both users' sets change together, inside a single
/// store operation.
pub fn set_friendship<D: UserDb>(
    db: &D,
    user_id: u64,
    friend_id: u64,
    friends: bool,
) -> Result<(), Error> {
    if user_id == friend_id {
        return Err(Error::SelfReference(
            "a user cannot friend or unfriend themselves".to_owned(),
        ));
    }
    db.with_user_pair(user_id, friend_id, |user, friend| {
        if friends {
            user.add_friend(friend_id);
            friend.add_friend(user_id);
        } else {
            user.remove_friend(friend_id);
            friend.remove_friend(user_id);
        }
    })?;
    info!(
        "users {} and {} are {} friends",
        user_id,
        friend_id,
        if friends { "now" } else { "no longer" }
    );
    Ok(())
}

pub fn friends_of<D: UserDb>(db: &D, user_id: u64) -> Result<Vec<u64>, Error> {
    let user = user_by_id(db, user_id)?;
    Ok(user.friends.into_iter().collect())
}

pub fn mutual_friends<D: UserDb>(db: &D, user_id: u64, other_id: u64) -> Result<Vec<u64>, Error> {
    if user_id == other_id {
        return Err(Error::SelfReference(
            "mutual friends require two distinct users".to_owned(),
        ));
    }
    let user = user_by_id(db, user_id)?;
    let other = user_by_id(db, other_id)?;
    Ok(user.friends.intersection(&other.friends).copied().collect())
}
