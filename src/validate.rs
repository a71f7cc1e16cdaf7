use crate::error::Error;
use crate::model::{Film, User};
use chrono::{NaiveDate, Utc};

/// Release date of the first film screening, the floor for `Film::release_date`.
fn first_screening() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).unwrap()
}

fn birthday_floor() -> NaiveDate {
    NaiveDate::from_ymd_opt(1910, 1, 1).unwrap()
}

pub fn film(film: &Film) -> Result<(), Error> {
    if film.name.trim().is_empty() {
        return Err(Error::validation("film name must not be blank"));
    }
    if film.description.chars().count() > 200 {
        return Err(Error::validation(
            "film description must not exceed 200 characters",
        ));
    }
    if film.release_date < first_screening() {
        return Err(Error::validation(
            "film release date must not precede 1895-12-28",
        ));
    }
    if film.duration <= 0 {
        return Err(Error::validation("film duration must be positive"));
    }
    Ok(())
}

pub fn user(user: &User) -> Result<(), Error> {
    if user.email.trim().is_empty() || !user.email.contains('@') {
        return Err(Error::validation("user email must contain '@'"));
    }
    if user.login.trim().is_empty() || user.login.contains(char::is_whitespace) {
        return Err(Error::validation(
            "user login must not be blank or contain whitespace",
        ));
    }
    let today = Utc::now().date_naive();
    if user.birthday > today {
        return Err(Error::validation("user birthday must not be in the future"));
    }
    if user.birthday < birthday_floor() {
        return Err(Error::validation(
            "user birthday must not precede 1910-01-01",
        ));
    }
    Ok(())
}
