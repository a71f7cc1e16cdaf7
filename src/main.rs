mod database;
mod error;
mod model;
mod service;
mod validate;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use database::{Database, FilmDb, UserDb};
use error::Error;
use model::{Film, User};
use serde::Deserialize;

type Db = web::Data<Database>;

async fn get_films(db: Db) -> HttpResponse {
    HttpResponse::Ok().json(db.get_films())
}

async fn get_film(path: web::Path<u64>, db: Db) -> Result<HttpResponse, Error> {
    let film = service::film_by_id(db.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(film))
}

async fn create_film(film: web::Json<Film>, db: Db) -> Result<HttpResponse, Error> {
    let film = service::create_film(db.get_ref(), film.into_inner())?;
    Ok(HttpResponse::Ok().json(film))
}

async fn update_film(film: web::Json<Film>, db: Db) -> Result<HttpResponse, Error> {
    let film = service::update_film(db.get_ref(), film.into_inner())?;
    Ok(HttpResponse::Ok().json(film))
}

async fn delete_film(path: web::Path<u64>, db: Db) -> Result<HttpResponse, Error> {
    let remaining = service::delete_film(db.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(remaining))
}

async fn add_like(path: web::Path<(u64, u64)>, db: Db) -> Result<HttpResponse, Error> {
    let (film_id, user_id) = path.into_inner();
    let film = service::set_like(db.get_ref(), film_id, user_id, true)?;
    Ok(HttpResponse::Ok().json(film))
}

async fn remove_like(path: web::Path<(u64, u64)>, db: Db) -> Result<HttpResponse, Error> {
    let (film_id, user_id) = path.into_inner();
    let film = service::set_like(db.get_ref(), film_id, user_id, false)?;
    Ok(HttpResponse::Ok().json(film))
}

#[derive(Deserialize)]
struct PopularQuery {
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    10
}

async fn popular_films(query: web::Query<PopularQuery>, db: Db) -> Result<HttpResponse, Error> {
    let films = service::popular_films(db.get_ref(), query.count)?;
    Ok(HttpResponse::Ok().json(films))
}

async fn get_users(db: Db) -> HttpResponse {
    HttpResponse::Ok().json(db.get_users())
}

async fn get_user(path: web::Path<u64>, db: Db) -> Result<HttpResponse, Error> {
    let user = service::user_by_id(db.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(user))
}

async fn create_user(user: web::Json<User>, db: Db) -> Result<HttpResponse, Error> {
    let user = service::create_user(db.get_ref(), user.into_inner())?;
    Ok(HttpResponse::Ok().json(user))
}

async fn update_user(user: web::Json<User>, db: Db) -> Result<HttpResponse, Error> {
    let user = service::update_user(db.get_ref(), user.into_inner())?;
    Ok(HttpResponse::Ok().json(user))
}

async fn add_friend(path: web::Path<(u64, u64)>, db: Db) -> Result<HttpResponse, Error> {
    let (user_id, friend_id) = path.into_inner();
    service::set_friendship(db.get_ref(), user_id, friend_id, true)?;
    Ok(HttpResponse::Ok().finish())
}

async fn remove_friend(path: web::Path<(u64, u64)>, db: Db) -> Result<HttpResponse, Error> {
    let (user_id, friend_id) = path.into_inner();
    service::set_friendship(db.get_ref(), user_id, friend_id, false)?;
    Ok(HttpResponse::Ok().finish())
}

async fn get_friends(path: web::Path<u64>, db: Db) -> Result<HttpResponse, Error> {
    let friends = service::friends_of(db.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(friends))
}

async fn mutual_friends(path: web::Path<(u64, u64)>, db: Db) -> Result<HttpResponse, Error> {
    let (user_id, other_id) = path.into_inner();
    let friends = service::mutual_friends(db.get_ref(), user_id, other_id)?;
    Ok(HttpResponse::Ok().json(friends))
}

// "/films/popular" and ".../friends/common/..." are registered before the
// routes with an id segment in the same position, so the literal wins.
fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        Error::validation(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        Error::validation(err.to_string()).into()
    }))
    .route("/films", web::get().to(get_films))
    .route("/films", web::post().to(create_film))
    .route("/films", web::put().to(update_film))
    .route("/films/popular", web::get().to(popular_films))
    .route("/films/{id}", web::get().to(get_film))
    .route("/films/{id}", web::delete().to(delete_film))
    .route("/films/{id}/like/{user_id}", web::put().to(add_like))
    .route("/films/{id}/like/{user_id}", web::delete().to(remove_like))
    .route("/users", web::get().to(get_users))
    .route("/users", web::post().to(create_user))
    .route("/users", web::put().to(update_user))
    .route("/users/{id}", web::get().to(get_user))
    .route("/users/{id}/friends", web::get().to(get_friends))
    .route(
        "/users/{id}/friends/common/{other_id}",
        web::get().to(mutual_friends),
    )
    .route("/users/{id}/friends/{friend_id}", web::put().to(add_friend))
    .route(
        "/users/{id}/friends/{friend_id}",
        web::delete().to(remove_friend),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    std::env::set_var("RUST_LOG", "filmster=debug,actix_web=info");
    std::env::set_var("RUST_BACKTRACE", "1");
    env_logger::init();

    let db = web::Data::new(Database::new());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .configure(routes)
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
