pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            // Raise the raw-payload limit above the avatar cap so the
            // handler's own size check decides, with one byte of headroom
            // for the just-over-the-cap case.
            .app_data(web::PayloadConfig::new(users::MAX_AVATAR_BYTES + 1))
            .service(users::register)
            .service(users::login)
            .service(users::logout)
            .service(users::logout_all)
            .service(users::me)
            .service(users::update_me)
            .service(users::delete_me)
            .service(users::set_avatar)
            .service(users::delete_avatar)
            .service(users::get_avatar),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
