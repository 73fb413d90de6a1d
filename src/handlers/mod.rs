use actix_web::web;

use crate::{auth::AuthMiddleware, graphql};

pub mod auth_handler;
pub mod catalog_handler;
pub mod error_book_handler;
pub mod exercise_handler;
pub mod health_handler;
pub mod progress_handler;
pub mod task_handler;
pub mod upload_handler;
pub mod user_handler;

pub use health_handler::{health_check, health_check_live, health_check_ready};

/// Register every route. `/api` requires a bearer token; the rest is public.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(health_check_live)
        .service(
            web::scope("/auth")
                .service(auth_handler::register)
                .service(auth_handler::login)
                .service(auth_handler::refresh),
        )
        .service(upload_handler::serve_upload)
        .service(
            web::resource("/graphql").route(web::post().to(graphql::handler::graphql)),
        )
        .service(
            web::resource("/graphiql").route(web::get().to(graphql::handler::graphiql)),
        )
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(auth_handler::logout)
                .service(user_handler::me)
                .service(user_handler::list_students)
                .service(user_handler::get_student)
                .service(user_handler::update_student)
                .service(user_handler::delete_student)
                .service(catalog_handler::list_subjects)
                .service(catalog_handler::create_subject)
                .service(catalog_handler::get_subject)
                .service(catalog_handler::update_subject)
                .service(catalog_handler::delete_subject)
                .service(catalog_handler::list_units)
                .service(catalog_handler::create_unit)
                .service(catalog_handler::get_unit)
                .service(catalog_handler::update_unit)
                .service(catalog_handler::delete_unit)
                .service(catalog_handler::list_courses)
                .service(catalog_handler::create_course)
                .service(catalog_handler::get_course)
                .service(catalog_handler::update_course)
                .service(catalog_handler::delete_course)
                .service(catalog_handler::study_course)
                .service(exercise_handler::list_exercises)
                .service(exercise_handler::create_exercise)
                .service(exercise_handler::get_exercise)
                .service(exercise_handler::update_exercise)
                .service(exercise_handler::delete_exercise)
                .service(exercise_handler::submit_answer)
                .service(progress_handler::list_progress)
                .service(progress_handler::get_unit_progress)
                .service(progress_handler::answer_history)
                .service(error_book_handler::list_error_book)
                .service(error_book_handler::mark_mastered)
                .service(error_book_handler::remove_entry)
                .service(task_handler::list_tasks)
                .service(task_handler::create_task)
                .service(task_handler::complete_task)
                .service(task_handler::delete_task)
                .service(upload_handler::upload),
        );
}
