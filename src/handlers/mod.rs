pub mod auth;
pub mod bids;
pub mod jobs;
pub mod users;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── User routes ──
    cfg.service(web::resource("/users/{id}").route(web::get().to(users::get_user)));

    // ── Job routes (reads are visibility-narrowed, writes require JWT) ──
    cfg.service(
        web::scope("/jobs")
            .route("", web::get().to(jobs::list_jobs))
            .route("", web::post().to(jobs::create_job))
            .route("/{id}", web::get().to(jobs::get_job))
            .route("/{id}", web::put().to(jobs::update_job))
            .route("/{id}/status", web::put().to(jobs::transition_job))
            .route("/{id}/bids", web::get().to(bids::list_bids_for_job))
            .route("/{id}/bids", web::post().to(bids::create_bid)),
    );

    // ── Bid routes (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/bids")
            .route("/mine", web::get().to(bids::my_bids))
            .route("/{id}", web::get().to(bids::get_bid))
            .route("/{id}/status", web::put().to(bids::transition_bid)),
    );
}
