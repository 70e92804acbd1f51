pub mod auth;
pub mod bids;
pub mod categories;
pub mod queries;
pub mod tenders;
pub mod vendors;

use actix_web::web;
use tracing::debug;

use crate::cache::ViewerCache;
use crate::clock::Clock;
use crate::engine::{Engine, Viewer};
use crate::error::EngineError;
use crate::models::users::CreateUserFromAuth;
use crate::store::TenderStore;

/// Shared engine handle as stored in app data.
pub type EngineData<S, C> = web::Data<Engine<S, C>>;

pub fn init_routes<S: TenderStore, C: Clock>(cfg: &mut web::ServiceConfig) {
    // ── Auth & vendor onboarding (require a valid JWT) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me::<S, C>)));
    cfg.service(
        web::resource("/vendors/register").route(web::post().to(vendors::register::<S, C>)),
    );

    // ── Tender routes (reads allow anonymous callers, writes are procurement only) ──
    cfg.service(
        web::scope("/tenders")
            .route("", web::get().to(tenders::list_tenders::<S, C>))
            .route("", web::post().to(tenders::create_tender::<S, C>))
            .route("/{id}", web::get().to(tenders::get_tender::<S, C>))
            .route("/{id}", web::put().to(tenders::update_tender::<S, C>))
            .route("/{id}", web::delete().to(tenders::delete_tender::<S, C>))
            .route("/{id}/submit", web::post().to(tenders::submit_tender::<S, C>))
            .route("/{id}/cancel", web::post().to(tenders::cancel_tender::<S, C>))
            .route("/{id}/reopen", web::post().to(tenders::reopen_tender::<S, C>))
            .route("/{id}/bid-floor", web::get().to(bids::bid_floor::<S, C>))
            .route("/{id}/bids", web::get().to(bids::get_tender_bids::<S, C>))
            .route("/{id}/bids", web::post().to(bids::create_bid::<S, C>))
            .route("/{id}/queries", web::get().to(queries::get_tender_queries::<S, C>))
            .route("/{id}/queries", web::post().to(queries::ask_query::<S, C>)),
    );

    // ── Bid routes (supplier's own bids) ──
    cfg.service(
        web::scope("/bids")
            .route("", web::get().to(bids::get_my_bids::<S, C>))
            .route("/{id}", web::get().to(bids::get_bid::<S, C>))
            .route("/{id}/submit", web::post().to(bids::submit_bid::<S, C>))
            .route("/{id}/cancel", web::post().to(bids::cancel_bid::<S, C>)),
    );

    cfg.service(
        web::resource("/queries/{id}").route(web::put().to(queries::answer_query::<S, C>)),
    );
    cfg.service(
        web::resource("/categories/{name}/item-groups")
            .route(web::get().to(categories::get_item_groups::<S, C>)),
    );
}

/// Turn a request identity into a [`Viewer`], going through the cache.
pub(crate) async fn viewer_for<S: TenderStore, C: Clock>(
    engine: &Engine<S, C>,
    cache: &ViewerCache,
    identity: Option<CreateUserFromAuth>,
) -> Result<Viewer, EngineError> {
    let Some(identity) = identity else {
        return Ok(Viewer::Anonymous);
    };

    if let Some(viewer) = cache.get(&identity.id).await {
        debug!(user_id = %identity.id, "viewer cache hit");
        return Ok(viewer);
    }

    let user_id = identity.id;
    let viewer = engine.resolve_viewer(identity).await?;
    cache.insert(user_id, viewer.clone()).await;
    Ok(viewer)
}
