pub mod admin;
pub mod auth;
pub mod client;
pub mod contract;
pub mod health;
pub mod notification;
pub mod payment;
pub mod public;
pub mod unit;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user (requires auth)
///
/// /public/reservations                             booking intake (public)
/// /public/units/available                          bookable units (public)
///
/// /admin/reservations                              list (admin only)
/// /admin/reservations/{id}/confirm                 confirm (admin only)
///
/// /units                                           list, create (staff)
/// /units/{id}                                      get, update, delete
/// /units/{id}/timeline                             merged history
///
/// /clients                                         list, create (staff)
/// /clients/{id}                                    get, update, delete (admin)
/// /clients/{id}/activities                         audit trail
///
/// /contracts                                       list, create (staff)
/// /contracts/stats                                 totals
/// /contracts/{id}                                  get, update, delete
/// /contracts/{id}/finalize                         draft -> final
/// /contracts/{id}/sign                             final -> signed
///
/// /payments                                        list, create (staff)
/// /payments/{id}                                   update status, delete
///
/// /notifications                                   list, create (requires auth)
/// /notifications/unread-count                      unread count
/// /notifications/read-all                          mark all read
/// /notifications/{id}                              delete
/// /notifications/{id}/read                         mark read
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes.
        .nest("/auth", auth::router())
        // Booking widget, no authentication.
        .nest("/public", public::router())
        // Reservation review.
        .nest("/admin", admin::router())
        // Back-office resources.
        .nest("/units", unit::router())
        .nest("/clients", client::router())
        .nest("/contracts", contract::router())
        .nest("/payments", payment::router())
        // Per-caller inbox.
        .nest("/notifications", notification::router())
}
