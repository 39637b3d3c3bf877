use admin_block::{
    assign_vendor, export_csv, filter_bookings, update_booking_status, AssignError, BookingPager,
    DashboardStats, ExportError, InFlightGuard, StatusError,
};
use festiva_atoms as atoms;
use festiva_atoms::bookings::model::UpdateStatusPayload;
use festiva_atoms::bookings::service::StatusFilter;
use festiva_shared::{auth, AppState};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use serde::Deserialize;
use std::sync::Arc;

/// Most pages the export and stats routes will replay before cutting off.
const MAX_REPLAY_PAGES: usize = 100;

/// Activity entries returned by the dashboard feed.
const ACTIVITY_LIMIT: usize = 20;

#[derive(Deserialize)]
struct AssignRequest {
    vendor_id: String,
    category: String,
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body.to_string().into())
        .map_err(Box::new)?)
}

fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, serde_json::json!({ "error": message }))
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn preflight() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET,POST,OPTIONS")
        .header(
            "Access-Control-Allow-Headers",
            "Content-Type,X-User-Id,X-User-Role",
        )
        .body(Body::Empty)
        .map_err(Box::new)?)
}

/// Main Lambda handler - routes admin booking-management requests.
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
    guard: Arc<InFlightGuard>,
) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    tracing::info!("API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return preflight();
    }

    // Every route below is admin-only.
    let ctx = match auth::authenticate_request(&event) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = auth::require_admin(&ctx) {
        return Ok(resp);
    }

    let client = &state.dynamo_client;
    let table_name = state.table_name.as_str();
    let query = event.query_string_parameters();
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (&method, parts.as_slice()) {
        (&Method::GET, ["bookings"]) => {
            atoms::bookings::list_bookings(
                client,
                table_name,
                query.first("status"),
                query.first("cursor"),
            )
            .await
        }

        (&Method::GET, ["bookings", "export"]) => {
            handle_export(
                client,
                table_name,
                query.first("status"),
                query.first("q").unwrap_or(""),
            )
            .await
        }

        (&Method::POST, ["bookings", booking_id, "status"]) => {
            handle_status_update(client, table_name, &guard, booking_id, event.body()).await
        }

        (&Method::POST, ["bookings", booking_id, "assign"]) => {
            handle_assign(client, table_name, booking_id, event.body()).await
        }

        (&Method::GET, ["vendors"]) => match atoms::users::load_vendors(client, table_name).await {
            Ok(vendors) => json_response(StatusCode::OK, serde_json::json!(vendors)),
            Err(e) => {
                tracing::error!("Failed to list vendors: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load vendors.")
            }
        },

        (&Method::GET, ["vendors", vendor_id, "availability"]) => {
            let dates = atoms::users::get_unavailable_dates(client, table_name, vendor_id).await;
            json_response(StatusCode::OK, serde_json::json!({ "dates": dates }))
        }

        (&Method::GET, ["tasks"]) => atoms::tasks::list_tasks(client, table_name).await,

        (&Method::GET, ["reviews"]) => match atoms::reviews::load_reviews(client, table_name).await
        {
            Ok(reviews) => json_response(StatusCode::OK, serde_json::json!(reviews)),
            Err(e) => {
                tracing::error!("Failed to list reviews: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load reviews.")
            }
        },

        (&Method::GET, ["packages"]) => {
            match atoms::packages::load_packages(client, table_name).await {
                Ok(packages) => json_response(StatusCode::OK, serde_json::json!(packages)),
                Err(e) => {
                    tracing::error!("Failed to list packages: {}", e);
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load packages.")
                }
            }
        }

        (&Method::GET, ["activity"]) => {
            match atoms::activity::load_recent_activity(client, table_name, ACTIVITY_LIMIT).await {
                Ok(entries) => json_response(StatusCode::OK, serde_json::json!(entries)),
                Err(e) => {
                    tracing::error!("Failed to load activity log: {}", e);
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load activity.")
                }
            }
        }

        (&Method::GET, ["stats"]) => handle_stats(client, table_name).await,

        (
            _,
            ["bookings", ..] | ["vendors", ..] | ["tasks"] | ["reviews"] | ["packages"]
            | ["activity"] | ["stats"],
        ) => method_not_allowed(),

        _ => error_response(StatusCode::NOT_FOUND, "Not found"),
    }
}

fn parse_filter(status_param: Option<&str>) -> Result<StatusFilter, Response<Body>> {
    match status_param {
        None => Ok(StatusFilter::All),
        Some(s) => StatusFilter::parse(s).ok_or_else(|| {
            Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(
                    serde_json::json!({"error": format!("Unknown status filter: {}", s)})
                        .to_string()
                        .into(),
                )
                .unwrap_or_default()
        }),
    }
}

/// Replay the paginated query to completion for the given filter.
async fn load_all_pages(
    client: &aws_sdk_dynamodb::Client,
    table_name: &str,
    filter: StatusFilter,
) -> Result<BookingPager, String> {
    let mut pager = BookingPager::new(filter);
    pager.load_initial(client, table_name).await?;
    let mut pages = 1;
    while pager.has_more() && pages < MAX_REPLAY_PAGES {
        if !pager.load_more(client, table_name).await? {
            break;
        }
        pages += 1;
    }
    Ok(pager)
}

async fn handle_export(
    client: &aws_sdk_dynamodb::Client,
    table_name: &str,
    status_param: Option<&str>,
    search: &str,
) -> Result<Response<Body>, Error> {
    let filter = match parse_filter(status_param) {
        Ok(f) => f,
        Err(resp) => return Ok(resp),
    };

    let pager = match load_all_pages(client, table_name, filter).await {
        Ok(pager) => pager,
        Err(e) => {
            tracing::error!("Failed to load bookings for export: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load bookings.");
        }
    };

    let visible = filter_bookings(&pager.bookings, search);
    match export_csv(&visible) {
        Ok(export) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/csv")
            .header("Access-Control-Allow-Origin", "*")
            .header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", export.filename),
            )
            .body(export.content.into())
            .map_err(Box::new)?),
        Err(ExportError::NoData) => {
            error_response(StatusCode::BAD_REQUEST, "No data to export.")
        }
    }
}

async fn handle_stats(
    client: &aws_sdk_dynamodb::Client,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    let pager = match load_all_pages(client, table_name, StatusFilter::All).await {
        Ok(pager) => pager,
        Err(e) => {
            tracing::error!("Failed to load bookings for stats: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load stats.");
        }
    };
    let vendors = match atoms::users::load_vendors(client, table_name).await {
        Ok(vendors) => vendors,
        Err(e) => {
            tracing::error!("Failed to load vendors for stats: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load stats.");
        }
    };

    let stats = DashboardStats::compute(&pager.bookings, &vendors);
    json_response(StatusCode::OK, serde_json::json!(stats))
}

async fn handle_status_update(
    client: &aws_sdk_dynamodb::Client,
    table_name: &str,
    guard: &InFlightGuard,
    booking_id: &str,
    body: &Body,
) -> Result<Response<Body>, Error> {
    let payload: UpdateStatusPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &format!("Invalid body: {}", e)),
    };

    let booking = match atoms::bookings::get_booking(client, table_name, booking_id).await {
        Ok(b) => b,
        Err(_) => return error_response(StatusCode::NOT_FOUND, "Booking not found"),
    };

    match update_booking_status(client, table_name, guard, &booking, payload.status).await {
        Ok(()) => json_response(
            StatusCode::OK,
            serde_json::json!({
                "booking_id": booking.booking_id,
                "status": payload.status,
            }),
        ),
        Err(StatusError::UpdateInFlight) => error_response(
            StatusCode::CONFLICT,
            "An update for this booking is already in progress.",
        ),
        Err(StatusError::UpdateFailed(e)) => {
            tracing::error!("Status update for {} failed: {}", booking_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update status.")
        }
    }
}

async fn handle_assign(
    client: &aws_sdk_dynamodb::Client,
    table_name: &str,
    booking_id: &str,
    body: &Body,
) -> Result<Response<Body>, Error> {
    let payload: AssignRequest = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &format!("Invalid body: {}", e)),
    };

    let booking = match atoms::bookings::get_booking(client, table_name, booking_id).await {
        Ok(b) => b,
        Err(_) => return error_response(StatusCode::NOT_FOUND, "Booking not found"),
    };

    let (tasks, vendors) = tokio::join!(
        atoms::tasks::load_tasks(client, table_name),
        atoms::users::load_vendors(client, table_name),
    );
    let tasks = match tasks {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to load tasks for assignment: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load tasks.");
        }
    };
    let vendors = match vendors {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Failed to load vendors for assignment: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load vendors.");
        }
    };

    match assign_vendor(
        client,
        table_name,
        &tasks,
        &vendors,
        &booking,
        &payload.vendor_id,
        &payload.category,
    )
    .await
    {
        Ok(task) => json_response(StatusCode::CREATED, serde_json::json!(task)),
        Err(e @ AssignError::UnknownVendor) => {
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e @ AssignError::AlreadyAssigned(_)) => {
            error_response(StatusCode::CONFLICT, &e.to_string())
        }
        Err(e @ AssignError::VendorUnavailable { .. }) => {
            error_response(StatusCode::CONFLICT, &e.to_string())
        }
        Err(AssignError::WriteFailed(e)) => {
            tracing::error!("Assignment write for {} failed: {}", booking_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to assign vendor. Please try again.",
            )
        }
    }
}
