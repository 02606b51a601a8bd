//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::{LoginRequest, LoginResponse};
use crate::gateway::handlers::{DeleteImagesRequest, HealthResponse, UploadedImages};
use crate::images::{DeleteOutcome, DeleteReport, DeleteStatus};
use crate::models::{
    Favorite, FavoriteRequest, FuelType, NewUser, Publication, PublicationInput, Transmission,
    UserContact, UserPatch, UserProfile, Vehicle, VehicleDraft, VehiclePatch,
};

/// JWT bearer security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token from POST /api/v1/login: `Authorization: Bearer <token>`",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Autoplaza Vehicle Marketplace API",
        version = "1.0.0",
        description = "Listings, sellers, publications and favorites for a second-hand vehicle marketplace.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::auth::login,
        crate::gateway::handlers::vehicles::search_vehicles,
        crate::gateway::handlers::vehicles::get_vehicle,
        crate::gateway::handlers::vehicles::create_vehicle,
        crate::gateway::handlers::vehicles::update_vehicle,
        crate::gateway::handlers::vehicles::delete_vehicle,
        crate::gateway::handlers::users::create_user,
        crate::gateway::handlers::users::get_user_contact,
        crate::gateway::handlers::users::get_user_profile,
        crate::gateway::handlers::users::update_user,
        crate::gateway::handlers::users::delete_user,
        crate::gateway::handlers::publications::list_publications,
        crate::gateway::handlers::publications::get_publication,
        crate::gateway::handlers::publications::create_publication,
        crate::gateway::handlers::publications::update_publication,
        crate::gateway::handlers::publications::delete_publication,
        crate::gateway::handlers::favorites::list_favorites,
        crate::gateway::handlers::favorites::add_favorite,
        crate::gateway::handlers::favorites::remove_favorite,
        crate::gateway::handlers::images::upload_images,
        crate::gateway::handlers::images::delete_images,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            Vehicle,
            VehicleDraft,
            VehiclePatch,
            FuelType,
            Transmission,
            NewUser,
            UserPatch,
            UserContact,
            UserProfile,
            Publication,
            PublicationInput,
            Favorite,
            FavoriteRequest,
            UploadedImages,
            DeleteImagesRequest,
            DeleteReport,
            DeleteOutcome,
            DeleteStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token issue"),
        (name = "Vehicles", description = "Vehicle listings and search"),
        (name = "Users", description = "Seller accounts"),
        (name = "Publications", description = "Vehicles offered for sale"),
        (name = "Favorites", description = "Bookmarked vehicles (auth required)"),
        (name = "Images", description = "Vehicle photos (auth required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
