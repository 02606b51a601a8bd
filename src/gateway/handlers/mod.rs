//! HTTP handlers, one module per resource

pub mod auth;
pub mod favorites;
pub mod health;
pub mod images;
pub mod publications;
pub mod users;
pub mod vehicles;

pub use auth::login;
pub use favorites::{add_favorite, list_favorites, remove_favorite};
pub use health::{HealthResponse, health_check};
pub use images::{DeleteImagesRequest, UploadedImages, delete_images, upload_images};
pub use publications::{
    create_publication, delete_publication, get_publication, list_publications,
    update_publication,
};
pub use users::{create_user, delete_user, get_user_contact, get_user_profile, update_user};
pub use vehicles::{create_vehicle, delete_vehicle, get_vehicle, search_vehicles, update_vehicle};
