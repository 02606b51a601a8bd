//! Typed marketplace entities

pub mod favorite;
pub mod publication;
pub mod user;
pub mod vehicle;

pub use favorite::{Favorite, FavoriteRequest};
pub use publication::{Publication, PublicationInput, parse_publication_id};
pub use user::{
    CheckedUser, NewUser, UserChanges, UserContact, UserPatch, UserProfile, UserRecord,
};
pub use vehicle::{
    Bounds, FuelType, NumericInput, Transmission, Vehicle, VehicleChanges, VehicleDraft,
    VehicleLimits, VehiclePatch,
};
