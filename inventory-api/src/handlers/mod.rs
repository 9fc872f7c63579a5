pub mod auth;
pub mod health;
pub mod items;
pub mod stores;
pub mod tags;
pub mod users;

pub use auth::{login, logout, refresh_token, register};
pub use health::{health_check, readiness_check};
pub use items::{create_item, delete_item, get_item, list_items, update_item};
pub use stores::{create_store, delete_store, get_store, list_stores};
pub use tags::{
    create_tag_in_store, delete_tag, get_tag, link_tag_to_item, list_tags_in_store,
    unlink_tag_from_item,
};
pub use users::{delete_user, get_user};
