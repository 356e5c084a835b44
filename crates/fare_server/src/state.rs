use std::path::PathBuf;

use tokio::sync::RwLock;

use crate::store::UserStore;

pub struct AppState {
    pub store_path: PathBuf,
    pub store: RwLock<UserStore>,
}

impl AppState {
    pub fn new(store_path: PathBuf, store: UserStore) -> Self {
        Self {
            store_path,
            store: RwLock::new(store),
        }
    }
}
