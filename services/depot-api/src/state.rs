use smartdepot_depot::MissionCoordinator;

use crate::config::Config;

pub struct AppState {
    pub coordinator: MissionCoordinator,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            coordinator: MissionCoordinator::new(config.coordinator),
        }
    }
}
