use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

use super::events::ViewEvent;
use crate::client::SoilClient;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::settings::Settings;
use crate::view::MapView;

// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub client: SoilClient,
    pub view: Arc<Mutex<MapView>>,
    pub event_sender: broadcast::Sender<ViewEvent>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let client = SoilClient::new(settings.root_url.clone(), settings.sand_url.clone());
        let (event_sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            settings: Arc::new(settings),
            client,
            view: Arc::new(Mutex::new(MapView::new())),
            event_sender,
        }
    }

    /// Locks the map view, recovering from a poisoned lock.
    pub fn view(&self) -> MutexGuard<'_, MapView> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn publish(&self, event: ViewEvent) {
        // No subscribers is fine
        let _ = self.event_sender.send(event);
    }
}
