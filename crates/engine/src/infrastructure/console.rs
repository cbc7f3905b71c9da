//! Console adapters used by the binary: messages are printed to stdout and
//! delivered items are dropped on the "ground" next to the requester until
//! picked up.

use dashmap::DashMap;
use reforge_domain::{ActorId, ItemSnapshot};

use crate::infrastructure::ports::{DeliveryPort, NotifierPort};

pub struct ConsoleNotifier {
    speaker: String,
}

impl ConsoleNotifier {
    pub fn new(speaker: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
        }
    }
}

impl NotifierPort for ConsoleNotifier {
    fn notify(&self, actor: &ActorId, message: &str) {
        println!("[{} -> {}] {}", self.speaker, actor, message);
    }
}

#[derive(Default)]
pub struct ConsoleDelivery {
    ground: DashMap<ActorId, Vec<ItemSnapshot>>,
}

impl ConsoleDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the oldest item dropped for `actor`.
    pub fn pick_up(&self, actor: &ActorId) -> Option<ItemSnapshot> {
        let mut items = self.ground.get_mut(actor)?;
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    }
}

impl DeliveryPort for ConsoleDelivery {
    fn deliver(&self, actor: &ActorId, item: ItemSnapshot) {
        tracing::info!(actor = %actor, item = %item, "Item delivered");
        println!("* {} is placed at {}'s feet", item, actor);
        self.ground.entry(actor.clone()).or_default().push(item);
    }
}
