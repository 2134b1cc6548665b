use crate::store::CounterStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CounterStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }
}
