// src/bindings.rs
//
// Event handlers attached to elements that yew does not own (the raw HTML
// of rendered markdown, injected banner fragments). Each element gets a
// stable key; rebinding a key always drops the old listeners first.

use gloo_events::EventListener;
use std::collections::HashMap;
use web_sys::Element;

pub const BIND_KEY_ATTR: &str = "data-bind-key";

pub struct HandlerRegistry<H = EventListener> {
    prefix: &'static str,
    next: u64,
    bound: HashMap<String, Vec<H>>,
}

impl<H> HandlerRegistry<H> {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: 0,
            bound: HashMap::new(),
        }
    }

    /// Attribute carrying this registry's keys on bound elements.
    pub fn key_attr(&self) -> String {
        format!("{}-{}", BIND_KEY_ATTR, self.prefix)
    }

    /// CSS selector for the element bound under `key`.
    pub fn selector(&self, key: &str) -> String {
        format!("[{}=\"{}\"]", self.key_attr(), key)
    }

    pub fn fresh_key(&mut self) -> String {
        self.next += 1;
        format!("{}-{}", self.prefix, self.next)
    }

    /// Unbind whatever `key` had, then bind `handlers`.
    pub fn rebind(&mut self, key: &str, handlers: Vec<H>) {
        self.unbind(key);
        self.bound.insert(key.to_string(), handlers);
    }

    pub fn unbind(&mut self, key: &str) -> bool {
        self.bound.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.bound.clear();
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl HandlerRegistry<EventListener> {
    /// Key of `element`, assigning one on first sight.
    pub fn key_for(&mut self, element: &Element) -> String {
        let attr = self.key_attr();
        if let Some(existing) = element.get_attribute(&attr) {
            return existing;
        }
        let key = self.fresh_key();
        if let Err(e) = element.set_attribute(&attr, &key) {
            log::warn!("Failed to tag element for binding: {:?}", e);
        }
        key
    }
}
