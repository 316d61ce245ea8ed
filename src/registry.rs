//! Process-wide registries for custom host-kind serializers and custom tag
//! decoders (spec.md §6, §9).
//!
//! These are declared in the source as extension points but left as
//! no-ops there; spec.md explicitly permits a conforming implementation to
//! keep them as functional bookkeeping without wiring them into the hot
//! encode/decode path (§9, "Process-wide registries"). Registration
//! mutates; the codec's hot path never consults these maps.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

/// A host-kind identifier, as named in an error when no serializer or
/// decoder is found for it.
pub type HostKind = String;

/// A registered conversion callback. Boxed so callers can register
/// closures as well as free functions.
pub type SerializerFn = Box<dyn Fn() + Send + Sync>;
pub type DecoderFn = Box<dyn Fn() + Send + Sync>;

static SERIALIZERS: Lazy<RwLock<HashMap<HostKind, SerializerFn>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static DECODERS: Lazy<RwLock<HashMap<u32, DecoderFn>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a conversion callback for a host-kind identifier, replacing
/// any existing entry.
pub fn register_serializer(kind: impl Into<HostKind>, callback: SerializerFn) {
    let mut serializers = SERIALIZERS.write().expect("serializer registry poisoned");
    serializers.insert(kind.into(), callback);
}

/// Remove a previously registered serializer, if any.
pub fn unregister_serializer(kind: &str) {
    let mut serializers = SERIALIZERS.write().expect("serializer registry poisoned");
    serializers.remove(kind);
}

/// Register a conversion callback for a 32-bit tag, replacing any existing
/// entry.
pub fn register_decoder(tag: u32, callback: DecoderFn) {
    let mut decoders = DECODERS.write().expect("decoder registry poisoned");
    decoders.insert(tag, callback);
}

/// Remove a previously registered decoder, if any.
pub fn unregister_decoder(tag: u32) {
    let mut decoders = DECODERS.write().expect("decoder registry poisoned");
    decoders.remove(&tag);
}

/// Whether a serializer is currently registered for `kind`. Exposed mainly
/// for tests; the hot path does not consult this.
pub fn has_serializer(kind: &str) -> bool {
    SERIALIZERS
        .read()
        .expect("serializer registry poisoned")
        .contains_key(kind)
}

/// Whether a decoder is currently registered for `tag`.
pub fn has_decoder(tag: u32) -> bool {
    DECODERS.read().expect("decoder registry poisoned").contains_key(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn register_and_unregister_serializer_round_trips() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        register_serializer("test-kind-ser", Box::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(has_serializer("test-kind-ser"));
        unregister_serializer("test-kind-ser");
        assert!(!has_serializer("test-kind-ser"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn register_and_unregister_decoder_round_trips() {
        register_decoder(1234, Box::new(|| {}));
        assert!(has_decoder(1234));
        unregister_decoder(1234);
        assert!(!has_decoder(1234));
    }
}
