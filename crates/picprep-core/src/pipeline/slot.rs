//! Destinations that receive finished images on the owning thread.

use std::cell::RefCell;
use std::rc::Rc;

use super::request::{ContentSource, RequestId, TargetToken, TransformError};
use crate::decode::RasterImage;

/// Applies finished images to a destination (an image view, a cache entry).
///
/// Always called on the thread that owns the pipeline.
pub trait Binder {
    /// Show a finished image.
    fn bind(&mut self, image: RasterImage, source: ContentSource);

    /// A request for the content this destination still shows failed.
    /// Called at most once per request.
    fn transform_failed(&mut self, error: &TransformError) {
        let _ = error;
    }
}

/// Shared handle to a slot. `Rc` keeps every slot on the owning thread.
pub type SlotHandle<B> = Rc<RefCell<Slot<B>>>;

/// A destination together with the content it is currently expected to show.
#[derive(Debug)]
pub struct Slot<B> {
    binder: B,
    token: Option<TargetToken>,
    last_bound: Option<RequestId>,
}

impl<B: Binder> Slot<B> {
    /// A slot not yet showing any content. Every result for it is stale.
    pub fn new(binder: B) -> Self {
        Self {
            binder,
            token: None,
            last_bound: None,
        }
    }

    /// A slot expecting the content identified by `token`.
    pub fn bound_to(binder: B, token: impl Into<TargetToken>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(binder)
        }
    }

    pub fn into_handle(self) -> SlotHandle<B> {
        Rc::new(RefCell::new(self))
    }

    /// Point the slot at different content. In-flight results for the old
    /// content become stale.
    pub fn rebind(&mut self, token: impl Into<TargetToken>) {
        self.token = Some(token.into());
    }

    /// Detach the slot from any content.
    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&TargetToken> {
        self.token.as_ref()
    }

    /// Most recent request whose result was bound here.
    pub fn last_bound(&self) -> Option<RequestId> {
        self.last_bound
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }

    /// True while the slot still expects `token`.
    pub(crate) fn is_live(&self, token: &TargetToken) -> bool {
        self.token.as_ref() == Some(token)
    }

    /// True if a result of request `id` for `token` may be bound: the token
    /// is live and no newer request has been bound already.
    pub(crate) fn accepts(&self, id: RequestId, token: &TargetToken) -> bool {
        self.is_live(token) && self.last_bound.is_none_or(|last| id > last)
    }

    pub(crate) fn bind(&mut self, id: RequestId, image: RasterImage, source: ContentSource) {
        self.last_bound = Some(id);
        self.binder.bind(image, source);
    }

    pub(crate) fn fail(&mut self, error: &TransformError) {
        self.binder.transform_failed(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        binds: usize,
        failures: usize,
    }

    impl Binder for Counter {
        fn bind(&mut self, _image: RasterImage, _source: ContentSource) {
            self.binds += 1;
        }

        fn transform_failed(&mut self, _error: &TransformError) {
            self.failures += 1;
        }
    }

    struct Silent;

    impl Binder for Silent {
        fn bind(&mut self, _image: RasterImage, _source: ContentSource) {}
    }

    fn token(s: &str) -> TargetToken {
        TargetToken::from(s)
    }

    #[test]
    fn test_new_slot_accepts_nothing() {
        let slot = Slot::new(Counter::default());
        assert!(slot.token().is_none());
        assert!(!slot.accepts(RequestId(0), &token("a")));
    }

    #[test]
    fn test_accepts_live_token() {
        let slot = Slot::bound_to(Counter::default(), "a");
        assert!(slot.accepts(RequestId(0), &token("a")));
        assert!(!slot.accepts(RequestId(0), &token("b")));
    }

    #[test]
    fn test_rejects_older_than_last_bound() {
        let mut slot = Slot::bound_to(Counter::default(), "a");
        let img = RasterImage::filled(1, 1, 0).unwrap();
        slot.bind(RequestId(5), img, ContentSource::Network);

        assert_eq!(slot.last_bound(), Some(RequestId(5)));
        assert_eq!(slot.binder().binds, 1);
        assert!(!slot.accepts(RequestId(4), &token("a")));
        assert!(!slot.accepts(RequestId(5), &token("a")));
        assert!(slot.accepts(RequestId(6), &token("a")));
    }

    #[test]
    fn test_rebind_and_clear() {
        let mut slot = Slot::bound_to(Counter::default(), "a");
        slot.rebind("b");
        assert!(!slot.is_live(&token("a")));
        assert!(slot.is_live(&token("b")));

        slot.clear();
        assert!(!slot.is_live(&token("b")));
    }

    #[test]
    fn test_fail_reaches_binder() {
        let mut slot = Slot::bound_to(Counter::default(), "a");
        slot.fail(&TransformError::InvalidRadius(0));
        assert_eq!(slot.binder().failures, 1);
    }

    #[test]
    fn test_default_failure_hook_is_noop() {
        let mut slot = Slot::bound_to(Silent, "a");
        slot.fail(&TransformError::InvalidRadius(0));
        assert!(slot.last_bound().is_none());
    }
}
