//! # Presentation arguments.
//!
//! [`PresentArgs`] bundles everything a caller can say about one present request:
//! stacking flags, a parent-slot hint for the view layer, a typed payload,
//! deep-link query/fragment data and a grouping tag.
//!
//! Args are built with `with_*` methods and are read-only afterwards; the
//! controller keeps a copy for its whole life (see
//! [`ControllerContext::args`](crate::ControllerContext::args)). Cloning is cheap.
//!
//! ## Example
//! ```
//! use viewvisor::{PresentArgs, PresentFlags};
//!
//! let args = PresentArgs::new()
//!     .with_flags(PresentFlags::MODAL_POPUP)
//!     .with_query("tab", "audio")
//!     .with_payload(42_u32);
//!
//! assert_eq!(args.query("tab"), Some("audio"));
//! assert_eq!(args.payload::<u32>(), Some(&42));
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::policies::PresentFlags;

/// Immutable bag of presentation parameters.
#[derive(Clone, Default)]
pub struct PresentArgs {
    flags: PresentFlags,
    parent_slot: Option<Arc<str>>,
    payload: Option<Arc<dyn Any + Send + Sync>>,
    query: Arc<BTreeMap<String, String>>,
    fragment: Option<Arc<str>>,
    tag: Option<Arc<str>>,
}

impl PresentArgs {
    /// Empty args (no flags, no payload).
    pub fn new() -> Self {
        Self::default()
    }

    /// Args carrying only stacking flags.
    pub fn flags_only(flags: PresentFlags) -> Self {
        Self::new().with_flags(flags)
    }

    /// Builds args from a deep link: query pairs and fragment are copied over.
    ///
    /// Repeated query keys keep the last value.
    pub fn from_url(url: &Url) -> Self {
        let query: BTreeMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self {
            query: Arc::new(query),
            fragment: url.fragment().filter(|f| !f.is_empty()).map(Arc::from),
            ..Self::default()
        }
    }

    /// Adds stacking flags (OR-ed with any already set).
    pub fn with_flags(mut self, flags: PresentFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Sets the parent-slot hint handed to the view factory.
    pub fn with_parent_slot(mut self, slot: impl Into<Arc<str>>) -> Self {
        self.parent_slot = Some(slot.into());
        self
    }

    /// Attaches a typed payload.
    pub fn with_payload<T: Any + Send + Sync>(mut self, payload: T) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }

    /// Adds one query pair.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.query).insert(key.into(), value.into());
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<Arc<str>>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Sets a user-defined grouping tag.
    pub fn with_tag(mut self, tag: impl Into<Arc<str>>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[inline]
    pub fn flags(&self) -> PresentFlags {
        self.flags
    }

    pub fn parent_slot(&self) -> Option<&str> {
        self.parent_slot.as_deref()
    }

    /// Returns the payload if it has type `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// All query pairs, sorted by key.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl fmt::Debug for PresentArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentArgs")
            .field("flags", &self.flags)
            .field("parent_slot", &self.parent_slot)
            .field("payload", &self.payload.is_some())
            .field("query", &self.query)
            .field("fragment", &self.fragment)
            .field("tag", &self.tag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_url_copies_query_and_fragment() {
        let url = Url::parse("app://ui/settings?tab=audio&volume=7&tab=video#advanced").unwrap();
        let args = PresentArgs::from_url(&url);
        assert_eq!(args.query("tab"), Some("video"));
        assert_eq!(args.query("volume"), Some("7"));
        assert_eq!(args.fragment(), Some("advanced"));
        assert!(args.flags().is_empty());
    }

    #[test]
    fn empty_fragment_is_none() {
        let url = Url::parse("app://ui/settings#").unwrap();
        assert_eq!(PresentArgs::from_url(&url).fragment(), None);
    }

    #[test]
    fn clones_share_query_until_modified() {
        let base = PresentArgs::new().with_query("a", "1");
        let extended = base.clone().with_query("b", "2");
        assert_eq!(base.query("b"), None);
        assert_eq!(extended.query("a"), Some("1"));
        assert_eq!(extended.query_pairs().count(), 2);
    }

    #[test]
    fn flags_accumulate() {
        let args = PresentArgs::flags_only(PresentFlags::MODAL).with_flags(PresentFlags::POPUP);
        assert_eq!(args.flags(), PresentFlags::MODAL_POPUP);
    }
}
