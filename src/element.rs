//! Value and key contracts for the bulk purges.
//!
//! The cache itself is generic over any `K: Hash + Eq` and any `V`. The
//! bulk deletions need a little more from what is stored:
//!
//! - [`ElementValue`]: rendered elements report the template and class they
//!   were produced from, plus optional publish [`CacheDirectives`].
//! - [`UriKey`]: keys of the resolved-URI cache expose their URI string.
//!
//! [`ElementKey`] and [`UriRef`] are the two key shapes used by the page
//! element cache and the resolved-URI cache.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::borrow::Borrow;
use core::fmt;

/// Publish-time caching directives attached to a rendered element.
pub trait CacheDirectives {
    /// Returns `true` if the element must be renewed after a publish.
    fn should_renew(&self) -> bool;
}

/// A value stored in the element cache.
pub trait ElementValue {
    /// Directive type carried by the element.
    type Directives: CacheDirectives + ?Sized;

    /// Name of the template that rendered this element.
    fn template_name(&self) -> &str;

    /// Name of the class the element was rendered for.
    fn class_name(&self) -> &str;

    /// Caching directives, if the element has any.
    fn cache_directives(&self) -> Option<&Self::Directives>;

    /// Whether a publish invalidates this element.
    ///
    /// An element without directives is always renewed.
    fn renew_on_publish(&self) -> bool {
        self.cache_directives()
            .map_or(true, |directives| directives.should_renew())
    }
}

/// A key of the resolved-URI cache.
pub trait UriKey {
    /// The URI this key stands for.
    fn uri(&self) -> &str;
}

/// Plain directives: a single renew-after-publish flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenewDirectives {
    /// Renew the element when content is published.
    pub renew_after_publish: bool,
}

impl RenewDirectives {
    /// Directives that always renew on publish.
    pub const RENEW: RenewDirectives = RenewDirectives {
        renew_after_publish: true,
    };

    /// Directives that keep the element across publishes.
    pub const KEEP: RenewDirectives = RenewDirectives {
        renew_after_publish: false,
    };
}

impl CacheDirectives for RenewDirectives {
    fn should_renew(&self) -> bool {
        self.renew_after_publish
    }
}

impl<D: CacheDirectives + ?Sized> CacheDirectives for Box<D> {
    fn should_renew(&self) -> bool {
        (**self).should_renew()
    }
}

impl<D: CacheDirectives + ?Sized> CacheDirectives for Arc<D> {
    fn should_renew(&self) -> bool {
        (**self).should_renew()
    }
}

impl<T: ElementValue + ?Sized> ElementValue for Arc<T> {
    type Directives = T::Directives;

    fn template_name(&self) -> &str {
        (**self).template_name()
    }

    fn class_name(&self) -> &str {
        (**self).class_name()
    }

    fn cache_directives(&self) -> Option<&Self::Directives> {
        (**self).cache_directives()
    }

    fn renew_on_publish(&self) -> bool {
        (**self).renew_on_publish()
    }
}

impl<T: ElementValue + ?Sized> ElementValue for Box<T> {
    type Directives = T::Directives;

    fn template_name(&self) -> &str {
        (**self).template_name()
    }

    fn class_name(&self) -> &str {
        (**self).class_name()
    }

    fn cache_directives(&self) -> Option<&Self::Directives> {
        (**self).cache_directives()
    }

    fn renew_on_publish(&self) -> bool {
        (**self).renew_on_publish()
    }
}

/// Composite key of the page element cache.
///
/// Identifies one rendered element by the template and class it was built
/// from plus an element-specific qualifier (e.g. the content id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey {
    template: String,
    class_name: String,
    qualifier: String,
}

impl ElementKey {
    /// Creates a descriptor.
    pub fn new(
        template: impl Into<String>,
        class_name: impl Into<String>,
        qualifier: impl Into<String>,
    ) -> Self {
        ElementKey {
            template: template.into(),
            class_name: class_name.into(),
            qualifier: qualifier.into(),
        }
    }

    /// Template identifier.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Class identifier.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Element-specific qualifier.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.template, self.class_name, self.qualifier)
    }
}

/// A URI string used as a cache key.
///
/// Hashes like the underlying string, so lookups can be made with a plain
/// `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UriRef(String);

impl UriRef {
    /// Wraps a URI.
    pub fn new(uri: impl Into<String>) -> Self {
        UriRef(uri.into())
    }

    /// The URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwraps the URI.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for UriRef {
    fn from(uri: String) -> Self {
        UriRef(uri)
    }
}

impl From<&str> for UriRef {
    fn from(uri: &str) -> Self {
        UriRef(String::from(uri))
    }
}

impl Borrow<str> for UriRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl UriKey for UriRef {
    fn uri(&self) -> &str {
        &self.0
    }
}

impl UriKey for String {
    fn uri(&self) -> &str {
        self
    }
}

impl UriKey for &str {
    fn uri(&self) -> &str {
        self
    }
}
