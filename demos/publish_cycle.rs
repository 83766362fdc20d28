//! Publish Cycle Example
//!
//! Demonstrates the element and URI caches the way a content pipeline uses
//! them: renderer threads fill a shared element cache, then a publish event
//! purges what it invalidates and the resolved-URI cache drops a moved page.
//!
//! Run with: cargo run --example publish_cycle --features concurrent

extern crate element_cache;

use element_cache::config::{LruCacheConfig, UpdatePolicy};
use element_cache::element::{ElementKey, ElementValue, RenewDirectives, UriRef};
use element_cache::metrics::CacheMetrics;
use element_cache::ConcurrentLruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// A rendered page fragment.
#[derive(Debug, Clone)]
struct Fragment {
    template: String,
    class: String,
    html: String,
    directives: Option<RenewDirectives>,
}

impl ElementValue for Fragment {
    type Directives = RenewDirectives;

    fn template_name(&self) -> &str {
        &self.template
    }

    fn class_name(&self) -> &str {
        &self.class
    }

    fn cache_directives(&self) -> Option<&RenewDirectives> {
        self.directives.as_ref()
    }
}

const TEMPLATES: [&str; 3] = ["article", "teaser", "navigation"];
const CLASSES: [&str; 2] = ["news", "sport"];

fn render(template: &str, class: &str, id: usize) -> Fragment {
    // Teasers carry no directives
    let directives = match template {
        "navigation" => Some(RenewDirectives::KEEP),
        "article" => Some(RenewDirectives::RENEW),
        _ => None,
    };
    Fragment {
        template: template.to_string(),
        class: class.to_string(),
        html: format!("<div class=\"{}\">{} #{}</div>", class, template, id),
        directives,
    }
}

fn print_metrics(title: &str, cache: &impl CacheMetrics) {
    println!("\n{} ({})", title, cache.algorithm_name());
    for (name, value) in cache.metrics() {
        println!("  {:<14} {:>10.2}", name, value);
    }
}

fn main() {
    println!("Element Cache Publish Cycle");
    println!("===========================");

    let config = LruCacheConfig::new(NonZeroUsize::new(256).unwrap())
        .with_update_policy(UpdatePolicy::Promote);
    let elements: Arc<ConcurrentLruCache<ElementKey, Fragment>> =
        Arc::new(ConcurrentLruCache::init(config, None));

    // Renderer threads
    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let elements = Arc::clone(&elements);
            thread::spawn(move || {
                for i in 0..120 {
                    let template = TEMPLATES[i % TEMPLATES.len()];
                    let class = CLASSES[(i / 3) % CLASSES.len()];
                    let id = worker * 1000 + i;
                    let key = ElementKey::new(template, class, id.to_string());

                    if elements.get_with(&key, |f| f.html.len()).is_none() {
                        elements.put(key, render(template, class, id));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        if handle.join().is_err() {
            eprintln!("renderer thread panicked");
        }
    }
    println!(
        "\nRendered into {} / {} slots in {:?}",
        elements.len(),
        elements.cap(),
        start.elapsed()
    );

    // An editor changed the teaser template
    let teasers = elements.delete_by_template("teaser");
    println!("Template change purged {} teasers", teasers.len());

    // A publish invalidates everything not marked to survive it
    let stale = elements.delete_stale_after_publish();
    println!("Publish purged {} stale elements", stale.len());
    if let Some((key, fragment)) = stale.first() {
        println!("  first purged: {} -> {}", key, fragment.html);
    }

    let survivors = elements.keys();
    println!("{} elements survive the publish", survivors.len());
    assert!(survivors.iter().all(|k| k.template() == "navigation"));

    // Resolved URIs
    let uris: ConcurrentLruCache<UriRef, String> =
        ConcurrentLruCache::new(NonZeroUsize::new(64).unwrap());
    for page in ["/", "/news", "/news/today", "/sport"] {
        uris.put(UriRef::from(page), format!("content:{}", page.len()));
    }
    let moved = uris.delete_by_uri("/news/today");
    println!("\nMoved page dropped {} resolved URI", moved.len());
    println!("URI cache now holds {:?}", uris.keys());

    print_metrics("Element cache metrics", elements.as_ref());
    print_metrics("URI cache metrics", &uris);
}
