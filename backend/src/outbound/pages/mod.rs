//! In-process static page runtime.
//!
//! Renders the article listing (`/article/`) and detail pages
//! (`/article/{slug}`) into JSON props artifacts. Detail artifacts are cached
//! per article id under the article's current slug; a request under any other
//! slug for the same id has no page. Reads are served from the cache and a
//! miss renders and stores the page. Regeneration always renders, replacing or
//! evicting the cached artifact.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::domain::ports::{
    ArticleQuery, PageRegenerator, Regeneration, RegenerationError, StaticPage, StaticPages,
};
use crate::domain::{
    ARTICLE_PAGE, ArticleId, Error, PagePath, extract_id_from_slug, is_valid_article_slug,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageRoute<'a> {
    Listing,
    Detail(&'a str),
}

impl<'a> PageRoute<'a> {
    fn resolve(path: &'a str) -> Option<Self> {
        let rest = path.strip_prefix('/')?.strip_prefix(ARTICLE_PAGE)?;
        match rest {
            "" | "/" => Some(Self::Listing),
            _ => {
                let slug = rest.strip_prefix('/')?;
                (!slug.contains('/')).then_some(Self::Detail(slug))
            }
        }
    }

    /// Cache slot and canonical path, or `None` for a slug no article can own.
    fn request(self) -> Option<PageRequest> {
        match self {
            Self::Listing => Some(PageRequest {
                key: PageKey::Listing,
                path: listing_path(),
            }),
            Self::Detail(slug) => {
                if !is_valid_article_slug(slug) {
                    return None;
                }
                let id = extract_id_from_slug(slug).and_then(|raw| ArticleId::new(raw).ok())?;
                Some(PageRequest {
                    key: PageKey::Article(id),
                    path: detail_path(slug),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PageKey {
    Listing,
    Article(ArticleId),
}

#[derive(Debug)]
struct PageRequest {
    key: PageKey,
    /// `/article` and `/article/` share the listing artifact.
    path: String,
}

impl PageRequest {
    /// The cached artifact answers this request only under its own path.
    fn answer(&self, page: StaticPage) -> Option<StaticPage> {
        (page.path == self.path).then_some(page)
    }
}

#[derive(Debug, Default)]
struct PageCache {
    pages: HashMap<PageKey, StaticPage>,
    /// Bumped by every regeneration of a key.
    generations: HashMap<PageKey, u64>,
}

impl PageCache {
    fn generation(&self, key: &PageKey) -> u64 {
        self.generations.get(key).copied().unwrap_or_default()
    }
}

/// Cached page renderer backed by the article read port.
pub struct StaticPageRuntime {
    articles: Arc<dyn ArticleQuery>,
    clock: Arc<dyn Clock>,
    cache: RwLock<PageCache>,
}

impl StaticPageRuntime {
    pub fn new(articles: Arc<dyn ArticleQuery>, clock: Arc<dyn Clock>) -> Self {
        Self {
            articles,
            clock,
            cache: RwLock::new(PageCache::default()),
        }
    }

    async fn render(&self, key: &PageKey) -> Result<Option<StaticPage>, RegenerationError> {
        let rendered = match key {
            PageKey::Listing => {
                let articles = self.articles.fetch_all().await.map_err(source_error)?;
                Some((listing_path(), json!({ "articles": to_value(&articles)? })))
            }
            PageKey::Article(id) => self
                .articles
                .fetch_one(id)
                .await
                .map_err(source_error)?
                .map(|article| {
                    let path = detail_path(&article.article.slug);
                    Ok::<_, RegenerationError>((path, json!({ "article": to_value(&article)? })))
                })
                .transpose()?,
        };
        Ok(rendered.map(|(path, props)| StaticPage {
            path,
            props,
            generated_at: self.clock.utc(),
        }))
    }

    fn cached(&self, key: &PageKey) -> Result<(Option<StaticPage>, u64), RegenerationError> {
        let cache = self.cache.read().map_err(|_| poisoned())?;
        Ok((cache.pages.get(key).cloned(), cache.generation(key)))
    }

    /// Keep a miss-render unless a regeneration replaced the slot meanwhile.
    fn settle(
        &self,
        key: PageKey,
        page: StaticPage,
        seen: u64,
    ) -> Result<Option<StaticPage>, RegenerationError> {
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        if cache.generation(&key) != seen {
            debug!(?key, "page regenerated during render; discarding");
            return Ok(cache.pages.get(&key).cloned());
        }
        cache.pages.insert(key, page.clone());
        Ok(Some(page))
    }

    fn replace(&self, key: PageKey, page: Option<&StaticPage>) -> Result<(), RegenerationError> {
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        *cache.generations.entry(key.clone()).or_default() += 1;
        match page {
            Some(page) => {
                cache.pages.insert(key, page.clone());
            }
            None => {
                cache.pages.remove(&key);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn cached_pages(&self) -> usize {
        self.cache.read().map_or(0, |cache| cache.pages.len())
    }
}

fn listing_path() -> String {
    format!("/{ARTICLE_PAGE}/")
}

fn detail_path(slug: &str) -> String {
    format!("/{ARTICLE_PAGE}/{slug}")
}

fn resolve(path: &PagePath) -> Result<Option<PageRequest>, RegenerationError> {
    PageRoute::resolve(path.as_str())
        .map(PageRoute::request)
        .ok_or_else(|| RegenerationError::unknown_page(path.as_str()))
}

fn source_error(error: Error) -> RegenerationError {
    RegenerationError::source(error.message())
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, RegenerationError> {
    serde_json::to_value(value).map_err(|err| RegenerationError::source(err.to_string()))
}

fn poisoned() -> RegenerationError {
    RegenerationError::cache("page cache lock poisoned")
}

#[async_trait]
impl PageRegenerator for StaticPageRuntime {
    async fn regenerate(&self, path: &PagePath) -> Result<Regeneration, RegenerationError> {
        let Some(request) = resolve(path)? else {
            info!(%path, "slug names no article; nothing to regenerate");
            return Ok(Regeneration::Removed);
        };
        let page = self.render(&request.key).await?;
        self.replace(request.key.clone(), page.as_ref())?;
        Ok(match page.and_then(|page| request.answer(page)) {
            Some(page) => {
                info!(path = %page.path, "page regenerated");
                Regeneration::Rendered(page)
            }
            None => {
                info!(%path, "path no longer has content; artifact evicted");
                Regeneration::Removed
            }
        })
    }
}

#[async_trait]
impl StaticPages for StaticPageRuntime {
    async fn serve(&self, path: &PagePath) -> Result<Option<StaticPage>, RegenerationError> {
        let Some(request) = resolve(path)? else {
            return Ok(None);
        };
        let (cached, seen) = self.cached(&request.key)?;
        let page = match cached {
            Some(page) => Some(page),
            None => {
                debug!(key = ?request.key, "page cache miss; rendering");
                match self.render(&request.key).await? {
                    Some(page) => self.settle(request.key.clone(), page, seen)?,
                    None => None,
                }
            }
        };
        Ok(page.and_then(|page| request.answer(page)))
    }
}
