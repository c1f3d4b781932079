use std::sync::Arc;

use snafu::prelude::*;

use crate::component;
use crate::services::{row, unix_now, Cache, Database, Logger, Row, ServiceError, ValidationSnafu};

const TABLE: &str = "news";
const COUNT_CACHE_KEY: &str = "news:count";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub author_id: u64,
    pub published_at: u64,
}

impl NewsItem {
    fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            id: row.get("id")?.parse().ok()?,
            title: row.get("title")?.clone(),
            body: row.get("body")?.clone(),
            author_id: row.get("author_id")?.parse().ok()?,
            published_at: row.get("published_at")?.parse().ok()?,
        })
    }
}

pub trait NewsService: Send + Sync {
    fn publish(&self, title: &str, body: &str, author_id: u64) -> Result<u64, ServiceError>;

    /// Returns at most `limit` items, newest first.
    fn latest(&self, limit: usize) -> Vec<NewsItem>;

    /// The number of published items.
    fn count(&self) -> usize;
}

pub struct DatabaseNewsService {
    database: Arc<dyn Database>,
    cache: Arc<dyn Cache>,
    logger: Arc<dyn Logger>,
}

#[component(Arc<dyn NewsService>, Arc::new)]
impl DatabaseNewsService {
    #[inject]
    pub fn new(database: Arc<dyn Database>, cache: Arc<dyn Cache>, logger: Arc<dyn Logger>) -> Self {
        Self {
            database,
            cache,
            logger,
        }
    }
}

impl NewsService for DatabaseNewsService {
    fn publish(&self, title: &str, body: &str, author_id: u64) -> Result<u64, ServiceError> {
        ensure!(
            !title.trim().is_empty(),
            ValidationSnafu {
                message: "news title must not be empty"
            }
        );
        let author = author_id.to_string();
        let published_at = unix_now().to_string();
        let id = self.database.insert(
            TABLE,
            row([
                ("title", title),
                ("body", body),
                ("author_id", author.as_str()),
                ("published_at", published_at.as_str()),
            ]),
        )?;
        self.cache.delete(COUNT_CACHE_KEY);
        self.logger.info("news published", &[("title", title), ("author_id", &author)]);
        Ok(id)
    }

    fn latest(&self, limit: usize) -> Vec<NewsItem> {
        let mut items: Vec<_> = self
            .database
            .all(TABLE)
            .iter()
            .filter_map(NewsItem::from_row)
            .collect();
        items.sort_by(|a, b| (b.published_at, b.id).cmp(&(a.published_at, a.id)));
        items.truncate(limit);
        items
    }

    fn count(&self) -> usize {
        let count = self.cache.remember(COUNT_CACHE_KEY, None, &|| {
            self.database.all(TABLE).len().to_string()
        });
        count.parse().unwrap_or_default()
    }
}
