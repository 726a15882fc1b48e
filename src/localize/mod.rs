//! Localization of the merged dataset
//!
//! Every sign page exists in all of the site's locales under the same id. Given
//! the merged dataset of one locale, this module fetches each sign in another
//! locale and records that locale's video. Unlike the category crawl, requests
//! run concurrently (bounded by a semaphore); a failed sign is counted and
//! skipped instead of aborting the pass.

mod href;

pub use href::{localized_href, sign_base_url};

use crate::config::Config;
use crate::crawler::{extract_video_sources, HttpFetcher, PageFetcher};
use crate::output::{MergedRecord, RecordWriter};
use crate::HarvestError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// A sign's record in another locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedRecord {
    pub href: String,
    pub video: String,
    pub gloss: String,
    pub category: String,
}

/// Result of localizing a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizeOutcome {
    /// Localized records, in input order
    pub records: Vec<LocalizedRecord>,

    /// Signs that could not be localized
    pub failed: usize,
}

/// Settings shared by every localization task
#[derive(Debug, Clone)]
pub struct LocalizeOptions {
    pub root: Url,
    pub source_locale: String,
    pub target_locale: String,
    pub max_concurrent: usize,
}

/// Fetches every record's sign page in the target locale
pub async fn localize_records<F>(
    fetcher: Arc<F>,
    records: &[MergedRecord],
    options: &LocalizeOptions,
) -> LocalizeOutcome
where
    F: PageFetcher + 'static,
{
    let semaphore = Arc::new(Semaphore::new(options.max_concurrent.max(1)));
    let options = Arc::new(options.clone());
    let mut tasks = JoinSet::new();

    for (index, record) in records.iter().cloned().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        let options = Arc::clone(&options);

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let result = localize_one(fetcher.as_ref(), &record, &options).await;
            if let Err(e) = &result {
                tracing::warn!("Could not localize '{}': {}", record.gloss, e);
            }
            (index, result)
        });
    }

    let mut slots: Vec<Option<LocalizedRecord>> = vec![None; records.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(localized))) => slots[index] = Some(localized),
            Ok((_, Err(_))) => {}
            Err(e) => tracing::error!("Localization task failed: {}", e),
        }
    }

    let localized: Vec<LocalizedRecord> = slots.into_iter().flatten().collect();
    LocalizeOutcome {
        failed: records.len() - localized.len(),
        records: localized,
    }
}

async fn localize_one<F: PageFetcher + ?Sized>(
    fetcher: &F,
    record: &MergedRecord,
    options: &LocalizeOptions,
) -> Result<LocalizedRecord, HarvestError> {
    let href = localized_href(&record.href, &options.source_locale, &options.target_locale);
    let url = Url::parse(&sign_base_url(options.root.join(&href)?.as_str()))?;

    tracing::debug!("Processing gloss '{}' at {}", record.gloss, url);
    let page = fetcher.fetch(&url).await?;

    let video = extract_video_sources(&page.body, &page.url)
        .into_iter()
        .next()
        .ok_or_else(|| HarvestError::HtmlParse {
            url: url.to_string(),
            message: format!("no video in locale {}", options.target_locale),
        })?;

    Ok(LocalizedRecord {
        href,
        video,
        gloss: record.gloss.clone(),
        category: record.category.clone(),
    })
}

/// Output path of a locale's dataset: `metadata.<locale>.jsonl` in `dir`
pub fn localized_path(dir: &Path, locale: &str) -> PathBuf {
    dir.join(format!("metadata.{}.jsonl", locale))
}

/// Localizes `records` and writes the successful ones to [`localized_path`]
pub async fn localize_to_file<F>(
    fetcher: Arc<F>,
    records: &[MergedRecord],
    options: &LocalizeOptions,
    out_dir: &Path,
) -> Result<LocalizeOutcome, HarvestError>
where
    F: PageFetcher + 'static,
{
    tracing::info!(
        "Localizing {} signs to {}",
        records.len(),
        options.target_locale
    );

    let outcome = localize_records(fetcher, records, options).await;

    std::fs::create_dir_all(out_dir)?;
    let mut writer = RecordWriter::create(localized_path(out_dir, &options.target_locale))?;
    for record in &outcome.records {
        writer.append(record)?;
    }
    writer.finish()?;

    tracing::info!(
        "{}: {} succeeded, {} failed",
        options.target_locale,
        outcome.records.len(),
        outcome.failed
    );
    Ok(outcome)
}

/// Localizes the merged dataset of `config` into each of `locales`, one after another
pub async fn run_localize(
    config: &Config,
    records: &[MergedRecord],
    locales: &[String],
) -> Result<Vec<(String, LocalizeOutcome)>, HarvestError> {
    let fetcher = Arc::new(HttpFetcher::from_config(
        &config.user_agent,
        &config.crawler,
    )?);

    let out_dir = Path::new(&config.output.merged_path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut outcomes = Vec::new();
    for locale in locales {
        let options = LocalizeOptions {
            root: config.site.root()?,
            source_locale: config.site.locale.clone(),
            target_locale: locale.clone(),
            max_concurrent: config.crawler.max_concurrent_requests as usize,
        };

        let outcome = localize_to_file(Arc::clone(&fetcher), records, &options, &out_dir).await?;
        outcomes.push((locale.clone(), outcome));
    }

    Ok(outcomes)
}
