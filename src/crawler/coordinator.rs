//! Crawl engine - main crawl orchestration logic
//!
//! The site is a tree of categories and sign pages, but its pagination links
//! point backwards as well as forwards, so the traversal treats it as a graph:
//! each category is drained breadth-first from a FIFO frontier, and listing
//! pages reached through pagination are expanded at most once per run.
//!
//! Each category owns one backup file for the length of its traversal. A fetch
//! or file error aborts the whole run and reports the category it happened in,
//! so the next run can start from there; files of earlier categories are
//! already complete.

use crate::config::Config;
use crate::crawler::classifier::{classify_anchors, ClassifiedLinks};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{
    extract_category_anchors, extract_listing_anchors, extract_video_sources,
};
use crate::crawler::text::normalize_gloss;
use crate::output::{CrawlReport, RecordWriter, SignRecord, VideoRef};
use crate::state::{CategoryLink, LinkKind, PrefixVisitedSet, ThemeLink};
use crate::HarvestError;
use std::path::PathBuf;
use url::Url;

/// Main crawl engine
pub struct CrawlEngine<F> {
    fetcher: F,

    /// Site root; sign links resolve against it
    root: Url,

    /// Directory receiving one backup file per category
    backup_dir: PathBuf,

    /// Listing pages already expanded through a continuation link, across all categories
    visited: PrefixVisitedSet,

    report: CrawlReport,
}

impl CrawlEngine<HttpFetcher> {
    /// Creates an engine backed by the HTTP fetcher described in `config`
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
        Ok(Self::new(
            fetcher,
            config.site.root()?,
            &config.output.backup_dir,
        ))
    }
}

impl<F: PageFetcher> CrawlEngine<F> {
    pub fn new(fetcher: F, root: Url, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            root,
            backup_dir: backup_dir.into(),
            visited: PrefixVisitedSet::new(),
            report: CrawlReport::new(),
        }
    }

    /// Counters collected so far (also available after an aborted run)
    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    /// Continuation pages expanded so far
    pub fn visited(&self) -> &PrefixVisitedSet {
        &self.visited
    }

    /// Fetches the category index and returns its categories in page order
    ///
    /// Categories whose normalized name was already seen are dropped, as are
    /// anchors with no text.
    pub async fn load_categories(
        &self,
        categories_url: &Url,
    ) -> Result<Vec<CategoryLink>, HarvestError> {
        let page = self.fetcher.fetch(categories_url).await?;

        let anchors =
            extract_category_anchors(&page.body).ok_or_else(|| HarvestError::HtmlParse {
                url: categories_url.to_string(),
                message: "no #categories element".to_string(),
            })?;

        let mut seen = PrefixVisitedSet::new();
        let mut categories = Vec::new();

        for anchor in anchors {
            let gloss = normalize_gloss(&anchor.text);
            if gloss.is_empty() {
                tracing::debug!("Skipping category link without text: {}", anchor.href);
                continue;
            }

            if seen.insert(&gloss) {
                categories.push(CategoryLink::new(anchor.href, gloss));
            } else {
                tracing::debug!("Skipping repeated category '{}'", gloss);
            }
        }

        tracing::info!("Found {} categories", categories.len());
        Ok(categories)
    }

    /// Crawls `categories` in order, starting at the 1-based index `start_from`
    ///
    /// Categories before `start_from` are skipped and their backup files left
    /// untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Every category from `start_from` on was crawled
    /// * `Err(HarvestError::Aborted)` - A fatal error; carries the category index to resume from
    pub async fn run(
        &mut self,
        categories: &[CategoryLink],
        start_from: usize,
    ) -> Result<CrawlReport, HarvestError> {
        std::fs::create_dir_all(&self.backup_dir).map_err(|source| HarvestError::FileOpen {
            path: self.backup_dir.clone(),
            source,
        })?;

        let total = categories.len();
        self.report.categories_total = total;

        for (offset, category) in categories.iter().enumerate() {
            let index = offset + 1;
            if index < start_from {
                tracing::debug!("Skipping category #{} '{}'", index, category.gloss);
                continue;
            }

            tracing::info!("[{}/{}] Crawling category '{}'", index, total, category.gloss);

            let written = self.crawl_category(category).await.map_err(|source| {
                tracing::error!("Last category reached: #{} '{}'", index, category.gloss);
                HarvestError::Aborted {
                    category_index: index,
                    category: category.gloss.clone(),
                    source: Box::new(source),
                }
            })?;

            self.report.categories_completed += 1;
            tracing::info!("Category '{}' done: {} records", category.gloss, written);
        }

        self.report.finish();
        Ok(self.report.clone())
    }

    /// Drains one category's frontier into its backup file
    async fn crawl_category(&mut self, category: &CategoryLink) -> Result<usize, HarvestError> {
        let path = self.backup_dir.join(category.backup_file_name());
        let mut writer = RecordWriter::create(&path)?;
        tracing::info!("Saving backup to {}", writer.path().display());

        let category_url = self.root.join(&category.href)?;
        let page = self.fetcher.fetch(&category_url).await?;

        let mut frontier = Frontier::new();
        frontier.extend(self.classify_page(&page.body, &category_url).into_links());

        while let Some(link) = frontier.pop() {
            tracing::trace!("{} ({} queued)", link, frontier.len());
            match &link.kind {
                LinkKind::Theme { grammar_category } => {
                    self.visit_theme(&link, grammar_category, category, &mut writer)
                        .await?;
                }
                LinkKind::Continuation => {
                    self.expand_continuation(&link, &category_url, &mut frontier)
                        .await?;
                }
            }
        }

        writer.finish()
    }

    /// Fetches a sign page and appends its record
    async fn visit_theme(
        &mut self,
        link: &ThemeLink,
        grammar_category: &str,
        category: &CategoryLink,
        writer: &mut RecordWriter,
    ) -> Result<(), HarvestError> {
        let Ok(url) = self.root.join(&link.href) else {
            tracing::warn!("Skipping sign '{}': unresolvable link '{}'", link.gloss, link.href);
            self.report.unresolvable_links += 1;
            return Ok(());
        };

        tracing::debug!("Visiting sign '{}' at {}", link.gloss, url);
        let page = self.fetcher.fetch(&url).await?;

        let video = VideoRef::from_sources(extract_video_sources(&page.body, &page.url));
        if video.is_missing() {
            tracing::warn!("No video for '{}' ({})", link.gloss, url);
            self.report.missing_videos += 1;
        }

        writer.append(&SignRecord {
            href: link.href.clone(),
            gloss: link.gloss.clone(),
            grammar_category: grammar_category.to_string(),
            category: category.gloss.clone(),
            video,
        })?;
        self.report.records_written += 1;

        Ok(())
    }

    /// Expands a pagination link unless its page was expanded before
    ///
    /// Pagination hrefs are relative to the category listing, not the site root.
    /// The page is marked visited only once its links are in the frontier.
    async fn expand_continuation(
        &mut self,
        link: &ThemeLink,
        category_url: &Url,
        frontier: &mut Frontier,
    ) -> Result<(), HarvestError> {
        let Ok(url) = category_url.join(&link.href) else {
            tracing::warn!("Skipping unresolvable pagination link '{}'", link.href);
            self.report.unresolvable_links += 1;
            return Ok(());
        };

        if self.visited.contains(url.as_str()) {
            tracing::debug!("Already expanded {}", url);
            self.report.continuation_pages_skipped += 1;
            return Ok(());
        }

        let page = self.fetcher.fetch(&url).await?;
        let classified = self.classify_page(&page.body, &url);
        tracing::info!("Adding next page from {} ({} links)", url, classified.len());

        frontier.extend(classified.into_links());
        self.visited.insert(url.as_str());
        self.report.continuation_pages_expanded += 1;

        Ok(())
    }

    /// Classifies a listing page, flagging pages with a single pagination link
    fn classify_page(&mut self, body: &str, page_url: &Url) -> ClassifiedLinks {
        let anchors = extract_listing_anchors(body).unwrap_or_else(|| {
            tracing::warn!("No #search-row on {}, treating as empty", page_url);
            Vec::new()
        });

        let classified = classify_anchors(&anchors);
        if classified.is_ambiguous() {
            tracing::warn!(
                "Single pagination link on {}, taken as next page; check manually",
                page_url
            );
            self.report.ambiguous_pages.push(page_url.to_string());
        }

        classified
    }
}

/// Runs a complete crawl with the HTTP fetcher
///
/// 1. Build the HTTP client from configuration
/// 2. Fetch the category index and de-duplicate categories
/// 3. Crawl categories in order from `start_from` (1-based)
///
/// # Example
///
/// ```no_run
/// use sign_harvest::config::load_config;
/// use sign_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sign-harvest.toml"))?;
/// let report = run_crawl(&config, 1).await?;
/// println!("{} records", report.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, start_from: usize) -> Result<CrawlReport, HarvestError> {
    let mut engine = CrawlEngine::from_config(config)?;
    let categories = engine.load_categories(&config.site.categories_url()?).await?;
    engine.run(&categories, start_from).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::FetchedPage;
    use crate::output::{read_backup, NO_VIDEO};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use tempfile::TempDir;

    const ROOT: &str = "https://site.test/";
    const SALUDOS: &str = "/es.es/search/by-category/1/saludos/";
    const ANIMALES: &str = "/es.es/search/by-category/2/animales/";

    /// In-memory site recording every requested URL
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        failing: HashSet<String>,
        hits: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn page(mut self, path: &str, body: String) -> Self {
            self.pages.insert(format!("https://site.test{}", path), body);
            self
        }

        fn failing(mut self, path: &str) -> Self {
            self.failing.insert(format!("https://site.test{}", path));
            self
        }

        fn hits(&self) -> Vec<String> {
            self.hits.lock().unwrap().clone()
        }

        fn hit_count(&self, path: &str) -> usize {
            let url = format!("https://site.test{}", path);
            self.hits().iter().filter(|hit| **hit == url).count()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, HarvestError> {
            self.hits.lock().unwrap().push(url.to_string());

            if self.failing.contains(url.as_str()) {
                return Err(HarvestError::HttpStatus {
                    url: url.to_string(),
                    status: 500,
                });
            }

            match self.pages.get(url.as_str()) {
                Some(body) => Ok(FetchedPage {
                    url: url.clone(),
                    status_code: 200,
                    body: body.clone(),
                }),
                None => Err(HarvestError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn sign(href: &str, gloss: &str, grammar_category: &str) -> String {
        format!(
            "<a href=\"{}\">\n        {}\n        \n          {}\n</a>",
            href, gloss, grammar_category
        )
    }

    fn pager(href: &str, text: &str) -> String {
        format!("<a href=\"{}\">{}</a>", href, text)
    }

    fn listing(anchors: &[String]) -> String {
        format!(
            "<html><body><div id=\"search-row\">{}</div></body></html>",
            anchors.concat()
        )
    }

    fn sign_page(video: Option<&str>) -> String {
        match video {
            Some(src) => format!("<html><body><video src=\"{}\"></video></body></html>", src),
            None => "<html><body><p>Sin video</p></body></html>".to_string(),
        }
    }

    fn engine(site: FakeSite, dir: &TempDir) -> CrawlEngine<FakeSite> {
        CrawlEngine::new(site, Url::parse(ROOT).unwrap(), dir.path())
    }

    fn records(dir: &TempDir, file: &str) -> Vec<SignRecord> {
        read_backup(&dir.path().join(file)).unwrap()
    }

    #[tokio::test]
    async fn test_themes_before_continuation() {
        let site = FakeSite::default()
            .page(
                SALUDOS,
                listing(&[
                    sign("/es.es/word/1/hola/", "Hola", "Interjección"),
                    pager("?p=2", "Siguiente"),
                ]),
            )
            .page(
                "/es.es/search/by-category/1/saludos/?p=2",
                listing(&[sign("/es.es/word/2/adios/", "Adiós", "Interjección")]),
            )
            .page("/es.es/word/1/hola/", sign_page(Some("/media/hola.mp4")))
            .page("/es.es/word/2/adios/", sign_page(Some("/media/adios.mp4")));

        let dir = TempDir::new().unwrap();
        let mut engine = engine(site, &dir);
        let report = engine
            .run(&[CategoryLink::new(SALUDOS, "saludos")], 1)
            .await
            .unwrap();

        assert_eq!(
            engine.fetcher.hits(),
            vec![
                "https://site.test/es.es/search/by-category/1/saludos/",
                "https://site.test/es.es/word/1/hola/",
                "https://site.test/es.es/search/by-category/1/saludos/?p=2",
                "https://site.test/es.es/word/2/adios/",
            ]
        );

        let written = records(&dir, "saludos.jsonl");
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].gloss, "Hola");
        assert_eq!(written[0].grammar_category, "Interjección");
        assert_eq!(
            written[0].video,
            VideoRef::Sources(vec!["https://site.test/media/hola.mp4".to_string()])
        );
        assert_eq!(written[1].gloss, "Adiós");

        assert_eq!(report.records_written, 2);
        assert_eq!(report.categories_completed, 1);
        assert_eq!(report.continuation_pages_expanded, 1);
        assert_eq!(
            report.ambiguous_pages,
            vec!["https://site.test/es.es/search/by-category/1/saludos/"]
        );
        assert!(engine
            .visited()
            .contains("https://site.test/es.es/search/by-category/1/saludos/?p=2"));
    }

    #[tokio::test]
    async fn test_visited_continuation_not_refetched() {
        let site = FakeSite::default()
            .page(
                SALUDOS,
                listing(&[
                    sign("/es.es/word/1/hola/", "Hola", "Interjección"),
                    pager("?p=2", "»"),
                ]),
            )
            .page(
                "/es.es/search/by-category/1/saludos/?p=2",
                listing(&[
                    pager("?p=1", "«"),
                    pager("?p=2", "»"),
                    sign("/es.es/word/2/adios/", "Adiós", "Interjección"),
                ]),
            )
            .page("/es.es/word/1/hola/", sign_page(Some("/media/hola.mp4")))
            .page("/es.es/word/2/adios/", sign_page(Some("/media/adios.mp4")));

        let dir = TempDir::new().unwrap();
        let mut engine = engine(site, &dir);
        let report = engine
            .run(&[CategoryLink::new(SALUDOS, "saludos")], 1)
            .await
            .unwrap();

        assert_eq!(
            engine
                .fetcher
                .hit_count("/es.es/search/by-category/1/saludos/?p=2"),
            1
        );
        assert_eq!(engine.fetcher.hit_count("/es.es/search/by-category/1/saludos/?p=1"), 0);
        assert_eq!(report.continuation_pages_skipped, 1);

        let glosses: Vec<String> = records(&dir, "saludos.jsonl")
            .into_iter()
            .map(|r| r.gloss)
            .collect();
        assert_eq!(glosses, vec!["Hola", "Adiós"]);
    }

    #[tokio::test]
    async fn test_missing_video_does_not_abort() {
        let site = FakeSite::default()
            .page(
                ANIMALES,
                listing(&[
                    sign("/es.es/word/3/perro/", "perro", "Nombre"),
                    sign("/es.es/word/4/gato/", "gato", "Nombre"),
                ]),
            )
            .page("/es.es/word/3/perro/", sign_page(None))
            .page("/es.es/word/4/gato/", sign_page(Some("https://media.test/gato.mp4")));

        let dir = TempDir::new().unwrap();
        let mut engine = engine(site, &dir);
        let report = engine
            .run(&[CategoryLink::new(ANIMALES, "animales")], 1)
            .await
            .unwrap();

        let written = records(&dir, "animales.jsonl");
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].video, VideoRef::Missing);
        assert_eq!(written[1].gloss, "gato");
        assert_eq!(report.missing_videos, 1);

        let raw = std::fs::read_to_string(dir.path().join("animales.jsonl")).unwrap();
        assert!(raw.lines().next().unwrap().contains(NO_VIDEO));
    }

    #[tokio::test]
    async fn test_malformed_anchor_degrades_to_unknown() {
        let site = FakeSite::default()
            .page(
                ANIMALES,
                listing(&["<a href=\"/es.es/word/5/pez/\">\n pez Nombre\n</a>".to_string()]),
            )
            .page("/es.es/word/5/pez/", sign_page(Some("/pez.mp4")));

        let dir = TempDir::new().unwrap();
        let mut engine = engine(site, &dir);
        engine
            .run(&[CategoryLink::new(ANIMALES, "animales")], 1)
            .await
            .unwrap();

        let written = records(&dir, "animales.jsonl");
        assert_eq!(written[0].grammar_category, "unknown");
        assert_eq!(written[0].gloss, "\n pez Nombre\n");
    }

    #[tokio::test]
    async fn test_unresolvable_links_are_skipped() {
        let site = FakeSite::default()
            .page(
                ANIMALES,
                listing(&[
                    sign("http://[::1", "Roto", "Nombre"),
                    sign("/es.es/word/3/perro/", "Perro", "Nombre"),
                    pager("http://[::1", "Siguiente"),
                ]),
            )
            .page("/es.es/word/3/perro/", sign_page(Some("/perro.mp4")));

        let dir = TempDir::new().unwrap();
        let mut engine = engine(site, &dir);
        let report = engine
            .run(&[CategoryLink::new(ANIMALES, "animales")], 1)
            .await
            .unwrap();

        assert_eq!(
            engine.fetcher.hits(),
            vec![
                "https://site.test/es.es/search/by-category/2/animales/",
                "https://site.test/es.es/word/3/perro/",
            ]
        );

        let written = records(&dir, "animales.jsonl");
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].gloss, "Perro");

        assert_eq!(report.unresolvable_links, 2);
        assert_eq!(report.records_written, 1);
        assert_eq!(report.categories_completed, 1);
        assert!(engine.visited().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_category_index() {
        let site = FakeSite::default()
            .page(
                SALUDOS,
                listing(&[sign("/es.es/word/1/hola/", "Hola", "Interjección")]),
            )
            .page("/es.es/word/1/hola/", sign_page(Some("/media/hola.mp4")))
            .page(
                ANIMALES,
                listing(&[
                    sign("/es.es/word/3/perro/", "perro", "Nombre"),
                    sign("/es.es/word/4/gato/", "gato", "Nombre"),
                ]),
            )
            .page("/es.es/word/3/perro/", sign_page(Some("/media/perro.mp4")))
            .failing("/es.es/word/4/gato/");

        let dir = TempDir::new().unwrap();
        let mut engine = engine(site, &dir);
        let categories = vec![
            CategoryLink::new(SALUDOS, "saludos"),
            CategoryLink::new(ANIMALES, "animales"),
        ];

        let err = engine.run(&categories, 1).await.unwrap_err();
        assert_eq!(err.category_index(), Some(2));
        assert!(err.is_fetch_error());

        assert_eq!(records(&dir, "saludos.jsonl").len(), 1);
        assert_eq!(records(&dir, "animales.jsonl").len(), 1);
        assert_eq!(engine.report().categories_completed, 1);
    }

    #[tokio::test]
    async fn test_start_from_skips_earlier_categories() {
        let site = FakeSite::default().page(
            ANIMALES,
            listing(&[]),
        );

        let dir = TempDir::new().unwrap();
        let mut engine = engine(site, &dir);
        let categories = vec![
            CategoryLink::new(SALUDOS, "saludos"),
            CategoryLink::new(ANIMALES, "animales"),
        ];

        let report = engine.run(&categories, 2).await.unwrap();
        assert_eq!(report.categories_total, 2);
        assert_eq!(report.categories_completed, 1);
        assert_eq!(engine.fetcher.hit_count(SALUDOS), 0);
        assert!(!dir.path().join("saludos.jsonl").exists());
        assert!(dir.path().join("animales.jsonl").exists());
    }

    #[tokio::test]
    async fn test_load_categories_dedupes_normalized_names() {
        let index = r#"
            <html><body><ul id="categories">
                <li><a href="/cat/1/">Animales</a></li>
                <li><a href="/cat/2/">Días de la semana</a></li>
                <li><a href="/cat/9/"> animales </a></li>
                <li><a href="/cat/3/">Dias de la Semana</a></li>
                <li><a href="/cat/4/">   </a></li>
            </ul></body></html>
        "#;
        let site = FakeSite::default().page("/es.es/search/by-category/", index.to_string());

        let dir = TempDir::new().unwrap();
        let engine = engine(site, &dir);
        let categories = engine
            .load_categories(&Url::parse("https://site.test/es.es/search/by-category/").unwrap())
            .await
            .unwrap();

        assert_eq!(
            categories,
            vec![
                CategoryLink::new("/cat/1/", "animales"),
                CategoryLink::new("/cat/2/", "dias de la semana"),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_categories_without_index() {
        let site = FakeSite::default().page("/", "<html><body></body></html>".to_string());

        let dir = TempDir::new().unwrap();
        let engine = engine(site, &dir);
        let err = engine
            .load_categories(&Url::parse(ROOT).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, HarvestError::HtmlParse { .. }));
    }

    #[tokio::test]
    async fn test_unwritable_backup_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let site = FakeSite::default().page(SALUDOS, listing(&[]));
        let mut engine = CrawlEngine::new(site, Url::parse(ROOT).unwrap(), blocker.join("out"));

        let err = engine
            .run(&[CategoryLink::new(SALUDOS, "saludos")], 1)
            .await
            .unwrap_err();
        assert!(matches!(err, HarvestError::FileOpen { .. }));
        assert!(engine.fetcher.hits().is_empty());
    }
}
