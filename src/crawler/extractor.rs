//! HTML extraction for listing pages and article pages
//!
//! Extraction is pure: it maps an HTML string to records or text and never
//! touches the network. Every lookup goes through [`Document`] and [`Node`],
//! whose `find_*` methods return `Option`, and every absent element is turned
//! into an explicit [`ExtractError::MissingField`]. Partial records are never
//! produced.

use crate::config::ExtractorConfig;
use crate::storage::ArticleRecord;
use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document; malformed markup is recovered, never rejected
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Finds the first element whose `id` attribute equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<Node<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().id() == Some(id))
            .map(Node::new)
    }

    /// Finds every element in the document matching `selector`
    pub fn find_all(&self, selector: &Selector) -> Vec<Node<'_>> {
        self.html.select(selector).map(Node::new).collect()
    }
}

/// An element inside a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// All descendants matching `selector`, in document order
    pub fn find_all(&self, selector: &Selector) -> Vec<Node<'a>> {
        self.element.select(selector).map(Node::new).collect()
    }

    /// First descendant matching `selector`
    pub fn find_first(&self, selector: &Selector) -> Option<Node<'a>> {
        self.element.select(selector).next().map(Node::new)
    }

    /// Value of the attribute `name`
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Concatenated text of all descendant text nodes, untouched
    pub fn text(&self) -> String {
        self.element.text().collect()
    }
}

/// Compiled selectors for the archive markup
#[derive(Debug, Clone)]
pub struct Selectors {
    container_id: String,
    article: Selector,
    heading: Selector,
    link: Selector,
    date: Selector,
    category: Selector,
}

impl Selectors {
    /// Compiles the selectors named in the extractor configuration
    pub fn from_config(config: &ExtractorConfig) -> ExtractResult<Self> {
        Ok(Self {
            container_id: config.container_id.clone(),
            article: compile(&config.article)?,
            heading: compile(&config.heading)?,
            link: compile("a")?,
            date: compile(&config.date)?,
            category: compile(&config.category)?,
        })
    }

    fn container<'a>(&self, document: &'a Document) -> ExtractResult<Node<'a>> {
        document
            .find_by_id(&self.container_id)
            .ok_or_else(|| ExtractError::missing(format!("#{}", self.container_id)))
    }
}

fn compile(selector: &str) -> ExtractResult<Selector> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Extracts one [`ArticleRecord`] per article summary on a listing page
///
/// For each article element inside the main container:
/// - the first heading's first link gives `href` and `title`
/// - the date element's first link gives `date` (trimmed)
/// - the category element gives `category` (trimmed)
///
/// Relative hrefs are resolved against `page_url`. A container without
/// articles yields an empty vector.
///
/// # Errors
///
/// [`ExtractError::MissingField`] if the container, or any element or
/// attribute of any article, is absent.
///
/// # Example
///
/// ```
/// use archive_harvester::config::ExtractorConfig;
/// use archive_harvester::crawler::{extract_listing, Selectors};
///
/// let html = r#"<div id="main-content"><article>
///     <h3><a href="/news/story/" title="Story">Story</a></h3>
///     <span class="entry-meta-date"><a href="/d">01.02.2020</a></span>
///     <div class="mh-image-caption">News</div>
/// </article></div>"#;
/// let selectors = Selectors::from_config(&ExtractorConfig::default()).unwrap();
/// let records = extract_listing(html, "https://example.com/page/1", &selectors).unwrap();
/// assert_eq!(records[0].href, "https://example.com/news/story/");
/// ```
pub fn extract_listing(
    html: &str,
    page_url: &str,
    selectors: &Selectors,
) -> ExtractResult<Vec<ArticleRecord>> {
    let document = Document::parse(html);
    let container = selectors.container(&document)?;
    let base = Url::parse(page_url).ok();

    container
        .find_all(&selectors.article)
        .into_iter()
        .map(|article| extract_entry(article, page_url, base.as_ref(), selectors))
        .collect()
}

fn extract_entry(
    article: Node<'_>,
    page_url: &str,
    base: Option<&Url>,
    selectors: &Selectors,
) -> ExtractResult<ArticleRecord> {
    let link = article
        .find_first(&selectors.heading)
        .ok_or_else(|| ExtractError::missing("heading"))?
        .find_first(&selectors.link)
        .ok_or_else(|| ExtractError::missing("heading link"))?;

    let href = link
        .attr("href")
        .ok_or_else(|| ExtractError::missing("heading link href"))?;
    let title = link
        .attr("title")
        .ok_or_else(|| ExtractError::missing("heading link title"))?;

    let date = article
        .find_first(&selectors.date)
        .ok_or_else(|| ExtractError::missing("date"))?
        .find_first(&selectors.link)
        .ok_or_else(|| ExtractError::missing("date link"))?
        .text();

    let category = article
        .find_first(&selectors.category)
        .ok_or_else(|| ExtractError::missing("category"))?
        .text();

    Ok(ArticleRecord {
        page_url: page_url.to_string(),
        href: resolve_href(href, base),
        title: title.to_string(),
        date: date.trim().to_string(),
        category: category.trim().to_string(),
    })
}

/// Absolute hrefs are kept as written; only relative ones are joined onto
/// the page URL, so non-ASCII slugs are never percent-encoded.
fn resolve_href(href: &str, base: Option<&Url>) -> String {
    match Url::parse(href) {
        Err(url::ParseError::RelativeUrlWithoutBase) => match base.map(|b| b.join(href.trim())) {
            Some(Ok(absolute)) => absolute.to_string(),
            _ => href.to_string(),
        },
        _ => href.to_string(),
    }
}

/// Returns the full text of an article page's main container
///
/// The text is returned exactly as the document holds it, whitespace and
/// navigation text included.
///
/// # Errors
///
/// [`ExtractError::MissingField`] if the container is absent.
pub fn extract_article_body(html: &str, selectors: &Selectors) -> ExtractResult<String> {
    let document = Document::parse(html);
    let container = selectors.container(&document)?;
    Ok(container.text())
}
